// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespaced access to cluster objects, generic by resource kind

use crate::error::Result;
use k8s_openapi::api::core::v1::{Event, Pod};
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{ApiResource, DynamicObject, GroupVersionKind, ListParams},
    Api, Client, Resource, ResourceExt,
};
use std::fmt;
use tracing::{debug, instrument};

/// Identifies a resource type by group, version and plural name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceKind {
    /// API group, empty for the core group
    pub group: String,
    pub version: String,
    /// CamelCase kind, used to pick a describer
    pub kind: String,
    /// Plural resource name as it appears in the URL
    pub plural: String,
}

impl ResourceKind {
    pub fn new(group: &str, version: &str, kind: &str, plural: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
            plural: plural.to_string(),
        }
    }

    pub fn deployments() -> Self {
        Self::new("apps", "v1", "Deployment", "deployments")
    }

    pub fn pods() -> Self {
        Self::new("", "v1", "Pod", "pods")
    }

    pub fn config_maps() -> Self {
        Self::new("", "v1", "ConfigMap", "configmaps")
    }

    pub fn services() -> Self {
        Self::new("", "v1", "Service", "services")
    }

    pub fn secrets() -> Self {
        Self::new("", "v1", "Secret", "secrets")
    }

    pub fn api_resource(&self) -> ApiResource {
        let gvk = GroupVersionKind::gvk(&self.group, &self.version, &self.kind);
        ApiResource::from_gvk_with_plural(&gvk, &self.plural)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}/{}", self.version, self.plural)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.plural)
        }
    }
}

/// Cluster access scoped to one namespace
#[derive(Clone)]
pub struct ResourceClient {
    client: Client,
    namespace: String,
}

impl ResourceClient {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn dynamic_api(&self, kind: &ResourceKind) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), &self.namespace, &kind.api_resource())
    }

    /// List every object of `kind` in the namespace
    #[instrument(skip(self), fields(kind = %kind, namespace = %self.namespace))]
    pub async fn list(&self, kind: &ResourceKind) -> Result<Vec<DynamicObject>> {
        let list = self.dynamic_api(kind).list(&ListParams::default()).await?;
        debug!("Listed {} objects", list.items.len());
        Ok(list.items)
    }

    /// Fetch the full object of `kind` named `name`
    #[instrument(skip(self), fields(kind = %kind, namespace = %self.namespace))]
    pub async fn get(&self, kind: &ResourceKind, name: &str) -> Result<DynamicObject> {
        Ok(self.dynamic_api(kind).get(name).await?)
    }

    /// Typed access to a namespaced kind
    pub fn typed<K>(&self) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    /// Typed pod access, needed for log streaming
    pub fn pods(&self) -> Api<Pod> {
        self.typed()
    }

    /// Events in the namespace that reference the given object
    #[instrument(skip(self, obj), fields(namespace = %self.namespace, name = %obj.name_any()))]
    pub async fn events_for(&self, obj: &DynamicObject) -> Result<Vec<Event>> {
        let selector = match obj.uid() {
            Some(uid) => format!("involvedObject.uid={}", uid),
            None => format!("involvedObject.name={}", obj.name_any()),
        };
        let list = self
            .typed::<Event>()
            .list(&ListParams::default().fields(&selector))
            .await?;
        Ok(list.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnapshotError;
    use crate::test_utils::{list_json, not_found_json, object_json, MockService};

    #[test]
    fn test_core_kind_url_path() {
        let ar = ResourceKind::pods().api_resource();
        assert_eq!(ar.api_version, "v1");
        assert_eq!(ar.plural, "pods");
        assert_eq!(ar.group, "");
    }

    #[test]
    fn test_grouped_kind_url_path() {
        let ar = ResourceKind::deployments().api_resource();
        assert_eq!(ar.api_version, "apps/v1");
        assert_eq!(ar.kind, "Deployment");
    }

    #[test]
    fn test_display() {
        assert_eq!(ResourceKind::secrets().to_string(), "v1/secrets");
        assert_eq!(ResourceKind::deployments().to_string(), "apps/v1/deployments");
    }

    #[tokio::test]
    async fn test_list_returns_items_in_order() {
        let client = MockService::new()
            .on_get(
                "/apis/apps/v1/namespaces/cortex/deployments",
                200,
                &list_json("DeploymentList", &["api", "worker"]),
            )
            .into_client();
        let resources = ResourceClient::new(client, "cortex");

        let items = resources.list(&ResourceKind::deployments()).await.unwrap();
        let names: Vec<String> = items.iter().map(|o| o.name_any()).collect();
        assert_eq!(names, vec!["api", "worker"]);
    }

    #[tokio::test]
    async fn test_get_missing_object_is_not_found() {
        let client = MockService::new()
            .on_get(
                "/api/v1/namespaces/cortex/configmaps/gone",
                404,
                &not_found_json("configmaps", "gone"),
            )
            .into_client();
        let resources = ResourceClient::new(client, "cortex");

        let err = resources
            .get(&ResourceKind::config_maps(), "gone")
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_returns_full_object() {
        let client = MockService::new()
            .on_get(
                "/api/v1/namespaces/cortex/services/web",
                200,
                &object_json("v1", "Service", "web"),
            )
            .into_client();
        let resources = ResourceClient::new(client, "cortex");

        let obj = resources.get(&ResourceKind::services(), "web").await.unwrap();
        assert_eq!(obj.name_any(), "web");
        assert_eq!(obj.types.unwrap().kind, "Service");
    }

    #[tokio::test]
    async fn test_events_selected_by_involved_object_uid() {
        const EVENTS: &str = "/api/v1/namespaces/cortex/events";
        let events = serde_json::json!({
            "apiVersion": "v1",
            "kind": "EventList",
            "metadata": {},
            "items": [{
                "metadata": { "name": "web.1" },
                "involvedObject": { "uid": "uid-web" },
                "reason": "Synced"
            }]
        });
        let mock = MockService::new().on_get(EVENTS, 200, &events.to_string());
        let resources = ResourceClient::new(mock.clone().into_client(), "cortex");
        let obj: DynamicObject =
            serde_json::from_str(&object_json("v1", "Service", "web")).unwrap();

        let found = resources.events_for(&obj).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reason.as_deref(), Some("Synced"));
        assert_eq!(
            mock.query_param(EVENTS, "fieldSelector").as_deref(),
            Some("involvedObject.uid=uid-web")
        );
    }

    #[tokio::test]
    async fn test_events_fall_back_to_name_without_uid() {
        const EVENTS: &str = "/api/v1/namespaces/cortex/events";
        let mock = MockService::new().on_get(EVENTS, 200, &list_json("EventList", &[]));
        let resources = ResourceClient::new(mock.clone().into_client(), "cortex");
        let obj = DynamicObject::new("web", &ResourceKind::services().api_resource());

        let found = resources.events_for(&obj).await.unwrap();

        assert!(found.is_empty());
        assert_eq!(
            mock.query_param(EVENTS, "fieldSelector").as_deref(),
            Some("involvedObject.name=web")
        );
    }
}
