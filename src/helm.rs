// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Helm v3 release extraction from the release storage secrets.
//!
//! Helm keeps every revision of a release in a secret labelled
//! `owner=helm,name=<release>`. The `release` key holds the release record as
//! base64 text of (usually gzipped) JSON.

use crate::artifact::ArtifactWriter;
use crate::constants::{helm, layout};
use crate::error::{Result, SnapshotError};
use crate::kubernetes::ResourceClient;
use base64::Engine;
use flate2::read::GzDecoder;
use k8s_openapi::api::core::v1::Secret;
use kube::{api::ListParams, ResourceExt};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use tracing::{error, info, instrument};

const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// The parts of a stored release record that end up in the snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct HelmRelease {
    pub name: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub manifest: String,
    /// User-supplied values
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub chart: Option<Chart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    /// Chart default values
    #[serde(default)]
    pub values: Value,
}

impl HelmRelease {
    /// Decode the `release` payload of a storage secret
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let raw = base64::engine::general_purpose::STANDARD
            .decode(payload.trim_ascii())
            .map_err(|e| SnapshotError::Helm(format!("Invalid base64 release payload: {}", e)))?;

        let json = if raw.starts_with(&GZIP_MAGIC) {
            let mut out = Vec::new();
            GzDecoder::new(raw.as_slice())
                .read_to_end(&mut out)
                .map_err(|e| SnapshotError::Helm(format!("Invalid gzip release payload: {}", e)))?;
            out
        } else {
            raw
        };

        Ok(serde_json::from_slice(&json)?)
    }

    /// Chart defaults merged with user values, user values winning
    pub fn all_values(&self) -> Value {
        let defaults = self
            .chart
            .as_ref()
            .map(|c| c.values.clone())
            .unwrap_or(Value::Null);
        coalesce(defaults, self.config.clone())
    }
}

/// Deep-merge `overrides` into `defaults`. A null override removes the key.
fn coalesce(defaults: Value, overrides: Value) -> Value {
    match (defaults, overrides) {
        (Value::Object(mut base), Value::Object(over)) => {
            for (key, value) in over {
                if value.is_null() {
                    base.remove(&key);
                    continue;
                }
                let merged = match base.remove(&key) {
                    Some(existing) => coalesce(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (defaults, Value::Null) => defaults,
        (_, overrides) => overrides,
    }
}

fn release_version(secret: &Secret) -> u64 {
    secret
        .labels()
        .get(helm::VERSION_LABEL)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Find and decode the newest stored revision of `release`
#[instrument(skip(resources), fields(namespace = %resources.namespace()))]
pub async fn latest_release(resources: &ResourceClient, release: &str) -> Result<HelmRelease> {
    let selector = format!("{}=helm,{}={}", helm::OWNER_LABEL, helm::NAME_LABEL, release);
    let secrets = resources
        .typed::<Secret>()
        .list(&ListParams::default().labels(&selector))
        .await?;

    let latest = secrets
        .items
        .into_iter()
        .max_by_key(release_version)
        .ok_or_else(|| SnapshotError::NotFound(format!("helm release {}", release)))?;

    info!("Using release revision stored in {}", latest.name_any());

    let payload = latest
        .data
        .as_ref()
        .and_then(|d| d.get(helm::RELEASE_KEY))
        .ok_or_else(|| {
            SnapshotError::Helm(format!(
                "Secret {} has no '{}' key",
                latest.name_any(),
                helm::RELEASE_KEY
            ))
        })?;

    HelmRelease::decode(&payload.0)
}

/// Write the manifest and merged values of `release`. Failures are logged only.
pub async fn dump_helm_release(
    resources: &ResourceClient,
    writer: &ArtifactWriter,
    release: &str,
) {
    let helm_release = match latest_release(resources, release).await {
        Ok(r) => r,
        Err(e) => {
            error!("Error fetching helm release {}: {}", release, e);
            return;
        }
    };
    info!(
        "Found helm release {} revision {}",
        helm_release.name, helm_release.version
    );

    let manifest_path = writer.root().join(layout::HELM).join(helm::MANIFEST_FILE);
    if let Err(e) = writer.persist(&manifest_path, &helm_release.manifest).await {
        error!("Error writing helm manifest: {}", e);
    }

    match serde_json::to_string(&helm_release.all_values()) {
        Ok(values) => {
            let values_path = writer.root().join(layout::HELM).join(helm::VALUES_FILE);
            if let Err(e) = writer.persist(&values_path, &values).await {
                error!("Error writing helm values: {}", e);
            }
        }
        Err(e) => error!("Error while marshalling helm release values: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockService;
    use flate2::{write::GzEncoder, Compression};
    use serde_json::json;
    use std::io::Write;

    const SECRETS: &str = "/api/v1/namespaces/cortex/secrets";

    fn release_json(version: u32) -> Value {
        json!({
            "name": "cortex-helm",
            "version": version,
            "manifest": format!("---\nkind: Deployment\nrevision: {}\n", version),
            "config": { "image": { "tag": "2.0" }, "debug": null },
            "chart": { "values": { "image": { "repo": "cortex/api", "tag": "1.0" }, "debug": true, "replicas": 1 } }
        })
    }

    /// Encode a release the way Helm stores it in the secret's `release` key
    fn helm_payload(release: &Value) -> String {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(release.to_string().as_bytes()).unwrap();
        base64::engine::general_purpose::STANDARD.encode(encoder.finish().unwrap())
    }

    fn storage_secret(version: u32) -> Value {
        let payload = helm_payload(&release_json(version));
        json!({
            "metadata": {
                "name": format!("sh.helm.release.v1.cortex-helm.v{}", version),
                "labels": { "owner": "helm", "name": "cortex-helm", "version": version.to_string() }
            },
            "type": "helm.sh/release.v1",
            "data": { "release": base64::engine::general_purpose::STANDARD.encode(payload) }
        })
    }

    #[test]
    fn test_decode_gzipped_release() {
        let payload = helm_payload(&release_json(3));
        let release = HelmRelease::decode(payload.as_bytes()).unwrap();
        assert_eq!(release.name, "cortex-helm");
        assert_eq!(release.version, 3);
        assert!(release.manifest.contains("revision: 3"));
    }

    #[test]
    fn test_decode_plain_json_release() {
        let payload = base64::engine::general_purpose::STANDARD.encode(r#"{"name":"plain"}"#);
        let release = HelmRelease::decode(payload.as_bytes()).unwrap();
        assert_eq!(release.name, "plain");
        assert_eq!(release.manifest, "");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = HelmRelease::decode(b"%%%").unwrap_err();
        assert!(matches!(err, SnapshotError::Helm(_)));
    }

    #[test]
    fn test_all_values_merges_user_over_defaults() {
        let release: HelmRelease = serde_json::from_value(release_json(1)).unwrap();
        assert_eq!(
            release.all_values(),
            json!({ "image": { "repo": "cortex/api", "tag": "2.0" }, "replicas": 1 })
        );
    }

    #[test]
    fn test_all_values_without_chart() {
        let release: HelmRelease =
            serde_json::from_value(json!({ "name": "x", "config": { "a": 1 } })).unwrap();
        assert_eq!(release.all_values(), json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn test_latest_release_picks_highest_revision() {
        let list = json!({
            "apiVersion": "v1",
            "kind": "SecretList",
            "metadata": {},
            "items": [storage_secret(2), storage_secret(10), storage_secret(9)]
        });
        let mock = MockService::new().on_get(SECRETS, 200, &list.to_string());

        let release = latest_release(
            &ResourceClient::new(mock.clone().into_client(), "cortex"),
            "cortex-helm",
        )
        .await
        .unwrap();
        assert_eq!(release.version, 10);
        assert_eq!(
            mock.query_param(SECRETS, "labelSelector").as_deref(),
            Some("owner=helm,name=cortex-helm")
        );
    }

    #[tokio::test]
    async fn test_missing_release_is_not_found() {
        let list = json!({ "apiVersion": "v1", "kind": "SecretList", "metadata": {}, "items": [] });
        let client = MockService::new()
            .on_get(SECRETS, 200, &list.to_string())
            .into_client();

        let err = latest_release(&ResourceClient::new(client, "cortex"), "cortex-helm")
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_dump_helm_release_writes_manifest_and_values() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        writer.prepare().await;
        let list = json!({ "apiVersion": "v1", "kind": "SecretList", "metadata": {}, "items": [storage_secret(1)] });
        let client = MockService::new()
            .on_get(SECRETS, 200, &list.to_string())
            .into_client();

        dump_helm_release(&ResourceClient::new(client, "cortex"), &writer, "cortex-helm").await;

        let manifest = std::fs::read_to_string(dir.path().join("helm/manifest.yaml")).unwrap();
        assert_eq!(manifest, "---\nkind: Deployment\nrevision: 1\n\n");
        let values = std::fs::read_to_string(dir.path().join("helm/values.json")).unwrap();
        assert_eq!(
            values,
            "{\"image\":{\"repo\":\"cortex/api\",\"tag\":\"2.0\"},\"replicas\":1}\n"
        );
    }
}
