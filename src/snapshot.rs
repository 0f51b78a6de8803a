// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Sequencing of a full snapshot or a log-only snapshot for one namespace.

use crate::artifact::ArtifactWriter;
use crate::config::Config;
use crate::constants::{helm::RELEASE_SECRET_PREFIX, layout};
use crate::dump::{DumpFilter, DumpReport, DumpTarget, Dumper};
use crate::helm::dump_helm_release;
use crate::kubernetes::{ResourceClient, ResourceKind};
use crate::logs::{dump_pod_logs, LogWindow};
use kube::Client;
use tracing::info;

/// The resource kinds of a full dump, in output order
pub fn default_targets() -> Vec<DumpTarget> {
    vec![
        DumpTarget::new(ResourceKind::deployments(), layout::DEPLOYMENTS),
        DumpTarget::new(ResourceKind::pods(), layout::PODS),
        DumpTarget::new(ResourceKind::config_maps(), layout::CONFIGMAPS),
        DumpTarget::new(ResourceKind::services(), layout::SERVICES),
        DumpTarget::new(ResourceKind::secrets(), layout::SECRETS)
            .with_filter(DumpFilter::ExcludePrefix(RELEASE_SECRET_PREFIX.to_string())),
    ]
}

/// Owns the namespace and output context of one run
pub struct Snapshot {
    resources: ResourceClient,
    writer: ArtifactWriter,
    dumper: Dumper,
}

impl Snapshot {
    pub fn new(client: Client, namespace: &str, config: &Config) -> Self {
        let resources = ResourceClient::new(client, namespace);
        let writer = ArtifactWriter::new(config.output_root.clone());
        let dumper = Dumper::new(resources.clone(), config.renderer.clone(), writer.clone());
        Self {
            resources,
            writer,
            dumper,
        }
    }

    /// Helm release (when given), then every default target, one after another
    pub async fn dump(&self, helm_release: Option<&str>) -> Vec<(String, DumpReport)> {
        info!("Dumping namespace {}", self.resources.namespace());

        if let Some(release) = helm_release {
            dump_helm_release(&self.resources, &self.writer, release).await;
        }

        let mut reports = Vec::new();
        for target in default_targets() {
            let report = self.dumper.dump(&target).await;
            reports.push((target.subdir, report));
        }
        reports
    }

    /// Logs of every pod in the namespace for the window
    pub async fn logs(&self, window: LogWindow) -> usize {
        info!(
            "Collecting logs of the last {} seconds in namespace {}",
            window.seconds,
            self.resources.namespace()
        );
        dump_pod_logs(&self.resources, &self.writer, window).await
    }
}
