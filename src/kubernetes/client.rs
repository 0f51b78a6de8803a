// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation from a kubeconfig file or the ambient environment

use crate::error::{Result, SnapshotError};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Create a Kubernetes client, from the given kubeconfig path when provided,
/// otherwise inferred (KUBECONFIG, ~/.kube/config or in-cluster)
#[instrument]
pub async fn create_client(kubeconfig: Option<&Path>) -> Result<Client> {
    let client_config = match kubeconfig {
        Some(path) => {
            info!("Loading kubeconfig from {}", path.display());
            let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                SnapshotError::Kubeconfig(format!("Failed to read {}: {}", path.display(), e))
            })?;
            config_from_kubeconfig(&raw).await?
        }
        None => {
            debug!("No kubeconfig path given, inferring configuration");
            KConfig::infer()
                .await
                .map_err(|e| SnapshotError::Kubeconfig(format!("Failed to infer config: {}", e)))?
        }
    };

    info!("Using cluster {}", client_config.cluster_url);

    Client::try_from(client_config)
        .map_err(|e| SnapshotError::Kubeconfig(format!("Failed to create client: {}", e)))
}

/// Build a client configuration from the contents of a kubeconfig file
async fn config_from_kubeconfig(kubeconfig: &str) -> Result<KConfig> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| SnapshotError::Kubeconfig(format!("Failed to parse kubeconfig: {}", e)))?;

    KConfig::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
        .await
        .map_err(|e| SnapshotError::Kubeconfig(format!("Failed to create config: {}", e)))
}
