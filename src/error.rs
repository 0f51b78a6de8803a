// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Cluster unreachable: {0}")]
    Connection(String),

    #[error("Credentials rejected: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Log stream failed: {0}")]
    Stream(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load kubeconfig: {0}")]
    Kubeconfig(String),

    #[error("Helm release error: {0}")]
    Helm(String),

    #[error("Backend request failed: {0}")]
    Backend(String),

    #[error("Kubernetes API error: {0}")]
    Kube(kube::Error),
}

impl From<kube::Error> for SnapshotError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 401 || resp.code == 403 => {
                SnapshotError::Auth(resp.message)
            }
            kube::Error::Api(resp) if resp.code == 404 => SnapshotError::NotFound(resp.message),
            err @ kube::Error::Auth(_) => SnapshotError::Auth(err.to_string()),
            err @ (kube::Error::HyperError(_) | kube::Error::Service(_)) => {
                SnapshotError::Connection(err.to_string())
            }
            err => SnapshotError::Kube(err),
        }
    }
}

impl From<serde_yaml::Error> for SnapshotError {
    fn from(err: serde_yaml::Error) -> Self {
        SnapshotError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
