// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Subdirectories of the output root, one per artifact family
pub mod layout {
    pub const HELM: &str = "helm";
    pub const ACTUATOR: &str = "actuator";
    pub const DEPLOYMENTS: &str = "deployments";
    pub const PODS: &str = "pods";
    pub const SECRETS: &str = "secrets";
    pub const SERVICES: &str = "services";
    pub const CONFIGMAPS: &str = "configmaps";
    pub const LOGS: &str = "logs";

    /// Every directory created when the output tree is bootstrapped
    pub const ALL: [&str; 8] = [
        HELM,
        ACTUATOR,
        DEPLOYMENTS,
        PODS,
        SECRETS,
        SERVICES,
        CONFIGMAPS,
        LOGS,
    ];

    pub const OBJECT_EXTENSION: &str = "yaml";
    pub const LOG_EXTENSION: &str = "log";
}

/// Strings written in place of pod logs when retrieval fails
pub mod sentinels {
    pub const OPEN_STREAM_FAILED: &str = "error in opening stream";
    pub const COPY_STREAM_FAILED: &str = "error in copy information from podLogs to buf";
}

/// Helm release storage conventions
pub mod helm {
    /// Name prefix of the secrets Helm uses to store release revisions
    pub const RELEASE_SECRET_PREFIX: &str = "sh.helm";
    pub const OWNER_LABEL: &str = "owner";
    pub const NAME_LABEL: &str = "name";
    pub const VERSION_LABEL: &str = "version";
    pub const RELEASE_KEY: &str = "release";
    pub const MANIFEST_FILE: &str = "manifest.yaml";
    pub const VALUES_FILE: &str = "values.json";
}

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_HELM_RELEASE: &str = "cortex-helm";
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_LOG_WINDOW_MINUTES: i64 = 60;
pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_BACKEND_URL: &str = "http://app.helm.getcortexapp.com";

/// Printed to stdout before each dumped object
pub const CONSOLE_SEPARATOR: &str = "----------";
