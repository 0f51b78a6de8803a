// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Time-windowed pod log retrieval

use crate::artifact::ArtifactWriter;
use crate::constants::{layout, sentinels};
use crate::error::{Result, SnapshotError};
use crate::kubernetes::ResourceClient;
use futures::io::{AsyncRead, AsyncReadExt};
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{ListParams, LogParams},
    Api, ResourceExt,
};
use std::pin::pin;
use tracing::{error, info, instrument, warn};

/// Lower bound of log retrieval, in seconds before now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogWindow {
    pub seconds: i64,
}

impl LogWindow {
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            seconds: minutes.saturating_mul(60),
        }
    }

    fn log_params(&self) -> LogParams {
        LogParams {
            since_seconds: Some(self.seconds),
            ..Default::default()
        }
    }
}

/// Fetch the logs of one pod for the window. Failures come back as sentinel strings.
#[instrument(skip(pods, pod_name, window), fields(pod = %pod_name, since_seconds = window.seconds))]
pub async fn get_pod_logs(pods: &Api<Pod>, pod_name: &str, window: LogWindow) -> String {
    let stream = match pods.log_stream(pod_name, &window.log_params()).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Error opening stream for pod {}: {}", pod_name, e);
            return sentinels::OPEN_STREAM_FAILED.to_string();
        }
    };

    drain_log_stream(pod_name, stream).await
}

/// Drain `stream`, mapping a read failure to its sentinel
async fn drain_log_stream<R: AsyncRead>(pod_name: &str, stream: R) -> String {
    match read_log_stream(stream).await {
        Ok(logs) => logs,
        Err(e) => {
            warn!("Error draining stream for pod {}: {}", pod_name, e);
            sentinels::COPY_STREAM_FAILED.to_string()
        }
    }
}

/// Read a log stream to the end. Anything read before a failure is dropped.
async fn read_log_stream<R: AsyncRead>(stream: R) -> Result<String> {
    let mut stream = pin!(stream);
    let mut buf = Vec::new();
    stream
        .read_to_end(&mut buf)
        .await
        .map_err(|e| SnapshotError::Stream(e.to_string()))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `logs/{pod}.log` for every pod in the namespace, one pod at a time
#[instrument(skip(resources, writer), fields(namespace = %resources.namespace()))]
pub async fn dump_pod_logs(
    resources: &ResourceClient,
    writer: &ArtifactWriter,
    window: LogWindow,
) -> usize {
    let pods = resources.pods();
    let pod_list = match pods.list(&ListParams::default()).await {
        Ok(list) => list,
        Err(e) => {
            error!("Error listing pods in namespace {}: {}", resources.namespace(), e);
            return 0;
        }
    };

    let mut written = 0;
    for pod in pod_list.items {
        let name = pod.name_any();
        info!("Getting logs for pod {} for seconds {}", name, window.seconds);

        let logs = get_pod_logs(&pods, &name, window).await;
        let path = writer.path_for(layout::LOGS, &name, layout::LOG_EXTENSION);
        match writer.persist(&path, &logs).await {
            Ok(()) => written += 1,
            Err(e) => error!(
                "Error writing logs of pod {} to {}: {}",
                name,
                path.display(),
                e
            ),
        }
    }
    written
}
