// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Application backend diagnostics exposed over the actuator endpoint

use crate::artifact::ArtifactWriter;
use crate::constants::layout;
use crate::error::{Result, SnapshotError};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{error, info, instrument, warn};
use url::Url;

const INFO_PATH: &str = "actuator/info";
const INFO_FILE: &str = "info.json";

/// Resolve the actuator info endpoint below `base`
pub fn info_url(base: &str) -> Result<Url> {
    let mut base = Url::parse(base)
        .map_err(|e| SnapshotError::Backend(format!("Invalid backend URL {}: {}", base, e)))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(INFO_PATH)
        .map_err(|e| SnapshotError::Backend(format!("Invalid backend URL: {}", e)))
}

/// GET the actuator info document. Error statuses still return the body
/// the backend sent, only transport failures are errors.
#[instrument(skip(token))]
pub async fn fetch_info(base: &str, token: &str) -> Result<String> {
    let url = info_url(base)?;
    info!("Requesting {}", url);

    let response = reqwest::Client::new()
        .get(url)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| SnapshotError::Backend(format!("Error making request: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        warn!("Backend answered {} for {}", status, response.url());
    }

    response
        .text()
        .await
        .map_err(|e| SnapshotError::Backend(format!("Error reading response body: {}", e)))
}

/// Write `actuator/info.json`. Failures are logged only.
pub async fn dump_info(writer: &ArtifactWriter, base: &str, token: &str) {
    let body = match fetch_info(base, token).await {
        Ok(body) => body,
        Err(e) => {
            error!("Error fetching backend info: {}", e);
            return;
        }
    };

    let path = writer.root().join(layout::ACTUATOR).join(INFO_FILE);
    if let Err(e) = writer.persist(&path, &body).await {
        error!("Error writing backend info: {}", e);
    }
}
