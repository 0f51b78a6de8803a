// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Output tree layout and artifact persistence

use crate::constants::layout;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

/// Writes artifacts below a fixed output root
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and every fixed subdirectory. Failures are logged only.
    pub async fn prepare(&self) {
        for dir in std::iter::once(self.root.clone())
            .chain(layout::ALL.iter().map(|sub| self.root.join(sub)))
        {
            if let Err(e) = create_private_dir(&dir).await {
                error!("Error while creating directory {}: {}", dir.display(), e);
            }
        }
    }

    /// Path of the artifact for object `name` in `subdir`
    pub fn path_for(&self, subdir: &str, name: &str, extension: &str) -> PathBuf {
        self.root.join(subdir).join(format!("{}.{}", name, extension))
    }

    /// Write `content` plus a trailing newline to `path`, replacing any previous file
    #[instrument(skip(self, content), fields(path = %path.display()))]
    pub async fn persist(&self, path: &Path, content: &str) -> Result<()> {
        info!("Creating file: {}", path.display());
        let mut data = String::with_capacity(content.len() + 1);
        data.push_str(content);
        data.push('\n');
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}

#[cfg(unix)]
async fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .await
}

#[cfg(not(unix))]
async fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}
