// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::DEFAULT_OUTPUT_DIR;
use crate::render::Renderer;
use std::env;
use std::path::PathBuf;

pub const OUTPUT_DIR_VAR: &str = "BRAIN_FREEZE_OUTPUT_DIR";

/// Process configuration shared by every command
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the snapshot directory tree
    pub output_root: PathBuf,
    /// How dumped objects are turned into text
    pub renderer: Renderer,
}

impl Config {
    /// Resolve configuration from an optional CLI override and the environment
    pub fn from_env(output_dir: Option<PathBuf>, renderer: Renderer) -> Self {
        Self::resolve(output_dir, renderer, |key| env::var(key).ok())
    }

    fn resolve(
        output_dir: Option<PathBuf>,
        renderer: Renderer,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let output_root = output_dir
            .or_else(|| {
                lookup(OUTPUT_DIR_VAR)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Config {
            output_root,
            renderer,
        }
    }
}
