// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Turning cluster objects into text artifacts.

mod describe;

use crate::constants::DEFAULT_CHUNK_SIZE;
use crate::error::Result;
use k8s_openapi::api::core::v1::Event;
use kube::api::DynamicObject;

/// Options for the descriptive renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeOptions {
    /// Maximum bytes of an embedded value shown before truncation, 0 for no limit
    pub chunk_size: usize,
    /// Append events that reference the object
    pub show_events: bool,
}

impl Default for DescribeOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            show_events: false,
        }
    }
}

/// Strategy used to render an object
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Renderer {
    /// The object as returned by the server, serialized to YAML
    #[default]
    Structural,
    /// A human-oriented summary, similar to `kubectl describe`
    Describe(DescribeOptions),
}

impl Renderer {
    /// Whether events must be fetched before calling [`Renderer::render`]
    pub fn wants_events(&self) -> bool {
        matches!(self, Renderer::Describe(opts) if opts.show_events)
    }

    pub fn render(&self, obj: &DynamicObject, events: &[Event]) -> Result<String> {
        match self {
            Renderer::Structural => Ok(serde_yaml::to_string(obj)?),
            Renderer::Describe(opts) => describe::describe(obj, events, opts),
        }
    }
}
