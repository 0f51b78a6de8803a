// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! List, filter, render and persist every object of a resource kind.

use crate::artifact::ArtifactWriter;
use crate::constants::{layout, CONSOLE_SEPARATOR};
use crate::kubernetes::{ResourceClient, ResourceKind};
use crate::render::Renderer;
use k8s_openapi::api::core::v1::Event;
use kube::api::DynamicObject;
use kube::ResourceExt;
use tracing::{debug, error, info, instrument, warn};

/// Decides by name whether an object is dumped
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DumpFilter {
    #[default]
    IncludeAll,
    /// Skip objects whose name starts with the prefix
    ExcludePrefix(String),
}

impl DumpFilter {
    pub fn include_by_name(&self, name: &str) -> bool {
        match self {
            DumpFilter::IncludeAll => true,
            DumpFilter::ExcludePrefix(prefix) => !name.starts_with(prefix.as_str()),
        }
    }
}

/// One resource kind to dump, with its filter and output subdirectory
#[derive(Debug, Clone)]
pub struct DumpTarget {
    pub kind: ResourceKind,
    pub filter: DumpFilter,
    pub subdir: String,
}

impl DumpTarget {
    pub fn new(kind: ResourceKind, subdir: &str) -> Self {
        Self {
            kind,
            filter: DumpFilter::IncludeAll,
            subdir: subdir.to_string(),
        }
    }

    pub fn with_filter(mut self, filter: DumpFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Outcome counters for one target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpReport {
    pub listed: usize,
    pub skipped: usize,
    pub written: usize,
    pub failed: usize,
}

/// Runs dump targets against one namespace
pub struct Dumper {
    resources: ResourceClient,
    renderer: Renderer,
    writer: ArtifactWriter,
}

impl Dumper {
    pub fn new(resources: ResourceClient, renderer: Renderer, writer: ArtifactWriter) -> Self {
        Self {
            resources,
            renderer,
            writer,
        }
    }

    /// Dump every object of the target. Never fails; errors are logged per object.
    #[instrument(skip(self, target), fields(kind = %target.kind, namespace = %self.resources.namespace()))]
    pub async fn dump(&self, target: &DumpTarget) -> DumpReport {
        let mut report = DumpReport::default();

        let items = match self.resources.list(&target.kind).await {
            Ok(items) => items,
            Err(e) => {
                error!(
                    "Error listing {} resources in namespace {}: {}",
                    target.kind,
                    self.resources.namespace(),
                    e
                );
                return report;
            }
        };
        report.listed = items.len();

        for name in items.iter().map(ResourceExt::name_any) {
            if !target.filter.include_by_name(&name) {
                report.skipped += 1;
                continue;
            }

            if self.dump_one(target, &name).await {
                report.written += 1;
            } else {
                report.failed += 1;
            }
        }

        info!(
            "Dumped {} of {} {} ({} skipped, {} failed)",
            report.written, report.listed, target.kind, report.skipped, report.failed
        );
        report
    }

    async fn dump_one(&self, target: &DumpTarget, name: &str) -> bool {
        let obj = match self.resources.get(&target.kind, name).await {
            Ok(obj) => obj,
            Err(e) => {
                error!("Error getting {} {}: {}", target.kind, name, e);
                return false;
            }
        };

        let events = self.events_for(&obj).await;
        let text = match self.renderer.render(&obj, &events) {
            Ok(text) => text,
            Err(e) => {
                error!("Error rendering {} {}: {}", target.kind, name, e);
                return false;
            }
        };

        println!("{}", CONSOLE_SEPARATOR);
        println!("{}: {}", target.kind, name);
        println!("{}", text);

        let path = self
            .writer
            .path_for(&target.subdir, name, layout::OBJECT_EXTENSION);
        match self.writer.persist(&path, &text).await {
            Ok(()) => true,
            Err(e) => {
                error!(
                    "Error writing {} {} to {}: {}",
                    target.kind,
                    name,
                    path.display(),
                    e
                );
                false
            }
        }
    }

    async fn events_for(&self, obj: &DynamicObject) -> Vec<Event> {
        if !self.renderer.wants_events() {
            return Vec::new();
        }
        match self.resources.events_for(obj).await {
            Ok(events) => {
                debug!("Found {} events for {}", events.len(), obj.name_any());
                events
            }
            Err(e) => {
                warn!("Error listing events for {}: {}", obj.name_any(), e);
                Vec::new()
            }
        }
    }
}
