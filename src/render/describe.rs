// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Narrative rendering of well-known kinds, in the spirit of `kubectl describe`

use super::DescribeOptions;
use crate::error::Result;
use k8s_openapi::chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Event, Pod, Secret, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::DynamicObject;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt::{Display, Write};

const LABEL_WIDTH: usize = 14;
const NONE: &str = "<none>";
const UNSET: &str = "<unset>";

pub(super) fn describe(
    obj: &DynamicObject,
    events: &[Event],
    opts: &DescribeOptions,
) -> Result<String> {
    let kind = obj.types.as_ref().map(|t| t.kind.as_str()).unwrap_or_default();
    let mut out = String::new();

    match kind {
        "Deployment" => describe_deployment(&mut out, &parse(obj)?),
        "Pod" => describe_pod(&mut out, &parse(obj)?),
        "ConfigMap" => describe_config_map(&mut out, &parse(obj)?, opts.chunk_size),
        "Service" => describe_service(&mut out, &parse(obj)?),
        "Secret" => describe_secret(&mut out, &parse(obj)?),
        _ => describe_metadata(&mut out, &obj.metadata),
    }

    if opts.show_events {
        describe_events(&mut out, events);
    }

    Ok(out)
}

fn parse<K: DeserializeOwned>(obj: &DynamicObject) -> Result<K> {
    Ok(serde_json::from_value(serde_json::to_value(obj)?)?)
}

fn field(out: &mut String, label: &str, value: impl Display) {
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", format!("{}:", label), value);
}

fn opt_str(value: Option<&String>) -> &str {
    value.map(String::as_str).unwrap_or(NONE)
}

fn map_field(out: &mut String, label: &str, map: Option<&BTreeMap<String, String>>) {
    match map.filter(|m| !m.is_empty()) {
        None => field(out, label, NONE),
        Some(map) => {
            for (i, (k, v)) in map.iter().enumerate() {
                if i == 0 {
                    field(out, label, format!("{}={}", k, v));
                } else {
                    let _ = writeln!(out, "{:LABEL_WIDTH$}{}={}", "", k, v);
                }
            }
        }
    }
}

fn describe_metadata(out: &mut String, meta: &ObjectMeta) {
    field(out, "Name", opt_str(meta.name.as_ref()));
    field(out, "Namespace", opt_str(meta.namespace.as_ref()));
    map_field(out, "Labels", meta.labels.as_ref());
    map_field(out, "Annotations", meta.annotations.as_ref());
}

fn conditions<'a>(
    out: &mut String,
    rows: impl Iterator<Item = (&'a str, &'a str, Option<&'a String>)>,
) {
    let rows: Vec<_> = rows.collect();
    if rows.is_empty() {
        return;
    }
    out.push_str("Conditions:\n");
    let _ = writeln!(out, "  {:<24}{:<8}{}", "Type", "Status", "Reason");
    let _ = writeln!(out, "  {:<24}{:<8}{}", "----", "------", "------");
    for (type_, status, reason) in rows {
        let _ = writeln!(out, "  {:<24}{:<8}{}", type_, status, opt_str(reason));
    }
}

fn describe_deployment(out: &mut String, deploy: &Deployment) {
    describe_metadata(out, &deploy.metadata);

    let spec = deploy.spec.as_ref();
    let status = deploy.status.as_ref();
    let desired = spec
        .and_then(|s| s.replicas)
        .map(|r| r.to_string())
        .unwrap_or_else(|| UNSET.to_string());
    let updated = status.and_then(|s| s.updated_replicas).unwrap_or(0);
    let ready = status.and_then(|s| s.ready_replicas).unwrap_or(0);
    let available = status.and_then(|s| s.available_replicas).unwrap_or(0);
    field(
        out,
        "Replicas",
        format!(
            "{} desired | {} updated | {} ready | {} available",
            desired, updated, ready, available
        ),
    );

    let strategy = spec
        .and_then(|s| s.strategy.as_ref())
        .and_then(|s| s.type_.as_ref());
    field(out, "StrategyType", opt_str(strategy));
    map_field(
        out,
        "Selector",
        spec.and_then(|s| s.selector.match_labels.as_ref()),
    );

    let containers = spec
        .and_then(|s| s.template.spec.as_ref())
        .map(|p| p.containers.as_slice())
        .unwrap_or_default();
    out.push_str("Containers:\n");
    for c in containers {
        let _ = writeln!(out, "  {}:", c.name);
        let _ = writeln!(out, "    Image:  {}", opt_str(c.image.as_ref()));
    }

    conditions(
        out,
        status
            .and_then(|s| s.conditions.as_ref())
            .into_iter()
            .flatten()
            .map(|c| (c.type_.as_str(), c.status.as_str(), c.reason.as_ref())),
    );
}

fn describe_pod(out: &mut String, pod: &Pod) {
    describe_metadata(out, &pod.metadata);

    let spec = pod.spec.as_ref();
    let status = pod.status.as_ref();
    field(out, "Node", opt_str(spec.and_then(|s| s.node_name.as_ref())));
    field(out, "Status", opt_str(status.and_then(|s| s.phase.as_ref())));
    field(out, "IP", opt_str(status.and_then(|s| s.pod_ip.as_ref())));
    field(out, "Host IP", opt_str(status.and_then(|s| s.host_ip.as_ref())));

    let statuses = status
        .and_then(|s| s.container_statuses.as_ref())
        .map(Vec::as_slice)
        .unwrap_or_default();

    out.push_str("Containers:\n");
    for c in spec.map(|s| s.containers.as_slice()).unwrap_or_default() {
        let _ = writeln!(out, "  {}:", c.name);
        let _ = writeln!(out, "    Image:          {}", opt_str(c.image.as_ref()));
        if let Some(cs) = statuses.iter().find(|cs| cs.name == c.name) {
            let state = cs
                .state
                .as_ref()
                .map(|st| {
                    if st.running.is_some() {
                        "Running".to_string()
                    } else if let Some(w) = &st.waiting {
                        format!("Waiting ({})", opt_str(w.reason.as_ref()))
                    } else if let Some(t) = &st.terminated {
                        format!(
                            "Terminated ({}, exit {})",
                            opt_str(t.reason.as_ref()),
                            t.exit_code
                        )
                    } else {
                        NONE.to_string()
                    }
                })
                .unwrap_or_else(|| NONE.to_string());
            let _ = writeln!(out, "    State:          {}", state);
            let _ = writeln!(out, "    Ready:          {}", cs.ready);
            let _ = writeln!(out, "    Restart Count:  {}", cs.restart_count);
        }
    }

    conditions(
        out,
        status
            .and_then(|s| s.conditions.as_ref())
            .into_iter()
            .flatten()
            .map(|c| (c.type_.as_str(), c.status.as_str(), c.reason.as_ref())),
    );
}

/// Cut `value` to at most `chunk_size` bytes on a char boundary and mark the cut
fn truncate(value: &str, chunk_size: usize) -> String {
    if chunk_size == 0 || value.len() <= chunk_size {
        return value.to_string();
    }
    let mut end = chunk_size;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated {} bytes]", &value[..end], value.len() - end)
}

fn describe_config_map(out: &mut String, cm: &ConfigMap, chunk_size: usize) {
    describe_metadata(out, &cm.metadata);

    out.push_str("\nData\n====\n");
    for (key, value) in cm.data.iter().flatten() {
        let _ = writeln!(out, "{}:\n----\n{}\n", key, truncate(value, chunk_size));
    }

    if let Some(binary) = cm.binary_data.as_ref().filter(|b| !b.is_empty()) {
        out.push_str("\nBinaryData\n====\n");
        for (key, value) in binary {
            let _ = writeln!(out, "{}: {} bytes", key, value.0.len());
        }
    }
}

fn describe_service(out: &mut String, svc: &Service) {
    describe_metadata(out, &svc.metadata);

    let spec = svc.spec.as_ref();
    map_field(out, "Selector", spec.and_then(|s| s.selector.as_ref()));
    field(out, "Type", opt_str(spec.and_then(|s| s.type_.as_ref())));
    field(out, "IP", opt_str(spec.and_then(|s| s.cluster_ip.as_ref())));

    let ports = spec
        .and_then(|s| s.ports.as_ref())
        .map(Vec::as_slice)
        .unwrap_or_default();
    if ports.is_empty() {
        field(out, "Ports", NONE);
    }
    for port in ports {
        let target = match &port.target_port {
            Some(IntOrString::Int(p)) => p.to_string(),
            Some(IntOrString::String(s)) => s.clone(),
            None => port.port.to_string(),
        };
        let protocol = port.protocol.as_deref().unwrap_or("TCP");
        field(
            out,
            "Port",
            format!(
                "{} {}/{} -> {}",
                port.name.as_deref().unwrap_or("<unnamed>"),
                port.port,
                protocol,
                target
            ),
        );
    }
}

fn describe_secret(out: &mut String, secret: &Secret) {
    describe_metadata(out, &secret.metadata);
    field(out, "Type", opt_str(secret.type_.as_ref()));

    out.push_str("\nData\n====\n");
    for (key, value) in secret.data.iter().flatten() {
        let _ = writeln!(out, "{}:  {} bytes", key, value.0.len());
    }
}

fn describe_events(out: &mut String, events: &[Event]) {
    if events.is_empty() {
        field(out, "Events", NONE);
        return;
    }
    out.push_str("Events:\n");
    let _ = writeln!(out, "  {:<8}{:<24}{:<27}{}", "Type", "Reason", "Last Seen", "Message");
    let _ = writeln!(out, "  {:<8}{:<24}{:<27}{}", "----", "------", "---------", "-------");

    // oldest first, like kubectl
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| last_seen(e));
    for e in sorted {
        let seen = last_seen(e)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "<unknown>".to_string());
        let _ = writeln!(
            out,
            "  {:<8}{:<24}{:<27}{}",
            opt_str(e.type_.as_ref()),
            opt_str(e.reason.as_ref()),
            seen,
            e.message.as_deref().unwrap_or("").trim_end()
        );
    }
}

fn last_seen(event: &Event) -> Option<DateTime<Utc>> {
    event
        .last_timestamp
        .as_ref()
        .map(|t| t.0)
        .or_else(|| event.event_time.as_ref().map(|t| t.0))
}
