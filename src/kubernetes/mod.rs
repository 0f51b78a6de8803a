// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation and namespaced resource access.

pub mod client;
pub mod resources;

pub use client::create_client;
pub use resources::{ResourceClient, ResourceKind};
