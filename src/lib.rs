// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod artifact;
pub mod backend;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dump;
pub mod error;
pub mod helm;
pub mod kubernetes;
pub mod logs;
pub mod render;
pub mod snapshot;

#[cfg(test)]
pub mod test_utils;
