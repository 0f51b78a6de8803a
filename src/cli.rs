// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command line surface

use crate::constants::{
    DEFAULT_BACKEND_URL, DEFAULT_CHUNK_SIZE, DEFAULT_HELM_RELEASE, DEFAULT_LOG_WINDOW_MINUTES,
    DEFAULT_NAMESPACE,
};
use crate::render::{DescribeOptions, Renderer};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "brain-freeze")]
#[command(about = "A CLI to debug the on-prem cortex k8s installation")]
pub struct Cli {
    /// Root directory of the snapshot (default: $BRAIN_FREEZE_OUTPUT_DIR or ./data)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Commands to help debug the cortex k8s & helm installation
    #[command(subcommand)]
    K8s(K8sCommand),
    /// Commands to fetch data from the backend
    #[command(subcommand)]
    Backend(BackendCommand),
}

#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// The namespace of the k8s environment to use for the API
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Absolute path to the kubeconfig file (default: inferred)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum K8sCommand {
    /// Dump the entire k8s and helm installation info
    Dump {
        #[command(flatten)]
        cluster: ClusterArgs,

        /// The name of the cortex helm-chart installation
        #[arg(long, default_value = DEFAULT_HELM_RELEASE)]
        helm_deployment: String,

        /// Do not dump the helm release
        #[arg(long)]
        skip_helm: bool,

        /// Write a human-oriented description instead of the raw object
        #[arg(long)]
        describe: bool,

        /// Bytes of each embedded value shown by --describe, 0 for everything
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Append events for each object to --describe output
        #[arg(long, requires = "describe")]
        show_events: bool,
    },
    /// Get logs from all the pods in the namespace for the last n minutes
    Logs {
        #[command(flatten)]
        cluster: ClusterArgs,

        /// Time (in minutes) to get the logs for
        #[arg(
            long,
            visible_alias = "timeInMinutes",
            default_value_t = DEFAULT_LOG_WINDOW_MINUTES,
            value_parser = clap::value_parser!(i64).range(1..)
        )]
        time_in_minutes: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum BackendCommand {
    /// Fetch all the debug info that is exposed to actuator/info
    Info {
        /// Base URL of the backend
        #[arg(long, default_value = DEFAULT_BACKEND_URL)]
        url: String,

        /// Bearer token for the backend
        #[arg(long, default_value = "")]
        token: String,
    },
}

impl K8sCommand {
    /// Renderer selected by the dump flags
    pub fn renderer(&self) -> Renderer {
        match self {
            K8sCommand::Dump {
                describe: true,
                chunk_size,
                show_events,
                ..
            } => Renderer::Describe(DescribeOptions {
                chunk_size: *chunk_size,
                show_events: *show_events,
            }),
            _ => Renderer::Structural,
        }
    }
}
