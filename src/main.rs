// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brain_freeze::artifact::ArtifactWriter;
use brain_freeze::backend;
use brain_freeze::cli::{BackendCommand, Cli, Command, K8sCommand};
use brain_freeze::config::Config;
use brain_freeze::kubernetes::create_client;
use brain_freeze::logs::LogWindow;
use brain_freeze::render::Renderer;
use brain_freeze::snapshot::Snapshot;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the dumped objects
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let renderer = match &cli.command {
        Command::K8s(cmd) => cmd.renderer(),
        Command::Backend(_) => Renderer::Structural,
    };
    let config = Config::from_env(cli.output_dir.clone(), renderer);
    info!("Writing snapshot to {}", config.output_root.display());

    let writer = ArtifactWriter::new(config.output_root.clone());
    writer.prepare().await;

    match cli.command {
        Command::K8s(K8sCommand::Dump {
            cluster,
            helm_deployment,
            skip_helm,
            ..
        }) => {
            let client = create_client(cluster.kubeconfig.as_deref()).await?;
            let snapshot = Snapshot::new(client, &cluster.namespace, &config);
            let release = (!skip_helm).then_some(helm_deployment.as_str());
            snapshot.dump(release).await;
        }
        Command::K8s(K8sCommand::Logs {
            cluster,
            time_in_minutes,
        }) => {
            let client = create_client(cluster.kubeconfig.as_deref()).await?;
            let snapshot = Snapshot::new(client, &cluster.namespace, &config);
            snapshot.logs(LogWindow::from_minutes(time_in_minutes)).await;
        }
        Command::Backend(BackendCommand::Info { url, token }) => {
            info!("Running info command with URL: {}", url);
            backend::dump_info(&writer, &url, &token).await;
        }
    }

    Ok(())
}
