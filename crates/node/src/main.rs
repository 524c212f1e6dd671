// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource Manager Daemon (rmd)
//!
//! Boots every node of a cluster file in this process and serves until
//! interrupted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rm_adapters::TracingLogger;
use rm_node::{ClusterConfig, LocalCluster, LogConfig};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rmd", version, about = "Distributed resource manager daemon")]
struct Args {
    /// Path to the cluster file
    #[arg(short, long)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ClusterConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    // Held until exit so buffered file logs are flushed
    let _log_guard = setup_logging(&config.log)?;

    info!(
        "Starting rmd with {} node(s) from {}",
        config.nodes.len(),
        args.config.display()
    );

    let cluster = LocalCluster::start(&config, TracingLogger::new())
        .await
        .context("starting cluster")?;

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("Cluster ready: {}", format_nodes(&cluster));
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
    }

    let managers = cluster.shutdown().await?;
    info!("Stopped {} manager(s)", managers.len());
    Ok(())
}

fn format_nodes(cluster: &LocalCluster) -> String {
    cluster
        .addresses()
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn setup_logging(
    config: &LogConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.level.as_deref().unwrap_or("info"))
            .context("invalid log level")?,
    };

    let Some(path) = &config.file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("log file has no name: {}", path.display()))?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(Some(guard))
}
