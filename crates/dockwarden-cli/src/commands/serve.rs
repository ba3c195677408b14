//! `dockwarden serve`: Bootstrap the admin account and serve the HTTP API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, ValueEnum};
use dockwarden_common::config::WardenConfig;
use dockwarden_common::constants::DEFAULT_BOOTSTRAP_CREDENTIAL;
use dockwarden_control::ControlPlane;
use dockwarden_runtime::ContainerGateway;
use dockwarden_runtime::gateway::docker::DockerCliGateway;
use dockwarden_runtime::gateway::memory::InMemoryGateway;
use dockwarden_store::JsonStore;

/// Which engine backend the control plane drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// The local Docker engine through the `docker` CLI.
    Docker,
    /// An empty in-process engine, for dry runs.
    Memory,
}

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (default 127.0.0.1:8080).
    #[arg(long, env = "DOCKWARDEN_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Explicit path to the docker binary.
    #[arg(long)]
    pub docker_binary: Option<PathBuf>,

    /// Engine backend.
    #[arg(long, value_enum, default_value_t = EngineKind::Docker)]
    pub engine: EngineKind,
}

/// Executes the `serve` command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the engine binary
/// cannot be found, or the listener fails.
pub fn execute(args: ServeArgs, mut config: WardenConfig) -> anyhow::Result<()> {
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    if let Some(binary) = args.docker_binary {
        config.docker_binary = Some(binary);
    }

    let store = Arc::new(
        JsonStore::open(config.state_file.clone())
            .with_context(|| format!("failed to open store {}", config.state_file.display()))?,
    );
    let gateway: Arc<dyn ContainerGateway> = match args.engine {
        EngineKind::Docker => Arc::new(DockerCliGateway::from_config(config.docker_binary.as_deref())?),
        EngineKind::Memory => Arc::new(InMemoryGateway::new()),
    };
    if !gateway.is_available() {
        tracing::warn!("container engine is not reachable; engine calls will fail until it is");
    }

    let plane = ControlPlane::new(store.clone(), store, gateway)
        .with_log_tail_lines(config.log_tail_lines);
    if let Some(id) = plane.bootstrap(&config.bootstrap_credential)? {
        tracing::info!(id = %id, "bootstrap admin created");
        if config.bootstrap_credential == DEFAULT_BOOTSTRAP_CREDENTIAL {
            tracing::warn!("admin uses the default credential; change it before exposing the API");
        }
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime
        .block_on(dockwarden_server::serve(Arc::new(plane), config.listen, shutdown_signal()))
        .with_context(|| format!("failed to serve on {}", config.listen))?;
    tracing::info!("control plane stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
