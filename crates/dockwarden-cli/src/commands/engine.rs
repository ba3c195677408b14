//! `dockwarden engine`: Report whether the container engine is reachable.

use clap::Args;
use dockwarden_common::config::WardenConfig;
use dockwarden_runtime::gateway::docker::DockerCliGateway;
use std::path::PathBuf;

/// Arguments for the `engine` command.
#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Explicit path to the docker binary.
    #[arg(long)]
    pub docker_binary: Option<PathBuf>,
}

/// Executes the `engine` command.
///
/// # Errors
///
/// Returns an error if no docker binary is found or the daemon does not
/// answer.
pub fn execute(args: &EngineArgs, config: &WardenConfig) -> anyhow::Result<()> {
    let binary = args.docker_binary.as_deref().or(config.docker_binary.as_deref());
    let gateway = DockerCliGateway::from_config(binary)?;
    println!("Binary:  {}", gateway.binary().display());
    let version = gateway.server_version()?;
    println!("Server:  {version}");
    Ok(())
}
