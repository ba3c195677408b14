//! CLI command definitions and dispatch.

pub mod bootstrap;
pub mod engine;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dockwarden_common::config::WardenConfig;

/// Dockwarden: role-gated control plane for Docker containers.
#[derive(Parser, Debug)]
#[command(name = "dockwarden", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file.
    #[arg(long, global = true, env = "DOCKWARDEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the JSON store (overrides the configuration file).
    #[arg(long, global = true, env = "DOCKWARDEN_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bootstrap the admin account and serve the HTTP API.
    Serve(serve::ServeArgs),
    /// Ensure the admin account exists.
    Bootstrap(bootstrap::BootstrapArgs),
    /// Report whether the container engine is reachable.
    Engine(engine::EngineArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref(), cli.state_file)?;
    match cli.command {
        Command::Serve(args) => serve::execute(args, config),
        Command::Bootstrap(args) => bootstrap::execute(args, &config),
        Command::Engine(args) => engine::execute(&args, &config),
    }
}

/// Loads the configuration file if one was named and applies the global
/// overrides.
fn resolve_config(path: Option<&Path>, state_file: Option<PathBuf>) -> anyhow::Result<WardenConfig> {
    let mut config = match path {
        Some(path) => WardenConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => WardenConfig::default(),
    };
    if let Some(state_file) = state_file {
        config.state_file = state_file;
    }
    Ok(config)
}
