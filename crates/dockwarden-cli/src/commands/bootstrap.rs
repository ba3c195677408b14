//! `dockwarden bootstrap`: Ensure the admin account exists.

use anyhow::Context;
use clap::Args;
use dockwarden_common::config::WardenConfig;
use dockwarden_common::constants::ADMIN_USERNAME;
use dockwarden_store::JsonStore;
use dockwarden_store::bootstrap::ensure_admin;

/// Arguments for the `bootstrap` command.
#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Credential for the admin account if it has to be created.
    #[arg(long, env = "DOCKWARDEN_BOOTSTRAP_CREDENTIAL", hide_env_values = true)]
    pub credential: Option<String>,
}

/// Executes the `bootstrap` command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or written.
pub fn execute(args: BootstrapArgs, config: &WardenConfig) -> anyhow::Result<()> {
    let store = JsonStore::open(config.state_file.clone())
        .with_context(|| format!("failed to open store {}", config.state_file.display()))?;
    let credential = args
        .credential
        .as_deref()
        .unwrap_or(&config.bootstrap_credential);

    match ensure_admin(&store, credential)? {
        Some(id) => println!("Created admin account '{ADMIN_USERNAME}' (id {id})."),
        None => println!("Admin account '{ADMIN_USERNAME}' already exists."),
    }
    println!("Store: {}", config.state_file.display());
    Ok(())
}
