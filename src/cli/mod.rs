//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::sync::Arc;

use clap::Parser;
use zeroize::Zeroizing;

use crate::actions::VaultActions;
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::remote::FileStore;
use crate::vault::AccessKeyPair;

/// ShelfVault CLI: client-side encrypted password shelf.
#[derive(Parser)]
#[command(
    name = "shelfvault",
    about = "Client-side encrypted password shelf",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Shelf key: encrypts and decrypts every password on the shelf
    #[arg(
        long,
        env = "SHELFVAULT_SHELF_KEY",
        hide_env_values = true,
        global = true
    )]
    pub shelf_key: Option<String>,

    /// Admin key: authenticates against the credential store
    #[arg(
        long,
        env = "SHELFVAULT_ADMIN_KEY",
        hide_env_values = true,
        global = true
    )]
    pub admin_key: Option<String>,

    /// Store directory (overrides `store_dir` in .shelfvault.toml)
    #[arg(long, global = true)]
    pub store_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Connect to the store and list the labels on the shelf
    Fetch,

    /// Encrypt a new password and add it to the shelf
    Add {
        /// Label shown in the password list (e.g. email)
        label: String,

        /// Login stored alongside the password
        #[arg(short, long)]
        login: String,

        /// Password value (omit for interactive prompt or piped stdin)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Decrypt and print the passwords stored under a label
    Show {
        /// Label to reveal
        label: String,
    },

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve both access keys and check them against the length rules.
///
/// Each key is taken from its flag, then its environment variable (clap
/// handles both), then an interactive hidden prompt.
pub fn access_keys(cli: &Cli) -> Result<AccessKeyPair> {
    let admin_key = key_or_prompt(cli.admin_key.as_deref(), "Enter admin key")?;
    let shelf_key = key_or_prompt(cli.shelf_key.as_deref(), "Enter shelf key")?;

    let keys = AccessKeyPair::new(shelf_key.as_str(), admin_key.as_str());
    keys.validate()?;
    Ok(keys)
}

fn key_or_prompt(given: Option<&str>, prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(key) = given {
        if !key.is_empty() {
            return Ok(Zeroizing::new(key.to_string()));
        }
    }

    let key = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("key prompt: {e}")))?;
    Ok(Zeroizing::new(key))
}

/// Load `.shelfvault.toml` from the current directory.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if let Some(dir) = &cli.store_dir {
        settings.store_dir = dir.clone();
    }
    Ok(settings)
}

/// Show a failed workflow's notification and return `VaultError::Notified`.
///
/// The workflow already handed the underlying error to its reporter, so
/// the detail only goes to the debug log here.
pub fn workflow_failed(vault: &VaultActions, err: VaultError) -> VaultError {
    output::notification(&vault.overlay().notification());
    tracing::debug!(error = %err, "workflow failure shown as notification");
    VaultError::Notified
}

/// Build the vault workflows over the file-backed store.
pub fn open_vault(cli: &Cli) -> Result<VaultActions> {
    let settings = load_settings(cli)?;
    let cwd = std::env::current_dir()?;
    let store = FileStore::new(settings.store_path(&cwd));
    tracing::debug!(root = %store.root().display(), collection = %settings.collection, "opening shelf");
    Ok(VaultActions::from_settings(Arc::new(store), &settings))
}
