//! `shelfvault add` — encrypt a new password and add it to the shelf.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{access_keys, open_vault, workflow_failed, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::CredentialEntity;

/// Execute the `add` command.
pub async fn execute(cli: &Cli, label: &str, login: &str, password: Option<&str>) -> Result<()> {
    if label.trim().is_empty() {
        return Err(VaultError::CommandFailed("label cannot be empty".into()));
    }

    // Determine the password from one of three sources.
    let password = if let Some(p) = password {
        // Source 1: Inline value on the command line.
        output::warning("Password provided on the command line. It may appear in shell history.");
        Zeroizing::new(p.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end().to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        let p = dialoguer::Password::new()
            .with_prompt(format!("Enter password for {label}"))
            .with_confirmation("Confirm password", "Passwords do not match, try again")
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
        Zeroizing::new(p)
    };

    let keys = access_keys(cli)?;
    let vault = open_vault(cli)?;

    // Adding needs an established session; fetching sets it up the same
    // way opening the shelf does.
    let state = vault
        .fetch_passwords(&keys)
        .await
        .map_err(|e| workflow_failed(&vault, e))?;

    let entity = CredentialEntity::new(label, login, password.as_str());
    vault
        .add_one(&entity, &keys)
        .await
        .map_err(|e| workflow_failed(&vault, e))?;
    output::notification(&vault.overlay().notification());

    output::success(&format!(
        "Password '{}' added ({} total)",
        label,
        state.passwords.len() + 1
    ));
    output::tip(&format!("Reveal it with: shelfvault show {label}"));

    Ok(())
}
