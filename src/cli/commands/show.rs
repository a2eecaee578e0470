//! `shelfvault show` — decrypt and print the passwords under a label.

use crate::cli::output;
use crate::cli::{access_keys, open_vault, workflow_failed, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `show` command.
pub async fn execute(cli: &Cli, label: &str) -> Result<()> {
    let keys = access_keys(cli)?;
    let vault = open_vault(cli)?;

    let state = vault
        .fetch_passwords(&keys)
        .await
        .map_err(|e| workflow_failed(&vault, e))?;

    // Labels are not unique; reveal every match.
    let matches: Vec<_> = state.passwords.iter().filter(|r| r.label == label).collect();
    if matches.is_empty() {
        return Err(VaultError::CommandFailed(format!(
            "no password labelled '{label}' on this shelf"
        )));
    }

    for record in matches {
        let entity = vault.reveal(record, keys.master_secret())?;
        output::print_credential(&entity);
    }

    Ok(())
}
