//! `shelfvault fetch` — connect to the store and list the shelf's labels.

use crate::cli::output;
use crate::cli::{access_keys, open_vault, workflow_failed, Cli};
use crate::errors::Result;

/// Execute the `fetch` command.
pub async fn execute(cli: &Cli) -> Result<()> {
    let keys = access_keys(cli)?;
    let vault = open_vault(cli)?;

    let state = vault
        .fetch_passwords(&keys)
        .await
        .map_err(|e| workflow_failed(&vault, e))?;
    output::notification(&vault.overlay().notification());

    output::info(&format!("{} password(s) on this shelf", state.passwords.len()));
    output::print_labels_table(&state);

    Ok(())
}
