//! `shelfvault version` — display version.

/// Execute the `version` command.
pub fn execute() -> crate::errors::Result<()> {
    println!("shelfvault {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
