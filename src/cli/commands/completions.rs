//! `shelfvault completions` — generate shell completion scripts.
//!
//! Usage:
//!   shelfvault completions bash > ~/.bash_completion.d/shelfvault
//!   shelfvault completions zsh

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    render(shell, &mut io::stdout());
    Ok(())
}

fn render(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_every_subcommand() {
        let mut buf = Vec::new();
        render(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();

        assert!(script.contains("shelfvault"));
        for sub in ["fetch", "add", "show", "completions"] {
            assert!(script.contains(sub), "missing {sub}");
        }
    }

    #[test]
    fn fish_script_is_generated() {
        let mut buf = Vec::new();
        render(Shell::Fish, &mut buf);
        assert!(!buf.is_empty());
    }
}
