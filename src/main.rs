use clap::Parser;
use shelfvault::cli::commands;
use shelfvault::cli::{output, Cli, Commands};
use shelfvault::errors::{Result, VaultError};

fn main() {
    shelfvault::logging::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Version => commands::version::execute(),
        Commands::Completions { shell } => commands::completions::execute(*shell),
        _ => run_async(&cli),
    };

    if let Err(e) = result {
        if let Some(message) = describe(&e) {
            output::error(&message);
        }
        std::process::exit(1);
    }
}

/// Commands that talk to the store run on a Tokio runtime.
fn run_async(cli: &Cli) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match &cli.command {
            Commands::Fetch => commands::fetch::execute(cli).await,
            Commands::Add {
                label,
                login,
                password,
            } => commands::add::execute(cli, label, login, password.as_deref()).await,
            Commands::Show { label } => commands::show::execute(cli, label).await,
            Commands::Version | Commands::Completions { .. } => Ok(()),
        }
    })
}

/// Text for the final error line, or `None` when a notification already
/// told the user.
fn describe(err: &VaultError) -> Option<String> {
    match err {
        VaultError::Notified => None,
        VaultError::InvalidKeys(e) => Some(output::translate(e.message_key()).to_string()),
        other => Some(other.to_string()),
    }
}
