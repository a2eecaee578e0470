//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  This is also where message
//! keys produced by the vault workflows are turned into English text.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::overlay::{messages, Notification, Severity};
use crate::vault::{CredentialEntity, PasswordListState};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// English text for a message key.  Unknown keys are shown as-is.
pub fn translate(message_key: &str) -> &str {
    match message_key {
        messages::PASSWORDS_FETCHED => "Passwords fetched successfully",
        messages::FETCH_FAILED => "Could not fetch passwords",
        messages::PASSWORD_CREATED => "New password created",
        messages::CREATE_FAILED => "Could not create new password",
        "settings.adminKeyTooShort" => "Admin key must be at least 10 characters",
        "optionsPanel.shelfKeyTooShort" => "Shelf key must be at least 6 characters",
        other => other,
    }
}

/// Print the current notification, if any, styled by severity.
pub fn notification(notification: &Notification) {
    if !notification.is_visible() {
        return;
    }
    let text = translate(&notification.message_key);
    match notification.severity {
        Severity::Success => success(text),
        Severity::Error => error(text),
        Severity::Info => info(text),
    }
}

/// Print a table of the labels on the shelf.
///
/// Values stay encrypted; only labels are shown.
pub fn print_labels_table(state: &PasswordListState) {
    if state.passwords.is_empty() {
        info("No passwords on this shelf yet.");
        tip("Run `shelfvault add <LABEL> --login <LOGIN>` to add your first password.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Label"]);

    for (i, label) in state.labels().into_iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), label.to_string()]);
    }

    println!("{table}");
}

/// Print a decrypted credential.
pub fn print_credential(entity: &CredentialEntity) {
    println!("{}", style(&entity.label).bold());
    println!("  login:    {}", entity.login);
    println!("  password: {}", entity.password);
}
