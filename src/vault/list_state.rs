//! Password list state.
//!
//! The fetched records (still encrypted) and the option panel variant,
//! owned by `PasswordListStore` and changed only through its typed
//! transitions.  Each transition returns the new snapshot.

use parking_lot::RwLock;

use super::credential::EncryptedCredentialRecord;

/// Which form the option panel currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionPanelVariant {
    /// No shelf connected yet.
    #[default]
    ConnectPrompt,
    /// Shelf loaded, "add password" form folded away.
    EntityFormCollapsed,
    /// "Add password" form open.
    EntityFormExpanded,
}

/// Snapshot of the password list.
///
/// Records stay encrypted here; they are decrypted only for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordListState {
    pub passwords: Vec<EncryptedCredentialRecord>,
    pub current_option_panel_variant: OptionPanelVariant,
}

impl PasswordListState {
    /// Labels of all records, in store order.
    pub fn labels(&self) -> Vec<&str> {
        self.passwords.iter().map(|r| r.label.as_str()).collect()
    }
}

/// Owner of the password list state.
#[derive(Debug, Default)]
pub struct PasswordListStore {
    state: RwLock<PasswordListState>,
}

impl PasswordListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PasswordListState {
        self.state.read().clone()
    }

    pub fn switch_variant(&self, variant: OptionPanelVariant) -> PasswordListState {
        let mut state = self.state.write();
        state.current_option_panel_variant = variant;
        state.clone()
    }

    /// Install a freshly fetched record list and fold the panel to
    /// `EntityFormCollapsed`, both under one write lock.
    pub fn load_fetched(&self, passwords: Vec<EncryptedCredentialRecord>) -> PasswordListState {
        let mut state = self.state.write();
        state.passwords = passwords;
        state.current_option_panel_variant = OptionPanelVariant::EntityFormCollapsed;
        state.clone()
    }
}
