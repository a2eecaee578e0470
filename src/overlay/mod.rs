//! Notification and busy-state controller.
//!
//! Process-wide UI feedback: a busy flag for the global loader and a
//! single notification made of a message key and a severity.  The key is
//! opaque; turning it into text is the UI layer's job.
//!
//! State is last-write-wins.  When two workflows overlap, whichever
//! settles last decides what the user sees.  The controller is a
//! presentation aid, not a resource gate.

use std::fmt;

use parking_lot::RwLock;

/// Notification keys produced by the vault workflows.
pub mod messages {
    pub const PASSWORDS_FETCHED: &str = "snackbar.passwordsFetchedSuccessfully";
    pub const FETCH_FAILED: &str = "snackbar.couldNotFetchPasswords";
    pub const PASSWORD_CREATED: &str = "snackbar.newPasswordCreated";
    pub const CREATE_FAILED: &str = "snackbar.couldNotCreateNewPassword";
}

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// A message key paired with its severity.
///
/// The pair is only ever replaced as a whole, so a new message can never
/// be shown with a stale severity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub message_key: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message_key: impl Into<String>, severity: Severity) -> Self {
        Self {
            message_key: message_key.into(),
            severity,
        }
    }

    /// An empty message key means "nothing to show".
    pub fn is_visible(&self) -> bool {
        !self.message_key.is_empty()
    }
}

/// Snapshot of the overlay state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub is_busy: bool,
    pub notification: Notification,
}

impl OverlayState {
    pub fn is_visible(&self) -> bool {
        self.notification.is_visible()
    }
}

/// Owner of the overlay state.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    state: RwLock<OverlayState>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_busy(&self) {
        self.state.write().is_busy = true;
    }

    /// Clear the busy flag.  A no-op when it is already clear.
    pub fn hide_busy(&self) {
        self.state.write().is_busy = false;
    }

    /// Show the busy flag until the returned guard is released or dropped.
    pub fn busy(&self) -> BusyGuard<'_> {
        self.show_busy();
        BusyGuard {
            center: self,
            released: false,
        }
    }

    /// Replace the current notification.  Nothing clears it automatically.
    pub fn notify(&self, message_key: &str, severity: Severity) {
        tracing::debug!(message_key, %severity, "notification");
        self.state.write().notification = Notification::new(message_key, severity);
    }

    /// Clear the current notification, e.g. once the user dismissed it.
    pub fn dismiss(&self) {
        self.state.write().notification = Notification::default();
    }

    pub fn snapshot(&self) -> OverlayState {
        self.state.read().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.read().is_busy
    }

    pub fn is_visible(&self) -> bool {
        self.state.read().is_visible()
    }

    pub fn notification(&self) -> Notification {
        self.state.read().notification.clone()
    }
}

/// Keeps the busy flag raised for the lifetime of a workflow.
///
/// Dropping the guard (including when a workflow future is cancelled)
/// clears the flag.
#[must_use = "dropping the guard immediately clears the busy flag"]
pub struct BusyGuard<'a> {
    center: &'a NotificationCenter,
    released: bool,
}

impl BusyGuard<'_> {
    /// Clear the busy flag now.
    pub fn release(mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        if !self.released {
            self.center.hide_busy();
            self.released = true;
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_invisible() {
        let center = NotificationCenter::new();
        let state = center.snapshot();
        assert!(!state.is_busy);
        assert!(!state.is_visible());
        assert_eq!(state.notification.severity, Severity::Info);
    }

    #[test]
    fn hide_busy_is_idempotent() {
        let center = NotificationCenter::new();
        center.hide_busy();
        center.hide_busy();
        assert!(!center.is_busy());

        center.show_busy();
        center.hide_busy();
        center.hide_busy();
        assert!(!center.is_busy());
    }

    #[test]
    fn notify_replaces_key_and_severity_together() {
        let center = NotificationCenter::new();
        center.notify(messages::FETCH_FAILED, Severity::Error);
        center.notify(messages::PASSWORDS_FETCHED, Severity::Success);

        assert_eq!(
            center.notification(),
            Notification::new(messages::PASSWORDS_FETCHED, Severity::Success)
        );
        assert!(center.is_visible());
    }

    #[test]
    fn visibility_follows_message_key() {
        let center = NotificationCenter::new();
        center.notify("", Severity::Error);
        assert!(!center.is_visible());

        center.notify(messages::CREATE_FAILED, Severity::Error);
        assert!(center.is_visible());

        center.dismiss();
        assert!(!center.is_visible());
    }

    #[test]
    fn busy_guard_clears_on_drop() {
        let center = NotificationCenter::new();
        {
            let _busy = center.busy();
            assert!(center.is_busy());
        }
        assert!(!center.is_busy());
    }

    #[test]
    fn busy_guard_release_clears_once() {
        let center = NotificationCenter::new();
        let busy = center.busy();
        busy.release();
        assert!(!center.is_busy());

        // A later workflow's flag is not cleared by an old guard.
        center.show_busy();
        assert!(center.is_busy());
    }
}
