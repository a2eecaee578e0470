//! Error tracking hook.
//!
//! Every error a workflow catches is handed to an `ErrorReporter` before
//! it is turned into a generic notification.

use crate::errors::VaultError;

/// Destination for errors caught by the vault workflows.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, workflow: &'static str, error: &VaultError);
}

/// Reports errors as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, workflow: &'static str, error: &VaultError) {
        tracing::error!(workflow, error = %error, "vault workflow failed");
    }
}
