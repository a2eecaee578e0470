//! Remote session lifecycle.
//!
//! `SessionManager` owns at most one live session to the document store
//! and establishes it lazily:
//!
//! ```text
//! Uninitialized --ensure_session--> Establishing --ok--> Established
//!       ^                                |
//!       +-------------- error -----------+
//! ```
//!
//! Establishment is single-flight.  The first caller runs `connect`; any
//! caller arriving while it is in flight subscribes to the outcome and
//! receives the same session (or the same error) instead of connecting a
//! second time.  `Established` is terminal: the session is never replaced.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::errors::ConnectionError;
use crate::remote::{DocumentClient, RemoteConnector};
use crate::vault::AccessKeyPair;

/// Observable phase of the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Establishing,
    Established,
}

/// The live handle to the remote store.
///
/// Clones share the same underlying client.
#[derive(Clone)]
pub struct Session {
    client: Arc<dyn DocumentClient>,
    established_at: DateTime<Utc>,
}

impl Session {
    pub fn client(&self) -> &Arc<dyn DocumentClient> {
        &self.client
    }

    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    /// Returns `true` if both handles refer to the same client.
    pub fn same_client(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.client, &other.client)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("established_at", &self.established_at)
            .finish_non_exhaustive()
    }
}

type Outcome = Option<Result<Session, ConnectionError>>;

enum Next {
    Lead(watch::Sender<Outcome>),
    Wait(watch::Receiver<Outcome>),
}

enum Slot {
    Uninitialized,
    Establishing(watch::Receiver<Outcome>),
    Established(Session),
}

/// Single-flight owner of the process's remote session.
pub struct SessionManager {
    connector: Arc<dyn RemoteConnector>,
    slot: Mutex<Slot>,
}

impl SessionManager {
    pub fn new(connector: Arc<dyn RemoteConnector>) -> Self {
        Self {
            connector,
            slot: Mutex::new(Slot::Uninitialized),
        }
    }

    /// Current lifecycle phase.
    pub fn state(&self) -> SessionState {
        match &*self.slot.lock() {
            Slot::Uninitialized => SessionState::Uninitialized,
            Slot::Establishing(_) => SessionState::Establishing,
            Slot::Established(_) => SessionState::Established,
        }
    }

    /// The established session, if any.  Never touches the network.
    pub fn current(&self) -> Option<Session> {
        match &*self.slot.lock() {
            Slot::Established(session) => Some(session.clone()),
            _ => None,
        }
    }

    pub fn is_established(&self) -> bool {
        self.current().is_some()
    }

    /// Return the established session, establishing it first if needed.
    ///
    /// Only the admin key of `keys` is used; the shelf key never reaches
    /// the connector.
    pub async fn ensure_session(&self, keys: &AccessKeyPair) -> Result<Session, ConnectionError> {
        loop {
            let next = {
                let mut slot = self.slot.lock();
                if let Slot::Established(session) = &*slot {
                    return Ok(session.clone());
                }
                if let Slot::Establishing(rx) = &*slot {
                    Next::Wait(rx.clone())
                } else {
                    let (tx, rx) = watch::channel(None);
                    *slot = Slot::Establishing(rx);
                    Next::Lead(tx)
                }
            };

            let mut rx = match next {
                Next::Lead(tx) => return self.establish(keys, tx).await,
                Next::Wait(rx) => rx,
            };

            tracing::debug!("session establishment in flight, waiting for its outcome");
            let outcome = match rx.wait_for(Option::is_some).await {
                Ok(outcome) => outcome.clone(),
                // The establishing caller was dropped mid-flight and the
                // slot is back to `Uninitialized`; go round again.
                Err(_) => continue,
            };
            if let Some(result) = outcome {
                return result;
            }
        }
    }

    async fn establish(
        &self,
        keys: &AccessKeyPair,
        tx: watch::Sender<Outcome>,
    ) -> Result<Session, ConnectionError> {
        let mut reset = ResetOnDrop {
            slot: &self.slot,
            armed: true,
        };

        tracing::info!("establishing remote session");
        let result = self
            .connector
            .connect(keys.admin_key())
            .await
            .map(|client| Session {
                client,
                established_at: Utc::now(),
            })
            .map_err(ConnectionError::from);

        {
            let mut slot = self.slot.lock();
            *slot = match &result {
                Ok(session) => Slot::Established(session.clone()),
                Err(_) => Slot::Uninitialized,
            };
            reset.armed = false;
        }

        match &result {
            Ok(_) => tracing::info!("remote session established"),
            Err(e) => tracing::warn!(error = %e, "remote session could not be established"),
        }

        // Waiters may all be gone; that is fine.
        let _ = tx.send(Some(result.clone()));
        result
    }
}

/// Puts the slot back to `Uninitialized` if an establishing future is
/// dropped before it records an outcome.
struct ResetOnDrop<'a> {
    slot: &'a Mutex<Slot>,
    armed: bool,
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            *self.slot.lock() = Slot::Uninitialized;
            tracing::debug!("session establishment abandoned");
        }
    }
}
