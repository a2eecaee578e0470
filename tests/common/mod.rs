//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use shelfvault::actions::{ErrorReporter, VaultActions};
use shelfvault::crypto::kdf::MIN_MEMORY_KIB;
use shelfvault::crypto::{Argon2Params, CipherService};
use shelfvault::errors::{StoreError, VaultError};
use shelfvault::remote::{DocumentClient, DocumentId, MemoryStore, RemoteConnector};
use shelfvault::session::SessionState;
use shelfvault::vault::{AccessKeyPair, AdminKey};

pub const SHELF_KEY: &str = "shelf123";
pub const ADMIN_KEY: &str = "admin1234567890";

pub fn keys() -> AccessKeyPair {
    AccessKeyPair::new(SHELF_KEY, ADMIN_KEY)
}

/// Cheapest Argon2 cost the cipher accepts.
pub fn fast_params() -> Argon2Params {
    Argon2Params {
        memory_kib: MIN_MEMORY_KIB,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn fast_cipher() -> CipherService {
    CipherService::new(fast_params())
}

/// Switches that make the connector or its clients fail.
#[derive(Default)]
pub struct Faults {
    pub connect: AtomicBool,
    pub list: AtomicBool,
    pub create: AtomicBool,
}

impl Faults {
    pub fn set(flag: &AtomicBool, on: bool) {
        flag.store(on, Ordering::SeqCst);
    }
}

/// Which store call a gated connector holds back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Connect,
    List,
    Create,
}

/// Per-call counters, bumped before a call waits at its gate.
#[derive(Default)]
pub struct Calls {
    pub connects: AtomicUsize,
    pub lists: AtomicUsize,
    pub creates: AtomicUsize,
}

/// A `MemoryStore` wrapper that counts calls, can hold one kind of call
/// at a gate, injects failures and records every document handed to
/// `create`.
pub struct TestConnector {
    pub store: MemoryStore,
    pub faults: Arc<Faults>,
    pub captured: Arc<Mutex<Vec<serde_json::Value>>>,
    calls: Arc<Calls>,
    gate: Option<(Gate, Arc<Semaphore>)>,
}

impl TestConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(None))
    }

    /// Every `connect` waits for one permit on the returned semaphore.
    pub fn gated() -> (Arc<Self>, Arc<Semaphore>) {
        Self::gated_at(Gate::Connect)
    }

    /// Every call of kind `gate` waits for one permit on the returned
    /// semaphore.
    pub fn gated_at(gate: Gate) -> (Arc<Self>, Arc<Semaphore>) {
        let semaphore = Arc::new(Semaphore::new(0));
        let connector = Self::build(Some((gate, Arc::clone(&semaphore))));
        (Arc::new(connector), semaphore)
    }

    fn build(gate: Option<(Gate, Arc<Semaphore>)>) -> Self {
        Self {
            store: MemoryStore::new(),
            faults: Arc::new(Faults::default()),
            captured: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Calls::default()),
            gate,
        }
    }

    fn gate_for(&self, kind: Gate) -> Option<Arc<Semaphore>> {
        match &self.gate {
            Some((gated, semaphore)) if *gated == kind => Some(Arc::clone(semaphore)),
            _ => None,
        }
    }

    pub fn connects(&self) -> usize {
        self.calls.connects.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.calls.lists.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.calls.creates.load(Ordering::SeqCst)
    }

    pub fn captured(&self) -> Vec<serde_json::Value> {
        self.captured.lock().clone()
    }
}

async fn pass(gate: &Option<Arc<Semaphore>>) -> Result<(), StoreError> {
    if let Some(gate) = gate {
        gate.acquire()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .forget();
    }
    Ok(())
}

#[async_trait]
impl RemoteConnector for TestConnector {
    async fn connect(&self, admin_key: &AdminKey) -> Result<Arc<dyn DocumentClient>, StoreError> {
        self.calls.connects.fetch_add(1, Ordering::SeqCst);
        pass(&self.gate_for(Gate::Connect)).await?;

        if self.faults.connect.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store offline".into()));
        }

        let inner = self.store.connect(admin_key).await?;
        Ok(Arc::new(TestClient {
            inner,
            faults: Arc::clone(&self.faults),
            captured: Arc::clone(&self.captured),
            calls: Arc::clone(&self.calls),
            list_gate: self.gate_for(Gate::List),
            create_gate: self.gate_for(Gate::Create),
        }))
    }
}

struct TestClient {
    inner: Arc<dyn DocumentClient>,
    faults: Arc<Faults>,
    captured: Arc<Mutex<Vec<serde_json::Value>>>,
    calls: Arc<Calls>,
    list_gate: Option<Arc<Semaphore>>,
    create_gate: Option<Arc<Semaphore>>,
}

#[async_trait]
impl DocumentClient for TestClient {
    async fn create(
        &self,
        collection: &str,
        document: serde_json::Value,
    ) -> Result<DocumentId, StoreError> {
        self.calls.creates.fetch_add(1, Ordering::SeqCst);
        pass(&self.create_gate).await?;

        self.captured.lock().push(document.clone());
        if self.faults.create.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write rejected".into()));
        }
        self.inner.create(collection, document).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<serde_json::Value>, StoreError> {
        self.calls.lists.fetch_add(1, Ordering::SeqCst);
        pass(&self.list_gate).await?;

        if self.faults.list.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read rejected".into()));
        }
        self.inner.list(collection).await
    }
}

/// Records the workflow name of every reported error.
#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingReporter {
    pub fn workflows(&self) -> Vec<&'static str> {
        self.reports.lock().iter().map(|(w, _)| *w).collect()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, workflow: &'static str, error: &VaultError) {
        self.reports.lock().push((workflow, error.to_string()));
    }
}

/// Vault workflows over `connector` with a fast cipher and a recording reporter.
pub fn vault(connector: &Arc<TestConnector>) -> (VaultActions, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let connector: Arc<dyn RemoteConnector> = Arc::clone(connector) as Arc<dyn RemoteConnector>;
    let actions = VaultActions::new(connector)
        .with_cipher(fast_cipher())
        .with_reporter(Arc::clone(&reporter) as Arc<dyn ErrorReporter>);
    (actions, reporter)
}

/// Yield until `done` holds.
pub async fn wait_until(done: impl Fn() -> bool) {
    while !done() {
        tokio::task::yield_now().await;
    }
}

/// Yield until the session manager reports `state`.
pub async fn wait_for_state(actions: &VaultActions, state: SessionState) {
    while actions.sessions().state() != state {
        tokio::task::yield_now().await;
    }
}
