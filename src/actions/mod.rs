//! Vault workflows.
//!
//! `VaultActions` is the only place that sequences the session manager,
//! cipher, repository and notification controller, and the only layer
//! that catches errors.  Each workflow:
//!
//! 1. raises the busy flag through a `BusyGuard`,
//! 2. runs its steps, propagating the first error,
//! 3. lowers the busy flag, then notifies success or a generic error key.
//!
//! The guard lowers the flag even if the workflow future is dropped
//! halfway, so the global loader cannot get stuck.

pub mod report;

use std::sync::Arc;

use crate::config::Settings;
use crate::crypto::CipherService;
use crate::errors::{Result, VaultError};
use crate::overlay::{messages, NotificationCenter, Severity};
use crate::remote::{DocumentId, RemoteConnector};
use crate::session::SessionManager;
use crate::vault::{
    AccessKeyPair, CredentialEntity, CredentialRepository, EncryptedCredentialRecord,
    MasterSecret, OptionPanelVariant, PasswordListState, PasswordListStore,
};

pub use report::{ErrorReporter, TracingReporter};

const FETCH_WORKFLOW: &str = "fetch_passwords";
const ADD_WORKFLOW: &str = "add_new_password";

/// The vault's user-triggered workflows and the state they drive.
pub struct VaultActions {
    sessions: SessionManager,
    repository: CredentialRepository,
    cipher: CipherService,
    overlay: Arc<NotificationCenter>,
    passwords: Arc<PasswordListStore>,
    reporter: Arc<dyn ErrorReporter>,
}

impl VaultActions {
    /// Workflows over `connector` with default cipher cost and collection.
    pub fn new(connector: Arc<dyn RemoteConnector>) -> Self {
        Self {
            sessions: SessionManager::new(connector),
            repository: CredentialRepository::default(),
            cipher: CipherService::default(),
            overlay: Arc::new(NotificationCenter::new()),
            passwords: Arc::new(PasswordListStore::new()),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Workflows configured from `.shelfvault.toml` settings.
    pub fn from_settings(connector: Arc<dyn RemoteConnector>, settings: &Settings) -> Self {
        Self::new(connector)
            .with_cipher(CipherService::new(settings.argon2_params()))
            .with_repository(CredentialRepository::new(settings.collection.clone()))
    }

    pub fn with_cipher(mut self, cipher: CipherService) -> Self {
        self.cipher = cipher;
        self
    }

    pub fn with_repository(mut self, repository: CredentialRepository) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn overlay(&self) -> &Arc<NotificationCenter> {
        &self.overlay
    }

    pub fn password_list(&self) -> &Arc<PasswordListStore> {
        &self.passwords
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn cipher(&self) -> &CipherService {
        &self.cipher
    }

    // ------------------------------------------------------------------
    // Workflows
    // ------------------------------------------------------------------

    pub fn switch_option_panel_variant(&self, variant: OptionPanelVariant) -> PasswordListState {
        self.passwords.switch_variant(variant)
    }

    /// Fetch every record on the shelf.
    ///
    /// Establishes the session first if there is none.  On success the
    /// panel folds to `EntityFormCollapsed` and the list is replaced; on
    /// failure the list is left untouched.  An empty shelf is a success.
    pub async fn fetch_passwords(&self, keys: &AccessKeyPair) -> Result<PasswordListState> {
        tracing::info!(collection = self.repository.collection(), "fetching passwords");
        let busy = self.overlay.busy();

        match self.load_records(keys).await {
            Ok(records) => {
                busy.release();
                self.overlay.notify(messages::PASSWORDS_FETCHED, Severity::Success);
                let state = self.passwords.load_fetched(records);
                tracing::info!(count = state.passwords.len(), "passwords fetched");
                Ok(state)
            }
            Err(err) => {
                busy.release();
                Err(self.fail(FETCH_WORKFLOW, messages::FETCH_FAILED, err))
            }
        }
    }

    /// Encrypt `entity` under `secret` and append it to the shelf.
    ///
    /// Requires an established session (fetch first); without one the
    /// workflow fails with `SessionMissing`.  The password list is not
    /// touched: the next fetch brings the new record in.
    pub async fn add_new_password(
        &self,
        entity: &CredentialEntity,
        secret: &MasterSecret,
    ) -> Result<DocumentId> {
        tracing::info!(label = %entity.label, "adding password");
        let busy = self.overlay.busy();

        match self.store_entity(entity, secret).await {
            Ok(id) => {
                busy.release();
                self.overlay.notify(messages::PASSWORD_CREATED, Severity::Success);
                Ok(id)
            }
            Err(err) => {
                busy.release();
                Err(self.fail(ADD_WORKFLOW, messages::CREATE_FAILED, err))
            }
        }
    }

    /// `add_new_password` with the shelf key of `keys` as the secret.
    pub async fn add_one(
        &self,
        entity: &CredentialEntity,
        keys: &AccessKeyPair,
    ) -> Result<DocumentId> {
        self.add_new_password(entity, keys.master_secret()).await
    }

    /// Decrypt one fetched record for display.
    pub fn reveal(
        &self,
        record: &EncryptedCredentialRecord,
        secret: &MasterSecret,
    ) -> Result<CredentialEntity> {
        Ok(self.cipher.decrypt_record(record, secret)?)
    }

    // ------------------------------------------------------------------
    // Steps
    // ------------------------------------------------------------------

    async fn load_records(&self, keys: &AccessKeyPair) -> Result<Vec<EncryptedCredentialRecord>> {
        let session = match self.sessions.current() {
            Some(session) => session,
            None => self.sessions.ensure_session(keys).await?,
        };
        Ok(self.repository.list_all(&session).await?)
    }

    async fn store_entity(
        &self,
        entity: &CredentialEntity,
        secret: &MasterSecret,
    ) -> Result<DocumentId> {
        let session = self.sessions.current().ok_or(VaultError::SessionMissing)?;

        // Argon2id is deliberately slow; keep it off the async workers.
        let cipher = self.cipher;
        let payload = entity.payload();
        let secret = secret.clone();
        let label = entity.label.clone();
        let value = tokio::task::spawn_blocking(move || {
            cipher.encrypt(&payload, &secret, Some(&label))
        })
        .await
        .map_err(|e| VaultError::TaskFailed(format!("encryption: {e}")))??;

        let record = EncryptedCredentialRecord {
            label: entity.label.clone(),
            value,
        };
        Ok(self.repository.create_one(&session, &record).await?)
    }

    fn fail(&self, workflow: &'static str, message_key: &str, err: VaultError) -> VaultError {
        self.reporter.report(workflow, &err);
        self.overlay.notify(message_key, Severity::Error);
        err
    }
}
