//! Session scoped transaction store and its persistence backends.
pub mod disk;
pub mod memory;

use crate::core::config::{AppConfig, StorageBackend};
use crate::core::identity::{AuthState, IdentityProvider};
use crate::core::repository::TransactionRepository;
use crate::core::transaction::{
    NewTransaction, OwnerId, Transaction, TransactionId, TransactionPatch, ValidationError,
};
use chrono::Utc;
use disk::DiskRepository;
use memory::MemoryRepository;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no authenticated owner")]
    NotAuthenticated,
    #[error("transaction {0} not found")]
    NotFound(TransactionId),
    #[error("invalid transaction: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

/// Opens the repository selected by `config`.
pub fn open_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn TransactionRepository>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            debug!("Using in-memory transaction storage");
            Ok(Arc::new(MemoryRepository::new()))
        }
        StorageBackend::Disk => {
            let path = config.default_data_path()?.join("transactions");
            Ok(Arc::new(DiskRepository::open(&path)?))
        }
    }
}

/// Owns the transaction collection of the authenticated owner for one session.
///
/// All mutations go through `&mut self`, so there is a single writer. Every
/// successful mutation swaps the collection and bumps the revision.
pub struct TransactionStore {
    repository: Arc<dyn TransactionRepository>,
    auth: AuthState,
    loading: bool,
    transactions: Arc<Vec<Transaction>>,
    revision: watch::Sender<u64>,
}

impl TransactionStore {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            repository,
            auth: AuthState::Unauthenticated,
            loading: true,
            transactions: Arc::new(Vec::new()),
            revision,
        }
    }

    pub fn transactions(&self) -> Arc<Vec<Transaction>> {
        Arc::clone(&self.transactions)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn auth_state(&self) -> &AuthState {
        &self.auth
    }

    pub fn owner(&self) -> Option<&OwnerId> {
        self.auth.owner()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Notifies on every collection change with the new revision.
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn replace_collection(&mut self, transactions: Vec<Transaction>) {
        self.transactions = Arc::new(transactions);
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn require_owner(&self) -> Result<OwnerId, StoreError> {
        self.owner().cloned().ok_or(StoreError::NotAuthenticated)
    }

    /// Reads the current owner from `identity` and loads its transactions.
    pub async fn start(&mut self, identity: &dyn IdentityProvider) -> Result<(), StoreError> {
        self.on_owner_changed(identity.current_owner()).await
    }

    /// Applies an identity event: a present owner (re)loads, an absent one clears.
    pub async fn on_owner_changed(&mut self, owner: Option<OwnerId>) -> Result<(), StoreError> {
        match owner {
            Some(owner) => self.load(owner).await,
            None => {
                info!("No authenticated owner, clearing transactions");
                self.auth = AuthState::Unauthenticated;
                self.loading = false;
                if !self.transactions.is_empty() {
                    self.replace_collection(Vec::new());
                }
                Ok(())
            }
        }
    }

    /// Waits for the next identity event and applies it.
    ///
    /// Returns false once the identity provider has gone away.
    pub async fn follow(&mut self, events: &mut watch::Receiver<Option<OwnerId>>) -> bool {
        if events.changed().await.is_err() {
            debug!("Identity provider closed");
            return false;
        }
        let owner = events.borrow_and_update().clone();
        // Load failures are logged by `load` and leave the store usable.
        let _ = self.on_owner_changed(owner).await;
        true
    }

    /// Replaces the collection with everything stored for `owner`.
    ///
    /// On failure the collection is left as it was, unless `owner` differs from
    /// the previous owner, in which case it stays cleared.
    pub async fn load(&mut self, owner: OwnerId) -> Result<(), StoreError> {
        if self.owner() != Some(&owner) && !self.transactions.is_empty() {
            self.replace_collection(Vec::new());
        }
        self.auth = AuthState::Loading(owner.clone());
        self.loading = true;

        let result = self.repository.list_by_owner(&owner).await;
        self.auth = AuthState::Authenticated(owner.clone());
        self.loading = false;

        match result {
            Ok(transactions) => {
                info!("Loaded {} transactions for {}", transactions.len(), owner);
                self.replace_collection(transactions);
                Ok(())
            }
            Err(e) => {
                error!("Error fetching transactions for {}: {:#}", owner, e);
                Err(StoreError::Persistence(e))
            }
        }
    }

    /// Reloads the current owner's transactions.
    pub async fn refetch(&mut self) -> Result<(), StoreError> {
        let owner = self.require_owner()?;
        self.load(owner).await
    }

    /// Persists `input` and puts the created transaction at the head of the collection.
    pub async fn create(&mut self, input: NewTransaction) -> Result<Transaction, StoreError> {
        let owner = self.require_owner().inspect_err(|e| warn!("Create rejected: {}", e))?;
        input
            .validate()
            .inspect_err(|e| warn!("Create rejected: {}", e))?;

        let created = self
            .repository
            .insert(&owner, input)
            .await
            .inspect_err(|e| error!("Error adding transaction: {:#}", e))?;

        let mut next = Vec::with_capacity(self.transactions.len() + 1);
        next.push(created.clone());
        next.extend(self.transactions.iter().cloned());
        self.replace_collection(next);
        debug!("Created transaction {}", created.id);
        Ok(created)
    }

    /// Persists `patch` for transaction `id` and replaces it in place.
    pub async fn update(
        &mut self,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, StoreError> {
        let owner = self.require_owner().inspect_err(|e| warn!("Update rejected: {}", e))?;
        let position = self
            .transactions
            .iter()
            .position(|t| &t.id == id)
            .ok_or(StoreError::NotFound(*id))
            .inspect_err(|e| warn!("Update rejected: {}", e))?;

        let mut candidate = self.transactions[position].clone();
        candidate.apply(&patch);
        candidate
            .validate()
            .inspect_err(|e| warn!("Update rejected: {}", e))?;

        let updated = self
            .repository
            .update_by_id(id, &owner, &patch, Utc::now())
            .await
            .inspect_err(|e| error!("Error updating transaction {}: {:#}", id, e))?;

        let mut next = self.transactions.as_ref().clone();
        next[position] = updated.clone();
        self.replace_collection(next);
        debug!("Updated transaction {}", id);
        Ok(updated)
    }

    /// Removes transaction `id` from the in-memory collection only.
    ///
    /// Nothing is removed from the repository, so the next `load` brings the
    /// transaction back. Returns whether an entry was removed.
    pub fn delete(&mut self, id: &TransactionId) -> Result<bool, StoreError> {
        self.require_owner()
            .inspect_err(|e| warn!("Delete rejected: {}", e))?;

        if !self.transactions.iter().any(|t| &t.id == id) {
            debug!("Delete of unknown transaction {}", id);
            return Ok(false);
        }
        let next = self
            .transactions
            .iter()
            .filter(|t| &t.id != id)
            .cloned()
            .collect();
        self.replace_collection(next);
        warn!("Transaction {} removed locally; it is still persisted", id);
        Ok(true)
    }

    /// Ends the session through `identity`.
    ///
    /// The collection is cleared when the resulting owner change is applied.
    pub async fn sign_out(&mut self, identity: &dyn IdentityProvider) -> Result<(), StoreError> {
        identity.sign_out().await.map_err(|e| {
            error!("Error signing out: {:#}", e);
            StoreError::Persistence(e)
        })
    }
}
