//! Persistence abstractions for transactions

use crate::core::transaction::{
    NewTransaction, OwnerId, Transaction, TransactionId, TransactionPatch,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Remote storage of transactions, keyed by owner.
///
/// No delete operation exists; removals only happen in the in-memory store.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// All transactions of `owner`, most recent `date` first.
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Transaction>>;

    /// Stores a new transaction for `owner`, assigning its id and timestamps.
    async fn insert(&self, owner: &OwnerId, transaction: NewTransaction) -> Result<Transaction>;

    /// Updates the transaction matching both `id` and `owner`.
    ///
    /// Fails when no such transaction exists for that owner.
    async fn update_by_id(
        &self,
        id: &TransactionId,
        owner: &OwnerId,
        patch: &TransactionPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Transaction>;
}
