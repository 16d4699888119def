use crate::core::repository::TransactionRepository;
use crate::core::transaction::{
    NewTransaction, OwnerId, Transaction, TransactionId, TransactionPatch,
};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// In-memory repository, shared between clones.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<Mutex<Vec<Transaction>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Orders by date descending, newest creation first within a day.
pub(crate) fn sort_for_listing(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

#[async_trait]
impl TransactionRepository for MemoryRepository {
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Transaction>> {
        let stored = self.inner.lock().await;
        let mut transactions: Vec<Transaction> = stored
            .iter()
            .filter(|t| &t.owner == owner)
            .cloned()
            .collect();
        sort_for_listing(&mut transactions);
        debug!("Memory LIST {} transactions for {}", transactions.len(), owner);
        Ok(transactions)
    }

    async fn insert(&self, owner: &OwnerId, transaction: NewTransaction) -> Result<Transaction> {
        let created = transaction.into_transaction(Uuid::new_v4(), owner.clone(), Utc::now());
        let mut stored = self.inner.lock().await;
        stored.push(created.clone());
        debug!("Memory INSERT {} for {}", created.id, owner);
        Ok(created)
    }

    async fn update_by_id(
        &self,
        id: &TransactionId,
        owner: &OwnerId,
        patch: &TransactionPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Transaction> {
        let mut stored = self.inner.lock().await;
        let transaction = stored
            .iter_mut()
            .find(|t| &t.id == id && &t.owner == owner)
            .ok_or_else(|| anyhow!("No transaction {} for owner {}", id, owner))?;

        transaction.apply(patch);
        transaction.updated_at = updated_at;
        debug!("Memory UPDATE {} for {}", id, owner);
        Ok(transaction.clone())
    }
}
