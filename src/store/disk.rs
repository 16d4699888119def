use crate::core::repository::TransactionRepository;
use crate::core::transaction::{
    NewTransaction, OwnerId, Transaction, TransactionId, TransactionPatch,
};
use crate::store::memory::sort_for_listing;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

const PARTITION: &str = "transactions";

/// Repository backed by a fjall keyspace. Keys are `owner\0id`, values are JSON.
pub struct DiskRepository {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskRepository {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", path.display()))?;
        let partition = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened transaction store at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }

    fn owner_prefix(owner: &OwnerId) -> String {
        format!("{}\0", owner.as_str())
    }

    fn key(owner: &OwnerId, id: &TransactionId) -> String {
        format!("{}{}", Self::owner_prefix(owner), id)
    }

    fn write(&self, transaction: &Transaction) -> Result<()> {
        let key = Self::key(&transaction.owner, &transaction.id);
        self.partition
            .insert(key.as_bytes(), serde_json::to_vec(transaction)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for DiskRepository {
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Transaction>> {
        let mut transactions = Vec::new();
        for entry in self.partition.prefix(Self::owner_prefix(owner)) {
            let (_, value) = entry?;
            let transaction: Transaction = serde_json::from_slice(&value)
                .context("Failed to decode stored transaction")?;
            transactions.push(transaction);
        }
        sort_for_listing(&mut transactions);
        debug!("Disk LIST {} transactions for {}", transactions.len(), owner);
        Ok(transactions)
    }

    async fn insert(&self, owner: &OwnerId, transaction: NewTransaction) -> Result<Transaction> {
        let created = transaction.into_transaction(Uuid::new_v4(), owner.clone(), Utc::now());
        self.write(&created)?;
        debug!("Disk INSERT {} for {}", created.id, owner);
        Ok(created)
    }

    async fn update_by_id(
        &self,
        id: &TransactionId,
        owner: &OwnerId,
        patch: &TransactionPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Transaction> {
        let stored = self
            .partition
            .get(Self::key(owner, id))?
            .ok_or_else(|| anyhow!("No transaction {} for owner {}", id, owner))?;
        let mut transaction: Transaction = serde_json::from_slice(&stored)
            .context("Failed to decode stored transaction")?;

        transaction.apply(patch);
        transaction.updated_at = updated_at;
        self.write(&transaction)?;
        debug!("Disk UPDATE {} for {}", id, owner);
        Ok(transaction)
    }
}
