use super::ui;
use crate::core::transaction::{NewTransaction, Transaction, TransactionId, TransactionPatch};
use crate::store::TransactionStore;
use anyhow::{Result, bail};
use tracing::info;

fn describe(transaction: &Transaction, currency: &str) -> String {
    format!(
        "{} {} | {} | {} | {}",
        ui::style_text(&transaction.id.to_string(), ui::StyleType::Subtle),
        transaction.date.format("%Y-%m-%d"),
        transaction.category,
        transaction.description,
        ui::format_amount(transaction.amount, currency)
    )
}

/// Records a new transaction and prints it.
pub async fn add(
    store: &mut TransactionStore,
    input: NewTransaction,
    currency: &str,
) -> Result<Transaction> {
    let created = store.create(input).await?;
    info!("Added transaction {}", created.id);
    println!(
        "{} {}",
        ui::style_text("Added", ui::StyleType::Positive),
        describe(&created, currency)
    );
    Ok(created)
}

/// Applies `patch` to transaction `id` and prints the result.
pub async fn edit(
    store: &mut TransactionStore,
    id: &TransactionId,
    patch: TransactionPatch,
    currency: &str,
) -> Result<Transaction> {
    if patch.is_empty() {
        bail!("Nothing to update for transaction {id}");
    }
    let updated = store.update(id, patch).await?;
    info!("Updated transaction {}", updated.id);
    println!(
        "{} {}",
        ui::style_text("Updated", ui::StyleType::Positive),
        describe(&updated, currency)
    );
    Ok(updated)
}
