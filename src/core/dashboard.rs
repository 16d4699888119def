//! Derived views of a transaction collection, bundled for the presentation layer.
use crate::core::aggregation::{
    CategoryTotal, MonthlySummary, Totals, calculate_totals, category_breakdown, monthly_rollup,
};
use crate::core::cache::Cache;
use crate::core::filter::{FilterSelection, apply_filter, available_months};
use crate::core::transaction::{Transaction, YearMonth};
use std::sync::Arc;
use tracing::debug;

/// Everything a dashboard renders for one collection and filter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub filter: FilterSelection,
    /// Transactions passing `filter`, in collection order.
    pub transactions: Vec<Transaction>,
    /// Computed over the whole collection, regardless of `filter`.
    pub totals: Totals,
    /// Expense categories of the filtered transactions.
    pub categories: Vec<CategoryTotal>,
    /// Computed over the whole collection, regardless of `filter`.
    pub monthly: Vec<MonthlySummary>,
    pub months: Vec<YearMonth>,
}

impl Dashboard {
    pub fn derive(transactions: &[Transaction], filter: &FilterSelection) -> Self {
        let filtered = apply_filter(transactions, filter);
        debug!(
            "Deriving dashboard: {} of {} transactions match {:?}",
            filtered.len(),
            transactions.len(),
            filter
        );

        Self {
            filter: filter.clone(),
            totals: calculate_totals(transactions),
            categories: category_breakdown(&filtered),
            monthly: monthly_rollup(transactions),
            months: available_months(transactions),
            transactions: filtered,
        }
    }
}

/// Memoizes dashboards on the collection revision and filter selection.
#[derive(Default)]
pub struct DashboardCache {
    cache: Cache<(u64, FilterSelection), Arc<Dashboard>>,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dashboard for `revision` of `transactions`, deriving it on a miss.
    ///
    /// Entries belonging to other revisions are evicted on a miss.
    pub async fn get_or_derive(
        &self,
        revision: u64,
        transactions: &[Transaction],
        filter: &FilterSelection,
    ) -> Arc<Dashboard> {
        let key = (revision, filter.clone());
        if let Some(dashboard) = self.cache.get(&key).await {
            return dashboard;
        }

        self.cache.retain(|(cached, _)| *cached == revision).await;
        let dashboard = Arc::new(Dashboard::derive(transactions, filter));
        self.cache.put(key, Arc::clone(&dashboard)).await;
        dashboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::{NewTransaction, OwnerId, TransactionKind};
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn transaction(
        kind: TransactionKind,
        category: &str,
        amount: Decimal,
        date: (i32, u32, u32),
    ) -> Transaction {
        NewTransaction {
            kind,
            amount,
            category: category.to_string(),
            description: "test".to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
        .into_transaction(Uuid::new_v4(), OwnerId::from("alice"), Utc::now())
    }

    fn sample() -> Vec<Transaction> {
        vec![
            transaction(TransactionKind::Income, "Salário", dec!(5000), (2024, 1, 10)),
            transaction(TransactionKind::Expense, "Alimentação", dec!(200), (2024, 1, 12)),
            transaction(TransactionKind::Expense, "Transporte", dec!(100), (2024, 2, 1)),
        ]
    }

    #[test]
    fn test_totals_and_rollup_ignore_filter() {
        let transactions = sample();
        let filter = FilterSelection {
            month: Some("2024-02".parse().unwrap()),
            ..Default::default()
        };

        let dashboard = Dashboard::derive(&transactions, &filter);

        assert_eq!(dashboard.transactions.len(), 1);
        assert_eq!(dashboard.totals.income, dec!(5000));
        assert_eq!(dashboard.totals.expenses, dec!(300));
        assert_eq!(dashboard.totals.balance, dec!(4700));
        assert_eq!(dashboard.monthly.len(), 2);
        assert_eq!(dashboard.months.len(), 2);
        assert_eq!(
            dashboard.categories,
            vec![CategoryTotal {
                category: "Transporte".to_string(),
                total: dec!(100),
            }]
        );
    }

    #[tokio::test]
    async fn test_cache_reuses_dashboard_for_same_revision() {
        let transactions = sample();
        let cache = DashboardCache::new();
        let filter = FilterSelection::all();

        let first = cache.get_or_derive(1, &transactions, &filter).await;
        let second = cache.get_or_derive(1, &transactions, &filter).await;
        assert!(Arc::ptr_eq(&first, &second));

        let shorter = &transactions[..1];
        let third = cache.get_or_derive(2, shorter, &filter).await;
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.transactions.len(), 1);
        assert_eq!(cache.cache.len().await, 1);
    }
}
