//! Filter selection and the predicate evaluation over a transaction collection.
use crate::core::transaction::{Transaction, TransactionKind, YearMonth};
use std::collections::BTreeSet;

/// User selected filter. Each `None` selects all values for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub month: Option<YearMonth>,
}

impl FilterSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_all(&self) -> bool {
        self.kind.is_none() && self.category.is_none() && self.month.is_none()
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        let kind_match = self.kind.is_none_or(|kind| transaction.kind == kind);
        let category_match = self
            .category
            .as_deref()
            .is_none_or(|category| transaction.category == category);
        let month_match = self.month.is_none_or(|month| transaction.month() == month);

        kind_match && category_match && month_match
    }
}

/// Returns the transactions matching `filter`, in their original relative order.
pub fn apply_filter(transactions: &[Transaction], filter: &FilterSelection) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| filter.matches(t))
        .cloned()
        .collect()
}

/// Distinct months present in `transactions`, most recent first.
pub fn available_months(transactions: &[Transaction]) -> Vec<YearMonth> {
    let months: BTreeSet<YearMonth> = transactions.iter().map(Transaction::month).collect();
    months.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::{NewTransaction, OwnerId};
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
            description: category.to_string(),
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
    fn test_all_selection_keeps_everything_in_order() {
        let transactions = sample();
        let filtered = apply_filter(&transactions, &FilterSelection::all());
        assert_eq!(filtered, transactions);
    }

    #[test]
    fn test_combined_predicates() {
        let transactions = sample();
        let filter = FilterSelection {
            kind: Some(TransactionKind::Expense),
            category: Some("Alimentação".to_string()),
            month: Some("2024-01".parse().unwrap()),
        };

        let filtered = apply_filter(&transactions, &filter);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0], transactions[1]);
    }

    #[test]
    fn test_single_predicates() {
        let transactions = sample();

        let expenses = apply_filter(
            &transactions,
            &FilterSelection {
                kind: Some(TransactionKind::Expense),
                ..Default::default()
            },
        );
        assert_eq!(expenses, transactions[1..].to_vec());

        let january = apply_filter(
            &transactions,
            &FilterSelection {
                month: Some("2024-01".parse().unwrap()),
                ..Default::default()
            },
        );
        assert_eq!(january, transactions[..2].to_vec());

        let unknown = apply_filter(
            &transactions,
            &FilterSelection {
                category: Some("Moradia".to_string()),
                ..Default::default()
            },
        );
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let transactions = sample();
        let filter = FilterSelection {
            kind: Some(TransactionKind::Expense),
            ..Default::default()
        };

        let once = apply_filter(&transactions, &filter);
        let twice = apply_filter(&once, &filter);

        assert_eq!(once, twice);
        assert_eq!(once, apply_filter(&transactions, &filter));
    }

    #[test]
    fn test_available_months_descending_and_distinct() {
        let mut transactions = sample();
        transactions.push(transaction(
            TransactionKind::Expense,
            "Contas",
            dec!(80),
            (2023, 12, 30),
        ));

        let months: Vec<String> = available_months(&transactions)
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(months, vec!["2024-02", "2024-01", "2023-12"]);
        assert!(available_months(&[]).is_empty());
    }
}
