//! Provides the reducers that turn a transaction collection into summary views.
use crate::core::transaction::{Transaction, TransactionKind, YearMonth};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

/// Number of most recent months kept by [`monthly_rollup`].
pub const MONTHLY_ROLLUP_WINDOW: usize = 6;

/// Income, expense and balance sums over a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

impl Totals {
    fn add(&mut self, transaction: &Transaction) {
        match transaction.kind {
            TransactionKind::Income => {
                self.income = self.income.saturating_add(transaction.amount)
            }
            TransactionKind::Expense => {
                self.expenses = self.expenses.saturating_add(transaction.amount)
            }
        }
        self.balance = self.income.saturating_sub(self.expenses);
    }
}

/// Expense sum for a single category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Income, expense and balance for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

/// Sums income and expenses over `transactions`.
///
/// The balance is always exactly `income - expenses`. Sums clamp at the
/// `Decimal` range instead of overflowing.
pub fn calculate_totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();
    for transaction in transactions {
        totals.add(transaction);
    }
    debug!(
        "Totals over {} transactions: income {}, expenses {}",
        transactions.len(),
        totals.income,
        totals.expenses
    );
    totals
}

/// Groups expense transactions by category and sums their amounts.
///
/// Income transactions are ignored. Categories appear in the order they are
/// first seen and a category whose sum is zero is left out.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut breakdown: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
    {
        match breakdown
            .iter_mut()
            .find(|entry| entry.category == transaction.category)
        {
            Some(entry) => entry.total = entry.total.saturating_add(transaction.amount),
            None => breakdown.push(CategoryTotal {
                category: transaction.category.clone(),
                total: transaction.amount,
            }),
        }
    }

    breakdown.retain(|entry| !entry.total.is_zero());
    breakdown
}

/// Buckets `transactions` by month and keeps the most recent
/// [`MONTHLY_ROLLUP_WINDOW`] months in ascending order.
pub fn monthly_rollup(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    let mut buckets: BTreeMap<YearMonth, Totals> = BTreeMap::new();
    for transaction in transactions {
        buckets
            .entry(transaction.month())
            .or_default()
            .add(transaction);
    }

    let skip = buckets.len().saturating_sub(MONTHLY_ROLLUP_WINDOW);
    debug!(
        "Monthly rollup: {} buckets, dropping {} oldest",
        buckets.len(),
        skip
    );

    buckets
        .into_iter()
        .skip(skip)
        .map(|(month, totals)| MonthlySummary {
            month,
            income: totals.income,
            expenses: totals.expenses,
            balance: totals.balance,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::{NewTransaction, OwnerId};
    use chrono::{NaiveDate, Utc};
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
    fn test_totals_for_sample() {
        let totals = calculate_totals(&sample());
        assert_eq!(totals.income, dec!(5000));
        assert_eq!(totals.expenses, dec!(300));
        assert_eq!(totals.balance, dec!(4700));
    }

    #[test]
    fn test_totals_empty() {
        assert_eq!(calculate_totals(&[]), Totals::default());
    }

    #[test]
    fn test_totals_exact_decimal_sums() {
        let transactions: Vec<Transaction> = (0..10)
            .map(|_| transaction(TransactionKind::Expense, "Contas", dec!(0.1), (2024, 3, 1)))
            .chain(std::iter::once(transaction(
                TransactionKind::Income,
                "Vendas",
                dec!(0.3),
                (2024, 3, 2),
            )))
            .collect();

        let totals = calculate_totals(&transactions);

        assert_eq!(totals.expenses, dec!(1.0));
        assert_eq!(totals.balance, dec!(-0.7));
        assert_eq!(totals.balance, totals.income - totals.expenses);
    }

    #[test]
    fn test_category_breakdown_only_expenses() {
        let breakdown = category_breakdown(&sample());
        assert_eq!(
            breakdown,
            vec![
                CategoryTotal {
                    category: "Alimentação".to_string(),
                    total: dec!(200),
                },
                CategoryTotal {
                    category: "Transporte".to_string(),
                    total: dec!(100),
                },
            ]
        );
    }

    #[test]
    fn test_category_breakdown_groups_same_category() {
        let mut transactions = sample();
        transactions.push(transaction(
            TransactionKind::Expense,
            "Alimentação",
            dec!(45.55),
            (2024, 2, 3),
        ));
        transactions.push(transaction(
            TransactionKind::Income,
            "Investimentos",
            dec!(10),
            (2024, 2, 3),
        ));

        let breakdown = category_breakdown(&transactions);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].total, dec!(245.55));
        assert!(breakdown.iter().all(|c| c.category != "Investimentos"));
    }

    #[test]
    fn test_totals_clamp_instead_of_overflowing() {
        let transactions = vec![
            transaction(TransactionKind::Expense, "Contas", Decimal::MAX, (2024, 1, 1)),
            transaction(TransactionKind::Expense, "Contas", Decimal::MAX, (2024, 1, 2)),
        ];

        let totals = calculate_totals(&transactions);
        assert_eq!(totals.expenses, Decimal::MAX);
        assert_eq!(totals.balance, Decimal::MIN);

        let breakdown = category_breakdown(&transactions);
        assert_eq!(breakdown[0].total, Decimal::MAX);

        let rollup = monthly_rollup(&transactions);
        assert_eq!(rollup[0].expenses, Decimal::MAX);
    }

    #[test]
    fn test_category_breakdown_drops_zero_totals() {
        // Stored rows are not revalidated on load.
        let transactions = vec![
            transaction(TransactionKind::Expense, "Compras", Decimal::ZERO, (2024, 1, 3)),
            transaction(TransactionKind::Expense, "Contas", dec!(80), (2024, 1, 4)),
        ];

        let breakdown = category_breakdown(&transactions);

        assert_eq!(
            breakdown,
            vec![CategoryTotal {
                category: "Contas".to_string(),
                total: dec!(80),
            }]
        );
    }

    #[test]
    fn test_category_breakdown_empty_without_expenses() {
        let transactions = vec![transaction(
            TransactionKind::Income,
            "Salário",
            dec!(5000),
            (2024, 1, 10),
        )];
        assert!(category_breakdown(&transactions).is_empty());
    }

    #[test]
    fn test_monthly_rollup_for_sample() {
        let rollup = monthly_rollup(&sample());
        assert_eq!(rollup.len(), 2);

        assert_eq!(rollup[0].month.to_string(), "2024-01");
        assert_eq!(rollup[0].income, dec!(5000));
        assert_eq!(rollup[0].expenses, dec!(200));
        assert_eq!(rollup[0].balance, dec!(4800));

        assert_eq!(rollup[1].month.to_string(), "2024-02");
        assert_eq!(rollup[1].income, Decimal::ZERO);
        assert_eq!(rollup[1].expenses, dec!(100));
        assert_eq!(rollup[1].balance, dec!(-100));
    }

    #[test]
    fn test_monthly_rollup_keeps_most_recent_six() {
        // Eight months spanning a year boundary, inserted out of order.
        let months = [
            (2024, 2),
            (2023, 8),
            (2023, 12),
            (2024, 1),
            (2023, 7),
            (2023, 10),
            (2023, 9),
            (2023, 11),
        ];
        let transactions: Vec<Transaction> = months
            .iter()
            .map(|&(y, m)| transaction(TransactionKind::Expense, "Contas", dec!(10), (y, m, 15)))
            .collect();

        let rollup = monthly_rollup(&transactions);
        let keys: Vec<String> = rollup.iter().map(|m| m.month.to_string()).collect();

        assert_eq!(
            keys,
            vec!["2023-09", "2023-10", "2023-11", "2023-12", "2024-01", "2024-02"]
        );
    }

    #[test]
    fn test_monthly_rollup_empty() {
        assert!(monthly_rollup(&[]).is_empty());
    }
}
