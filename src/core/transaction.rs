//! Transaction entity, its inputs and the category sets per kind.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

pub type TransactionId = Uuid;

/// Largest accepted amount, in whole currency units.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Amounts are kept to cents.
pub const AMOUNT_SCALE: u32 = 2;

pub const INCOME_CATEGORIES: &[&str] = &[
    "Salário",
    "Freelance",
    "Investimentos",
    "Vendas",
    "Outros",
];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Alimentação",
    "Transporte",
    "Moradia",
    "Saúde",
    "Educação",
    "Entretenimento",
    "Compras",
    "Contas",
    "Investimentos",
    "Outros",
];

/// Identity of the authenticated user that holds a set of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Category labels a transaction of this kind may carry.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            TransactionKind::Income => INCOME_CATEGORIES,
            TransactionKind::Expense => EXPENSE_CATEGORIES,
        }
    }

    pub fn allows_category(&self, category: &str) -> bool {
        self.categories().contains(&category)
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransactionKind::Income => "income",
                TransactionKind::Expense => "expense",
            }
        )
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(anyhow!("Invalid transaction kind: {}", s)),
        }
    }
}

/// Calendar month used as the bucket key for monthly rollups and month filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(anyhow!("Invalid month {} in {}-{:02}", month, year, month));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("Expected YYYY-MM, got: {}", s))?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            return Err(anyhow!("Expected YYYY-MM, got: {}", s));
        }
        let year = year
            .parse::<i32>()
            .map_err(|e| anyhow!("Invalid year in {}: {}", s, e))?;
        let month = month
            .parse::<u32>()
            .map_err(|e| anyhow!("Invalid month in {}: {}", s, e))?;
        Self::new(year, month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub owner: OwnerId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    /// Applies the user editable fields of `patch`. Identity and timestamps are left alone.
    pub fn apply(&mut self, patch: &TransactionPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(self.kind, self.amount, &self.category, &self.description)
    }
}

/// User supplied fields for a new transaction. The repository assigns the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(self.kind, self.amount, &self.category, &self.description)
    }

    pub fn into_transaction(
        self,
        id: TransactionId,
        owner: OwnerId,
        now: DateTime<Utc>,
    ) -> Transaction {
        Transaction {
            id,
            owner,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            description: self.description,
            date: self.date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a transaction. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub kind: Option<TransactionKind>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("amount must not exceed {MAX_AMOUNT_UNITS}, got {0}")]
    AmountTooLarge(Decimal),
    #[error("amount must have at most {AMOUNT_SCALE} decimal places, got {0}")]
    TooManyDecimalPlaces(Decimal),
    #[error("description cannot be empty")]
    EmptyDescription,
    #[error("category {category:?} is not valid for {kind} transactions")]
    InvalidCategory {
        kind: TransactionKind,
        category: String,
    },
}

fn validate_fields(
    kind: TransactionKind,
    amount: Decimal,
    category: &str,
    description: &str,
) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    if amount > Decimal::new(MAX_AMOUNT_UNITS, 0) {
        return Err(ValidationError::AmountTooLarge(amount));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(ValidationError::TooManyDecimalPlaces(amount));
    }
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if !kind.allows_category(category) {
        return Err(ValidationError::InvalidCategory {
            kind,
            category: category.to_string(),
        });
    }
    Ok(())
}
