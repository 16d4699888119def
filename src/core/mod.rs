//! Core domain types, derivation engines and collaborator abstractions

pub mod aggregation;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod identity;
pub mod log;
pub mod repository;
pub mod transaction;

// Re-export main types for cleaner imports
pub use aggregation::{CategoryTotal, MonthlySummary, Totals};
pub use dashboard::{Dashboard, DashboardCache};
pub use filter::FilterSelection;
pub use identity::{AuthState, IdentityProvider};
pub use repository::TransactionRepository;
pub use transaction::{
    NewTransaction, OwnerId, Transaction, TransactionId, TransactionKind, TransactionPatch,
    ValidationError, YearMonth,
};
