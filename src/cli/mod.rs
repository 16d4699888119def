//! Terminal presentation of the transaction store and its derived views

pub mod edit;
pub mod list;
pub mod setup;
pub mod summary;
pub mod ui;
