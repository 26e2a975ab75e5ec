//! Finance Projection - month-by-month balance forecasting for a personal finance tracker
//!
//! This library provides:
//! - The tracker data model (accounts, categories, transaction templates)
//! - CSV snapshot loading, sign normalization and validation
//! - Expansion of one-off, recurring and installment templates into dated occurrences
//! - Aggregate and per-account monthly balance projections

pub mod error;
pub mod ledger;
pub mod projection;

// Re-export commonly used types
pub use error::LedgerError;
pub use ledger::{Account, Category, Snapshot, Transaction};
pub use projection::{project, ProjectionConfig, ProjectionEngine, ProjectionMonth, ProjectionResult};
