//! Tracker data model and snapshot loading

mod data;
mod snapshot;
pub mod loader;

pub use data::{
    Account, AccountType, Category, CategoryType, InstallmentPlan, RecurrenceInterval, Schedule,
    Transaction,
};
pub use snapshot::Snapshot;
pub use loader::{load_snapshot, load_accounts_from_reader, load_categories_from_reader, load_transactions_from_reader};
