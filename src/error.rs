//! Error types for snapshot loading and validation
//!
//! The projection engine itself never fails; these errors only come from
//! reading a snapshot off disk or checking it before a run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid date '{value}' in {field}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid boolean flag '{0}'")]
    InvalidFlag(String),

    #[error("Transaction {transaction_id} references unknown account {account_id}")]
    UnknownAccount {
        transaction_id: String,
        account_id: String,
    },

    #[error("Transaction {transaction_id} references unknown category {category_id}")]
    UnknownCategory {
        transaction_id: String,
        category_id: String,
    },

    #[error("Transaction {0} is both recurring and an installment plan")]
    ConflictingSchedule(String),

    #[error("Transaction {transaction_id} has {paid} of {total} installments paid")]
    InstallmentsOverpaid {
        transaction_id: String,
        paid: u32,
        total: u32,
    },

    #[error("Account {account_id} has due day {due_day} outside 1..=31")]
    InvalidDueDay { account_id: String, due_day: u32 },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
