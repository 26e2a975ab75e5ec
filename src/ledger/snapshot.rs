//! Point-in-time snapshot of the tracker tables

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{Account, Category, Transaction};
use crate::error::LedgerError;

/// Accounts, categories and transactions read together from the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    pub fn new(accounts: Vec<Account>, categories: Vec<Category>, transactions: Vec<Transaction>) -> Self {
        Self { accounts, categories, transactions }
    }

    /// Sum of current balances across all accounts
    pub fn total_balance(&self) -> f64 {
        self.accounts.iter().map(|a| a.current_balance).sum()
    }

    /// Force every transaction's sign from its category type.
    /// Transactions whose category is not in the snapshot are left untouched.
    /// Returns the number of amounts that changed.
    pub fn normalize_signs(&mut self) -> usize {
        let categories: HashMap<&str, &Category> =
            self.categories.iter().map(|c| (c.id.as_str(), c)).collect();

        let mut changed = 0;
        for tx in &mut self.transactions {
            if let Some(category) = categories.get(tx.category_id.as_str()) {
                let normalized = tx.normalized_amount(category);
                if normalized != tx.amount {
                    debug!("Normalizing sign of transaction {}: {} -> {}", tx.id, tx.amount, normalized);
                    tx.amount = normalized;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Collect every consistency problem in the snapshot.
    ///
    /// The projection engine accepts inconsistent data; callers that want to
    /// reject it run this first. An empty result means the snapshot is clean.
    /// Category references are only checked when categories were loaded.
    pub fn validate(&self) -> Vec<LedgerError> {
        let mut problems = Vec::new();

        for account in &self.accounts {
            if let Some(due_day) = account.due_day {
                if !(1..=31).contains(&due_day) {
                    problems.push(LedgerError::InvalidDueDay {
                        account_id: account.id.clone(),
                        due_day,
                    });
                }
            }
        }

        let check_categories = !self.categories.is_empty();
        for tx in &self.transactions {
            if !self.accounts.iter().any(|a| a.id == tx.account_id) {
                problems.push(LedgerError::UnknownAccount {
                    transaction_id: tx.id.clone(),
                    account_id: tx.account_id.clone(),
                });
            }

            if check_categories && !self.categories.iter().any(|c| c.id == tx.category_id) {
                problems.push(LedgerError::UnknownCategory {
                    transaction_id: tx.id.clone(),
                    category_id: tx.category_id.clone(),
                });
            }

            if tx.has_conflicting_schedule() {
                problems.push(LedgerError::ConflictingSchedule(tx.id.clone()));
            }

            if let (Some(total), Some(paid)) = (tx.installments_total, tx.installments_paid) {
                if paid > total {
                    problems.push(LedgerError::InstallmentsOverpaid {
                        transaction_id: tx.id.clone(),
                        paid,
                        total,
                    });
                }
            }
        }

        problems
    }
}
