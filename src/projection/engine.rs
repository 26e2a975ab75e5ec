//! Monthly balance projection over an account/transaction snapshot

use chrono::{Local, NaiveDate};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::calendar::{month_name, target_month};
use super::horizon::optimal_horizon;
use super::month::{AccountBalance, Occurrence, ProjectionMonth, ProjectionResult};
use super::occurrences::{classify, synthesize_month};
use crate::ledger::{Account, Transaction};

/// Projection run settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Number of months to project. `None` picks a horizon from the data
    /// (see [`optimal_horizon`]); `Some(0)` projects nothing.
    #[serde(default)]
    pub months_to_project: Option<u32>,

    /// Anchor date; projection starts the month after it. `None` uses today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Forecasts aggregate and per-account balances month by month.
///
/// The engine never fails and never mutates its inputs. Occurrences that
/// reference an unknown account still count toward the aggregate balance
/// but not toward any account's breakdown.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the projection and return just the months
    pub fn project(&self, accounts: &[Account], transactions: &[Transaction]) -> Vec<ProjectionMonth> {
        self.run(accounts, transactions).months
    }

    /// Run the projection
    pub fn run(&self, accounts: &[Account], transactions: &[Transaction]) -> ProjectionResult {
        let as_of = self.config.as_of.unwrap_or_else(|| Local::now().date_naive());
        let templates = classify(transactions);
        let horizon = self
            .config
            .months_to_project
            .unwrap_or_else(|| optimal_horizon(&templates, as_of));

        let starting_balance: f64 = accounts.iter().map(|a| a.current_balance).sum();

        // Occurrences depend only on the calendar month, so months expand independently
        let occurrences: Vec<(i32, u32, Vec<Occurrence>)> = (0..horizon)
            .into_par_iter()
            .map(|i| {
                let (year, month) = target_month(as_of, i);
                (year, month, synthesize_month(&templates, year, month))
            })
            .collect();

        let mut running_balance = starting_balance;
        let mut account_running: Vec<f64> = accounts.iter().map(|a| a.current_balance).collect();
        let mut months = Vec::with_capacity(occurrences.len());

        for (year, month, transactions) in occurrences {
            let net: f64 = transactions.iter().map(|o| o.amount).sum();
            let total_income: f64 = transactions
                .iter()
                .filter(|o| o.amount > 0.0)
                .map(|o| o.amount)
                .sum();
            let total_expenses = transactions
                .iter()
                .filter(|o| o.amount < 0.0)
                .map(|o| o.amount)
                .sum::<f64>()
                .abs();

            let previous_balance = running_balance;
            running_balance += net;

            let account_balances: Vec<AccountBalance> = accounts
                .iter()
                .zip(account_running.iter_mut())
                .map(|(account, balance)| {
                    let change: f64 = transactions
                        .iter()
                        .filter(|o| o.account_id == account.id)
                        .map(|o| o.amount)
                        .sum();
                    *balance += change;
                    AccountBalance {
                        account_id: account.id.clone(),
                        name: account.name.clone(),
                        balance: *balance,
                        change,
                    }
                })
                .collect();

            debug!(
                "{} {}: {} occurrences, income {:.2}, expenses {:.2}, balance {:.2}",
                month_name(month),
                year,
                transactions.len(),
                total_income,
                total_expenses,
                running_balance
            );

            months.push(ProjectionMonth {
                month: month_name(month).to_string(),
                month_number: month,
                year,
                previous_balance,
                projected_balance: running_balance,
                balance_change: net,
                account_balances,
                total_income,
                total_expenses,
                net_change: net,
                transactions,
            });
        }

        info!(
            "Projected {} months from {} ({} templates): {:.2} -> {:.2}",
            months.len(),
            as_of,
            transactions.len(),
            starting_balance,
            running_balance
        );

        ProjectionResult {
            as_of,
            starting_balance,
            months,
        }
    }
}

/// Project `accounts` forward using `transactions` as templates.
///
/// Omitting `months_to_project` picks a horizon from the data; omitting
/// `as_of` anchors on today, which makes the output time dependent.
pub fn project(
    accounts: &[Account],
    transactions: &[Transaction],
    months_to_project: Option<u32>,
    as_of: Option<NaiveDate>,
) -> Vec<ProjectionMonth> {
    ProjectionEngine::new(ProjectionConfig { months_to_project, as_of }).project(accounts, transactions)
}
