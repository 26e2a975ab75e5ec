//! Projection output: monthly snapshots and the occurrences inside them

use chrono::NaiveDate;
use serde::Serialize;

/// Which rule produced an occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccurrenceOrigin {
    OneOff,
    Recurring,
    Installment,
}

/// A dated instance of a transaction template inside a projected month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    /// Template id for one-off rows, a fresh UUID for synthesized ones
    pub id: String,
    pub template_id: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub account_id: String,
    pub category_id: String,
    pub origin: OccurrenceOrigin,
    /// 1-based installment number, installment occurrences only
    pub installment_number: Option<u32>,
}

/// One account's projected balance at the end of a month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBalance {
    pub account_id: String,
    pub name: String,
    pub balance: f64,
    /// Net of this month's occurrences booked to the account
    pub change: f64,
}

/// Forecast for a single calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionMonth {
    /// English month name
    pub month: String,
    pub month_number: u32,
    pub year: i32,
    pub previous_balance: f64,
    pub projected_balance: f64,
    pub balance_change: f64,
    /// Per-account balances, in account input order
    pub account_balances: Vec<AccountBalance>,
    pub total_income: f64,
    /// Absolute value of all outflows
    pub total_expenses: f64,
    pub net_change: f64,
    pub transactions: Vec<Occurrence>,
}

impl ProjectionMonth {
    pub fn account_balance(&self, account_id: &str) -> Option<&AccountBalance> {
        self.account_balances.iter().find(|b| b.account_id == account_id)
    }

    /// Label like "March 2025"
    pub fn label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

/// Complete result of one projection run
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionResult {
    /// Anchor date; the first month is the one after it
    pub as_of: NaiveDate,
    /// Aggregate balance before the first projected month
    pub starting_balance: f64,
    pub months: Vec<ProjectionMonth>,
}

impl ProjectionResult {
    pub fn horizon(&self) -> usize {
        self.months.len()
    }

    /// Projected aggregate balance after the last month (starting balance if empty)
    pub fn final_balance(&self) -> f64 {
        self.months
            .last()
            .map(|m| m.projected_balance)
            .unwrap_or(self.starting_balance)
    }

    pub fn total_income(&self) -> f64 {
        self.months.iter().map(|m| m.total_income).sum()
    }

    pub fn total_expenses(&self) -> f64 {
        self.months.iter().map(|m| m.total_expenses).sum()
    }

    /// Month with the lowest projected aggregate balance
    pub fn lowest_month(&self) -> Option<&ProjectionMonth> {
        self.months
            .iter()
            .min_by(|a, b| a.projected_balance.total_cmp(&b.projected_balance))
    }

    /// First month whose projected aggregate balance drops below zero
    pub fn first_negative_month(&self) -> Option<&ProjectionMonth> {
        self.months.iter().find(|m| m.projected_balance < 0.0)
    }
}
