//! Account, category and transaction records as stored by the tracker

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

/// Kind of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Investment,
    Business,
    Cash,
    Crypto,
    Loan,
    Pension,
    /// Catch-all cash bucket ("cash-other" in the tracker forms)
    #[serde(alias = "CASH_OTHER")]
    Other,
}

/// A money account with its running balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub initial_balance: f64,
    /// Balance after every stored transaction has been applied
    pub current_balance: f64,
    pub credit_limit: Option<f64>,
    /// Statement due day of month, credit accounts only
    pub due_day: Option<u32>,
}

impl Account {
    /// Credit cards and loans carry a negative balance while money is owed
    pub fn is_credit(&self) -> bool {
        matches!(self.account_type, AccountType::CreditCard | AccountType::Loan)
    }

    /// Remaining credit: limit plus the (usually negative) current balance
    pub fn available_credit(&self) -> Option<f64> {
        self.credit_limit.map(|limit| limit + self.current_balance)
    }
}

/// Whether a category classifies money in or money out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryType {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

/// How often a recurring transaction repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceInterval {
    Monthly,
    Yearly,
    #[default]
    None,
}

/// Installment plan: a total amount split evenly over monthly payments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentPlan {
    /// Number of installments, always > 0
    pub total: u32,
    /// Installments already paid; plans without a count never produce occurrences
    pub paid: Option<u32>,
    /// Due date of the first installment
    pub start: NaiveDate,
}

/// The generative role of a transaction template
///
/// Stored rows describe this with independent flags; every row maps to
/// exactly one schedule here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    OneOff,
    Recurring(RecurrenceInterval),
    Installment(InstallmentPlan),
}

/// A stored transaction row, used as a template for projected occurrences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    /// Signed amount, negative for money out
    pub amount: f64,
    pub date: NaiveDate,
    pub account_id: String,
    pub category_id: String,
    #[serde(default)]
    pub is_recurrent: bool,
    #[serde(default)]
    pub recurrence_interval: RecurrenceInterval,
    pub installments_total: Option<u32>,
    pub installments_paid: Option<u32>,
    pub installment_start_date: Option<NaiveDate>,
}

impl Transaction {
    /// Plain one-off transaction, the common case when building snapshots by hand
    pub fn one_off(
        id: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        account_id: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            amount,
            date,
            account_id: account_id.into(),
            category_id: category_id.into(),
            is_recurrent: false,
            recurrence_interval: RecurrenceInterval::None,
            installments_total: None,
            installments_paid: None,
            installment_start_date: None,
        }
    }

    /// Turn this template into a recurring one
    pub fn recurring(mut self, interval: RecurrenceInterval) -> Self {
        self.is_recurrent = true;
        self.recurrence_interval = interval;
        self
    }

    /// Turn this template into an installment plan starting at `start` (or `date` if `None`)
    pub fn installments(mut self, total: u32, paid: u32, start: Option<NaiveDate>) -> Self {
        self.installments_total = Some(total);
        self.installments_paid = Some(paid);
        self.installment_start_date = start;
        self
    }

    fn installment_plan(&self) -> Option<InstallmentPlan> {
        match self.installments_total {
            Some(total) if total > 0 => Some(InstallmentPlan {
                total,
                paid: self.installments_paid,
                start: self.installment_start_date.unwrap_or(self.date),
            }),
            _ => None,
        }
    }

    /// True when the row claims to be both recurring and an installment plan
    pub fn has_conflicting_schedule(&self) -> bool {
        self.is_recurrent && self.installment_plan().is_some()
    }

    /// Classify the row. A row flagged as both recurring and installment is
    /// treated as an installment plan so it is never counted twice.
    pub fn schedule(&self) -> Schedule {
        if let Some(plan) = self.installment_plan() {
            if self.is_recurrent {
                warn!(
                    "Transaction {} is flagged recurring and has {} installments; using the installment plan",
                    self.id, plan.total
                );
            }
            return Schedule::Installment(plan);
        }

        if self.is_recurrent {
            Schedule::Recurring(self.recurrence_interval)
        } else {
            Schedule::OneOff
        }
    }

    /// Amount with its sign forced by the category: expenses negative, income positive
    pub fn normalized_amount(&self, category: &Category) -> f64 {
        match category.category_type {
            CategoryType::Expense => -self.amount.abs(),
            CategoryType::Income => self.amount.abs(),
        }
    }
}
