//! Load snapshot tables from CSV exports
//!
//! Column names follow the database tables. Empty cells read as missing
//! values, dates are `YYYY-MM-DD`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use log::info;
use serde::Deserialize;

use super::{Account, Category, RecurrenceInterval, Snapshot, Transaction};
use crate::error::{LedgerError, Result};

/// Raw transaction row; dates and flags are parsed by hand so bad cells
/// report which column they came from
#[derive(Debug, Deserialize)]
struct TransactionRecord {
    id: String,
    description: String,
    amount: f64,
    date: String,
    account_id: String,
    category_id: String,
    #[serde(default)]
    is_recurrent: Option<String>,
    #[serde(default)]
    recurrence_interval: Option<RecurrenceInterval>,
    #[serde(default)]
    installments_total: Option<u32>,
    #[serde(default)]
    installments_paid: Option<u32>,
    #[serde(default)]
    installment_start_date: Option<String>,
}

impl TransactionRecord {
    fn into_transaction(self) -> Result<Transaction> {
        let date = parse_date("date", &self.date)?;
        let installment_start_date = match self.installment_start_date.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Some(parse_date("installment_start_date", value)?),
            _ => None,
        };
        let is_recurrent = match self.is_recurrent.as_deref() {
            Some(value) => parse_flag(value)?,
            None => false,
        };

        Ok(Transaction {
            id: self.id,
            description: self.description,
            amount: self.amount,
            date,
            account_id: self.account_id,
            category_id: self.category_id,
            is_recurrent,
            recurrence_interval: self.recurrence_interval.unwrap_or_default(),
            installments_total: self.installments_total,
            installments_paid: self.installments_paid,
            installment_start_date,
        })
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    // Rows exported with a timestamp keep only the date part
    let date_part = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| LedgerError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" => Ok(false),
        "1" | "true" => Ok(true),
        other => Err(LedgerError::InvalidFlag(other.to_string())),
    }
}

/// Load accounts from any reader
pub fn load_accounts_from_reader<R: Read>(reader: R) -> Result<Vec<Account>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut accounts = Vec::new();
    for result in rdr.deserialize() {
        let account: Account = result?;
        accounts.push(account);
    }
    Ok(accounts)
}

/// Load categories from any reader
pub fn load_categories_from_reader<R: Read>(reader: R) -> Result<Vec<Category>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut categories = Vec::new();
    for result in rdr.deserialize() {
        let category: Category = result?;
        categories.push(category);
    }
    Ok(categories)
}

/// Load transactions from any reader
pub fn load_transactions_from_reader<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut transactions = Vec::new();
    for result in rdr.deserialize() {
        let record: TransactionRecord = result?;
        transactions.push(record.into_transaction()?);
    }
    Ok(transactions)
}

pub fn load_accounts<P: AsRef<Path>>(path: P) -> Result<Vec<Account>> {
    load_accounts_from_reader(File::open(path)?)
}

pub fn load_categories<P: AsRef<Path>>(path: P) -> Result<Vec<Category>> {
    load_categories_from_reader(File::open(path)?)
}

pub fn load_transactions<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>> {
    load_transactions_from_reader(File::open(path)?)
}

/// Load a full snapshot. Categories are optional since the engine never reads them.
pub fn load_snapshot<P: AsRef<Path>>(
    accounts_path: P,
    categories_path: Option<P>,
    transactions_path: P,
) -> Result<Snapshot> {
    let accounts = load_accounts(accounts_path)?;
    let categories = match categories_path {
        Some(path) => load_categories(path)?,
        None => Vec::new(),
    };
    let transactions = load_transactions(transactions_path)?;

    info!(
        "Loaded snapshot: {} accounts, {} categories, {} transactions",
        accounts.len(),
        categories.len(),
        transactions.len()
    );

    Ok(Snapshot::new(accounts, categories, transactions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountType, CategoryType, Schedule};

    const ACCOUNTS: &str = "\
id,name,type,initial_balance,current_balance,credit_limit,due_day
acc1,Checking,CHECKING,1000,1000,,
cc1,Credit Card,CREDIT_CARD,0,-500,1000,15
";

    const TRANSACTIONS: &str = "\
id,description,amount,date,account_id,category_id,is_recurrent,recurrence_interval,installments_total,installments_paid,installment_start_date
tx1,Salary,2000,2024-01-05,acc1,cat2,1,MONTHLY,,,
tx2,Laptop,-300,2024-01-20,cc1,cat3,0,,3,0,2024-02-20
tx3,Dinner,-45.5,2024-02-14T19:30:00Z,acc1,cat3,false,,,,
";

    #[test]
    fn test_load_accounts() {
        let accounts = load_accounts_from_reader(ACCOUNTS.as_bytes()).expect("Failed to load");
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].credit_limit, None);
        assert_eq!(accounts[1].account_type, AccountType::CreditCard);
        assert_eq!(accounts[1].due_day, Some(15));
        assert_eq!(accounts[1].current_balance, -500.0);
    }

    #[test]
    fn test_load_categories() {
        let data = "id,name,type\ncat1,Salary,INCOME\ncat2,Rent,EXPENSE\n";
        let categories = load_categories_from_reader(data.as_bytes()).expect("Failed to load");
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].category_type, CategoryType::Expense);
    }

    #[test]
    fn test_load_transactions() {
        let txs = load_transactions_from_reader(TRANSACTIONS.as_bytes()).expect("Failed to load");
        assert_eq!(txs.len(), 3);

        assert_eq!(txs[0].schedule(), Schedule::Recurring(RecurrenceInterval::Monthly));

        match txs[1].schedule() {
            Schedule::Installment(plan) => {
                assert_eq!(plan.total, 3);
                assert_eq!(plan.paid, Some(0));
                assert_eq!(plan.start, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
            }
            other => panic!("expected installment plan, got {:?}", other),
        }

        assert_eq!(txs[2].date, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        assert_eq!(txs[2].schedule(), Schedule::OneOff);
    }

    #[test]
    fn test_bad_date_names_column() {
        let data = "\
id,description,amount,date,account_id,category_id,is_recurrent,recurrence_interval,installments_total,installments_paid,installment_start_date
tx1,Broken,-1,2024-13-40,acc1,cat1,0,,,,
";
        let err = load_transactions_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidDate { field: "date", .. }));
    }

    #[test]
    fn test_bad_flag() {
        let data = "\
id,description,amount,date,account_id,category_id,is_recurrent,recurrence_interval,installments_total,installments_paid,installment_start_date
tx1,Broken,-1,2024-01-01,acc1,cat1,maybe,,,,
";
        let err = load_transactions_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidFlag(_)));
    }
}
