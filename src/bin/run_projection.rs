//! Run a balance projection over CSV exports of the tracker tables
//!
//! Outputs one row per projected month with aggregate totals and a balance
//! column per account.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::warn;

use finance_projection::ledger::load_snapshot;
use finance_projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "run_projection", about = "Forecast monthly balances from a tracker snapshot")]
struct Args {
    /// accounts.csv export
    #[arg(long)]
    accounts: PathBuf,

    /// transactions.csv export
    #[arg(long)]
    transactions: PathBuf,

    /// categories.csv export, needed for --normalize-signs and category checks
    #[arg(long)]
    categories: Option<PathBuf>,

    /// Months to project; picked from the data when omitted
    #[arg(long)]
    months: Option<u32>,

    /// Anchor date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,

    /// Output file; stdout when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Force transaction signs from their category type before projecting
    #[arg(long)]
    normalize_signs: bool,

    /// Fail instead of warning when the snapshot has consistency problems
    #[arg(long)]
    strict: bool,
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", value, e))
}

fn write_csv<W: Write>(out: W, result: &ProjectionResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header = vec![
        "Month".to_string(),
        "Year".to_string(),
        "PreviousBalance".to_string(),
        "Income".to_string(),
        "Expenses".to_string(),
        "Net".to_string(),
        "ProjectedBalance".to_string(),
    ];
    if let Some(first) = result.months.first() {
        header.extend(first.account_balances.iter().map(|b| b.name.clone()));
    }
    wtr.write_record(&header)?;

    for month in &result.months {
        let mut record = vec![
            month.month.clone(),
            month.year.to_string(),
            format!("{:.2}", month.previous_balance),
            format!("{:.2}", month.total_income),
            format!("{:.2}", month.total_expenses),
            format!("{:.2}", month.net_change),
            format!("{:.2}", month.projected_balance),
        ];
        record.extend(month.account_balances.iter().map(|b| format!("{:.2}", b.balance)));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn print_summary(result: &ProjectionResult) {
    eprintln!("\nProjection Summary (as of {}):", result.as_of);
    eprintln!("  Months:           {}", result.horizon());
    eprintln!("  Starting balance: {:.2}", result.starting_balance);
    eprintln!("  Total income:     {:.2}", result.total_income());
    eprintln!("  Total expenses:   {:.2}", result.total_expenses());
    eprintln!("  Final balance:    {:.2}", result.final_balance());
    if let Some(low) = result.lowest_month() {
        eprintln!("  Lowest balance:   {:.2} ({})", low.projected_balance, low.label());
    }
    if let Some(neg) = result.first_negative_month() {
        eprintln!("  Goes negative in: {}", neg.label());
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let mut snapshot = load_snapshot(&args.accounts, args.categories.as_ref(), &args.transactions)
        .context("Failed to load snapshot")?;
    eprintln!(
        "Loaded {} accounts and {} transactions in {:?}",
        snapshot.accounts.len(),
        snapshot.transactions.len(),
        start.elapsed()
    );

    if args.normalize_signs {
        if snapshot.categories.is_empty() {
            bail!("--normalize-signs needs --categories");
        }
        let changed = snapshot.normalize_signs();
        eprintln!("Normalized {} transaction signs", changed);
    }

    let problems = snapshot.validate();
    if !problems.is_empty() {
        for problem in &problems {
            warn!("{}", problem);
        }
        if args.strict {
            bail!("Snapshot has {} consistency problems (first: {})", problems.len(), problems[0]);
        }
    }

    let engine = ProjectionEngine::new(ProjectionConfig {
        months_to_project: args.months,
        as_of: args.as_of,
    });
    let result = engine.run(&snapshot.accounts, &snapshot.transactions);

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        OutputFormat::Csv => write_csv(out, &result)?,
        OutputFormat::Json => serde_json::to_writer_pretty(out, &result)?,
    }

    if let Some(path) = &args.output {
        eprintln!("Output written to {}", path.display());
    }
    print_summary(&result);
    eprintln!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
