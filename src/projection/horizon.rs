//! Default projection horizon when the caller does not pick one

use chrono::NaiveDate;
use log::debug;

use super::calendar::{add_months, month_offset};
use super::occurrences::Template;
use crate::ledger::Schedule;

/// Shortest horizon ever chosen automatically
pub const MIN_HORIZON_MONTHS: u32 = 6;

/// Horizon floor once any recurring template exists
pub const RECURRING_HORIZON_MONTHS: u32 = 12;

/// Pick a horizon long enough to show every pending installment and a full
/// year of recurring activity.
///
/// Each installment plan contributes the 1-based month count from `as_of`'s
/// month to its last installment. Any recurring template raises the floor to
/// twelve months. Never less than six.
pub fn optimal_horizon(templates: &[Template<'_>], as_of: NaiveDate) -> u32 {
    let mut horizon = MIN_HORIZON_MONTHS;

    for template in templates {
        if let Schedule::Installment(plan) = template.schedule {
            let Some(last) = add_months(plan.start, plan.total - 1) else {
                continue;
            };
            let offset = month_offset(as_of, last) + 1;
            if offset > horizon as i64 {
                horizon = u32::try_from(offset).unwrap_or(u32::MAX);
            }
        }
    }

    if templates.iter().any(|t| t.tx.is_recurrent) {
        horizon = horizon.max(RECURRING_HORIZON_MONTHS);
    }

    let horizon = horizon.max(MIN_HORIZON_MONTHS);
    debug!("Optimal horizon from {}: {} months", as_of, horizon);
    horizon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{RecurrenceInterval, Transaction};
    use crate::projection::occurrences::classify;

    fn horizon(transactions: &[Transaction], as_of: NaiveDate) -> u32 {
        optimal_horizon(&classify(transactions), as_of)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn one_off(d: NaiveDate) -> Transaction {
        Transaction::one_off("tx", "Test", -10.0, d, "acc1", "cat1")
    }

    #[test]
    fn test_baseline_is_six() {
        let as_of = date(2024, 6, 15);
        assert_eq!(horizon(&[], as_of), 6);
        assert_eq!(horizon(&[one_off(date(2026, 1, 1))], as_of), 6);
    }

    #[test]
    fn test_recurring_raises_to_twelve() {
        let as_of = date(2024, 6, 15);
        let tx = one_off(date(2024, 1, 1)).recurring(RecurrenceInterval::Monthly);
        assert_eq!(horizon(&[tx], as_of), 12);
    }

    #[test]
    fn test_long_installment_plan_extends_horizon() {
        let as_of = date(2024, 6, 15);
        // 18 installments from July 2024: last one December 2025
        // offset = (2025 - 2024) * 12 + (12 - 6) + 1 = 19
        let tx = one_off(date(2024, 6, 1)).installments(18, 0, Some(date(2024, 7, 10)));
        assert_eq!(horizon(&[tx.clone()], as_of), 19);

        // A recurring template does not shrink a longer installment horizon
        let salary = one_off(date(2024, 1, 1)).recurring(RecurrenceInterval::Monthly);
        assert_eq!(horizon(&[tx, salary], as_of), 19);
    }

    #[test]
    fn test_short_installment_plan_keeps_minimum() {
        let as_of = date(2024, 6, 15);
        let tx = one_off(date(2024, 6, 1)).installments(3, 0, Some(date(2024, 7, 1)));
        assert_eq!(horizon(&[tx], as_of), 6);
    }

    #[test]
    fn test_finished_plan_is_ignored() {
        let as_of = date(2024, 6, 15);
        let tx = one_off(date(2020, 1, 1)).installments(12, 12, None);
        assert_eq!(horizon(&[tx], as_of), 6);
    }
}
