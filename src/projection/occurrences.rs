//! Expanding transaction templates into dated occurrences for one month

use chrono::Datelike;
use uuid::Uuid;

use super::calendar::{add_months, date_month_index, in_month, month_index, rolled_date};
use super::month::{Occurrence, OccurrenceOrigin};
use crate::ledger::{InstallmentPlan, RecurrenceInterval, Schedule, Transaction};

/// A stored row paired with its schedule, classified once per run
#[derive(Debug, Clone, Copy)]
pub struct Template<'a> {
    pub tx: &'a Transaction,
    pub schedule: Schedule,
}

pub fn classify(transactions: &[Transaction]) -> Vec<Template<'_>> {
    transactions
        .iter()
        .map(|tx| Template { tx, schedule: tx.schedule() })
        .collect()
}

fn occurrence(
    tx: &Transaction,
    id: String,
    amount: f64,
    date: chrono::NaiveDate,
    origin: OccurrenceOrigin,
    installment_number: Option<u32>,
) -> Occurrence {
    Occurrence {
        id,
        template_id: tx.id.clone(),
        description: tx.description.clone(),
        amount,
        date,
        account_id: tx.account_id.clone(),
        category_id: tx.category_id.clone(),
        origin,
        installment_number,
    }
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// All occurrences falling in (year, month): one-off rows first, then
/// recurring, then installments, each in template order.
pub fn synthesize_month(templates: &[Template<'_>], year: i32, month: u32) -> Vec<Occurrence> {
    let mut out = Vec::new();

    for t in templates {
        if t.schedule == Schedule::OneOff && in_month(t.tx.date, year, month) {
            out.push(occurrence(
                t.tx,
                t.tx.id.clone(),
                t.tx.amount,
                t.tx.date,
                OccurrenceOrigin::OneOff,
                None,
            ));
        }
    }

    for t in templates {
        if let Schedule::Recurring(interval) = t.schedule {
            if let Some(occ) = recurring_occurrence(t.tx, interval, year, month) {
                out.push(occ);
            }
        }
    }

    for t in templates {
        if let Schedule::Installment(plan) = t.schedule {
            out.extend(installment_occurrences(t.tx, &plan, year, month));
        }
    }

    out
}

fn recurring_occurrence(
    tx: &Transaction,
    interval: RecurrenceInterval,
    year: i32,
    month: u32,
) -> Option<Occurrence> {
    let include = match interval {
        RecurrenceInterval::Monthly => true,
        RecurrenceInterval::Yearly => tx.date.month() == month,
        RecurrenceInterval::None => false,
    };
    if !include {
        return None;
    }

    // Day 31 in a 30-day month lands on the 1st of the following month
    let date = rolled_date(year, month, tx.date.day())?;
    Some(occurrence(tx, fresh_id(), tx.amount, date, OccurrenceOrigin::Recurring, None))
}

/// Unpaid installments of `plan` due in (year, month).
///
/// Installment `k` is due `k` months after the start. Because of day
/// rollover it can land one month later than that, so only the two indices
/// that could hit the target month are checked.
fn installment_occurrences(
    tx: &Transaction,
    plan: &InstallmentPlan,
    year: i32,
    month: u32,
) -> Vec<Occurrence> {
    let Some(paid) = plan.paid else {
        return Vec::new();
    };
    let per_installment = tx.amount / plan.total as f64;
    let offset = month_index(year, month) - date_month_index(plan.start);

    let mut out = Vec::new();
    for k in [offset - 1, offset] {
        if k < paid as i64 || k >= plan.total as i64 {
            continue;
        }
        let k = k as u32;
        let Some(due) = add_months(plan.start, k) else {
            continue;
        };
        if in_month(due, year, month) {
            out.push(occurrence(
                tx,
                fresh_id(),
                per_installment,
                due,
                OccurrenceOrigin::Installment,
                Some(k + 1),
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn one_off(id: &str, amount: f64, d: NaiveDate) -> Transaction {
        Transaction::one_off(id, "Test", amount, d, "acc1", "cat1")
    }

    #[test]
    fn test_one_off_only_in_its_month() {
        let txs = vec![one_off("t1", -100.0, date(2024, 7, 3))];
        let templates = classify(&txs);

        let july = synthesize_month(&templates, 2024, 7);
        assert_eq!(july.len(), 1);
        assert_eq!(july[0].id, "t1");
        assert_eq!(july[0].origin, OccurrenceOrigin::OneOff);

        assert!(synthesize_month(&templates, 2024, 8).is_empty());
        assert!(synthesize_month(&templates, 2025, 7).is_empty());
    }

    #[test]
    fn test_recurring_gets_fresh_id_and_target_date() {
        let txs = vec![one_off("rent", -1000.0, date(2024, 1, 5)).recurring(RecurrenceInterval::Monthly)];
        let templates = classify(&txs);

        let occs = synthesize_month(&templates, 2024, 9);
        assert_eq!(occs.len(), 1);
        assert_ne!(occs[0].id, "rent");
        assert_eq!(occs[0].template_id, "rent");
        assert_eq!(occs[0].date, date(2024, 9, 5));
        assert_eq!(occs[0].amount, -1000.0);
    }

    #[test]
    fn test_recurring_day_rollover() {
        let txs = vec![one_off("sub", -15.0, date(2024, 1, 31)).recurring(RecurrenceInterval::Monthly)];
        let templates = classify(&txs);

        let occs = synthesize_month(&templates, 2024, 4);
        assert_eq!(occs.len(), 1);
        assert_eq!(occs[0].date, date(2024, 5, 1));
    }

    #[test]
    fn test_yearly_only_in_matching_month() {
        let txs = vec![one_off("ins", -600.0, date(2023, 3, 20)).recurring(RecurrenceInterval::Yearly)];
        let templates = classify(&txs);

        assert_eq!(synthesize_month(&templates, 2025, 3).len(), 1);
        assert!(synthesize_month(&templates, 2025, 4).is_empty());
    }

    #[test]
    fn test_recurring_without_interval_is_silent() {
        let txs = vec![one_off("odd", -5.0, date(2024, 6, 1)).recurring(RecurrenceInterval::None)];
        let templates = classify(&txs);
        assert!(synthesize_month(&templates, 2024, 6).is_empty());
        assert!(synthesize_month(&templates, 2024, 7).is_empty());
    }

    #[test]
    fn test_installments_skip_paid() {
        let txs = vec![one_off("car", -600.0, date(2024, 1, 10)).installments(6, 2, Some(date(2024, 2, 10)))];
        let templates = classify(&txs);

        // Installments 1 and 2 (Feb, Mar) are paid
        assert!(synthesize_month(&templates, 2024, 2).is_empty());
        assert!(synthesize_month(&templates, 2024, 3).is_empty());

        let april = synthesize_month(&templates, 2024, 4);
        assert_eq!(april.len(), 1);
        assert_relative_eq!(april[0].amount, -100.0);
        assert_eq!(april[0].installment_number, Some(3));
        assert_eq!(april[0].date, date(2024, 4, 10));

        // Six installments: Feb..Jul
        assert_eq!(synthesize_month(&templates, 2024, 7).len(), 1);
        assert!(synthesize_month(&templates, 2024, 8).is_empty());
    }

    #[test]
    fn test_installment_start_defaults_to_date() {
        let txs = vec![one_off("tv", -90.0, date(2024, 5, 2)).installments(3, 0, None)];
        let templates = classify(&txs);

        let may = synthesize_month(&templates, 2024, 5);
        assert_eq!(may.len(), 1);
        assert_eq!(may[0].installment_number, Some(1));
    }

    #[test]
    fn test_installment_rollover_can_double_up() {
        // Start Jan 31 2023: k=1 -> Feb 31 -> Mar 3, k=2 -> Mar 31
        let txs = vec![one_off("p", -300.0, date(2023, 1, 31)).installments(3, 0, None)];
        let templates = classify(&txs);

        assert!(synthesize_month(&templates, 2023, 2).is_empty());
        let march = synthesize_month(&templates, 2023, 3);
        assert_eq!(march.len(), 2);
        assert_eq!(march[0].installment_number, Some(2));
        assert_eq!(march[0].date, date(2023, 3, 3));
        assert_eq!(march[1].installment_number, Some(3));
        assert_eq!(march[1].date, date(2023, 3, 31));
    }

    #[test]
    fn test_plan_without_paid_count_is_silent() {
        let mut tx = one_off("x", -100.0, date(2024, 5, 1)).installments(2, 0, None);
        tx.installments_paid = None;
        let txs = vec![tx];
        let templates = classify(&txs);
        assert!(synthesize_month(&templates, 2024, 5).is_empty());
    }

    #[test]
    fn test_order_one_off_recurring_installment() {
        let txs = vec![
            one_off("plan", -200.0, date(2024, 8, 1)).installments(2, 0, None),
            one_off("salary", 2000.0, date(2024, 1, 1)).recurring(RecurrenceInterval::Monthly),
            one_off("gift", 50.0, date(2024, 8, 20)),
        ];
        let templates = classify(&txs);

        let occs = synthesize_month(&templates, 2024, 8);
        let origins: Vec<_> = occs.iter().map(|o| o.origin).collect();
        assert_eq!(
            origins,
            vec![OccurrenceOrigin::OneOff, OccurrenceOrigin::Recurring, OccurrenceOrigin::Installment]
        );
    }
}
