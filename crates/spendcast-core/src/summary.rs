//! Spending summaries
//!
//! Day/week/month totals and a per-category breakdown, all relative to an
//! explicit `as_of` date so results do not depend on the wall clock.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::ExpenseRecord;

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub count: usize,
    /// Share of the overall total, 0-100
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub as_of: NaiveDate,
    pub today_total: f64,
    /// Since the most recent Sunday
    pub week_total: f64,
    /// Since the first of the month
    pub month_total: f64,
    /// All records up to `as_of`
    pub total: f64,
    pub record_count: usize,
    /// Sorted by amount, largest first
    pub categories: Vec<CategoryTotal>,
}

/// Sunday starting the week that contains `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn total_between(records: &[ExpenseRecord], from: NaiveDate, to: NaiveDate) -> f64 {
    records
        .iter()
        .filter(|r| r.date >= from && r.date <= to)
        .map(|r| r.amount)
        .sum()
}

/// Summarize records dated on or before `as_of`
pub fn summarize(records: &[ExpenseRecord], as_of: NaiveDate) -> SpendingSummary {
    let upto: Vec<ExpenseRecord> = records
        .iter()
        .filter(|r| r.date <= as_of)
        .cloned()
        .collect();

    SpendingSummary {
        as_of,
        today_total: total_between(&upto, as_of, as_of),
        week_total: total_between(&upto, week_start(as_of), as_of),
        month_total: total_between(&upto, month_start(as_of), as_of),
        total: upto.iter().map(|r| r.amount).sum(),
        record_count: upto.len(),
        categories: category_breakdown(&upto),
    }
}

/// Totals per category, largest first (ties by name)
pub fn category_breakdown(records: &[ExpenseRecord]) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<&str, (f64, usize)> = HashMap::new();
    for record in records {
        let entry = by_category.entry(record.category.as_str()).or_default();
        entry.0 += record.amount;
        entry.1 += 1;
    }

    let total: f64 = by_category.values().map(|(amount, _)| amount).sum();
    let mut categories: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (amount, count))| CategoryTotal {
            category: category.to_string(),
            amount,
            count,
            percentage: if total > 0.0 {
                amount / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    categories.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    fn record(d: NaiveDate, amount: f64, category: &str) -> ExpenseRecord {
        ExpenseRecord::new(d, amount, category)
    }

    #[test]
    fn test_week_start_is_sunday() {
        // 2024-03-13 is a Wednesday
        assert_eq!(week_start(date(2024, 3, 13)), date(2024, 3, 10));
        assert_eq!(week_start(date(2024, 3, 10)), date(2024, 3, 10));
        assert_eq!(week_start(date(2024, 3, 16)), date(2024, 3, 10));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2024, 2, 29)), date(2024, 2, 1));
    }

    #[test]
    fn test_summarize_periods() {
        let records = vec![
            record(date(2024, 3, 13), 10.0, "Dining"),
            record(date(2024, 3, 11), 20.0, "Transport"),
            record(date(2024, 3, 9), 40.0, "Dining"),
            record(date(2024, 2, 28), 80.0, "Groceries"),
            // After as_of: ignored
            record(date(2024, 3, 14), 1000.0, "Dining"),
        ];
        let summary = summarize(&records, date(2024, 3, 13));

        assert_eq!(summary.today_total, 10.0);
        assert_eq!(summary.week_total, 30.0);
        assert_eq!(summary.month_total, 70.0);
        assert_eq!(summary.total, 150.0);
        assert_eq!(summary.record_count, 4);
    }

    #[test]
    fn test_category_breakdown_sorted() {
        let records = vec![
            record(date(2024, 3, 1), 10.0, "Dining"),
            record(date(2024, 3, 2), 30.0, "Dining"),
            record(date(2024, 3, 3), 60.0, "Groceries"),
            record(date(2024, 3, 4), 100.0, "Rent"),
        ];
        let categories = category_breakdown(&records);

        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].category, "Rent");
        assert_eq!(categories[1].category, "Groceries");
        assert_eq!(categories[2].category, "Dining");
        assert_eq!(categories[2].count, 2);
        assert!((categories[0].percentage - 50.0).abs() < 1e-9);
        let share: f64 = categories.iter().map(|c| c.percentage).sum();
        assert!((share - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[], date(2024, 1, 1));
        assert_eq!(summary.total, 0.0);
        assert!(summary.categories.is_empty());
    }
}
