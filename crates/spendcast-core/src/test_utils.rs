//! Test utilities for spendcast-core
//!
//! Record builders shared by the unit tests here and by downstream crates
//! (enable the `test-utils` feature).

use chrono::{Days, NaiveDate};

use crate::models::ExpenseRecord;

/// Category used by the builders unless stated otherwise
pub const DEFAULT_CATEGORY: &str = "Food";

/// Shorthand for a calendar date; panics on an invalid date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// One record per amount, `spacing_days` apart, starting at `start`
pub fn spaced_records(
    start: NaiveDate,
    spacing_days: u64,
    amounts: &[f64],
    category: &str,
) -> Vec<ExpenseRecord> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, &amount)| {
            let day = start
                .checked_add_days(Days::new(i as u64 * spacing_days))
                .expect("test date in range");
            ExpenseRecord::new(day, amount, category)
        })
        .collect()
}

/// One record per amount on consecutive days
pub fn daily_records(start: NaiveDate, amounts: &[f64]) -> Vec<ExpenseRecord> {
    spaced_records(start, 1, amounts, DEFAULT_CATEGORY)
}

/// One record per amount, a week apart
pub fn weekly_records(start: NaiveDate, amounts: &[f64]) -> Vec<ExpenseRecord> {
    spaced_records(start, 7, amounts, DEFAULT_CATEGORY)
}

/// Records from explicit (date, amount) pairs
pub fn records_from_amounts(entries: &[(NaiveDate, f64)]) -> Vec<ExpenseRecord> {
    entries
        .iter()
        .map(|&(day, amount)| ExpenseRecord::new(day, amount, DEFAULT_CATEGORY))
        .collect()
}

/// Reverse a record list, handy for checking that callers' order is ignored
pub fn shuffled(records: &[ExpenseRecord]) -> Vec<ExpenseRecord> {
    let mut out = records.to_vec();
    out.reverse();
    let mid = out.len() / 2;
    out.rotate_left(mid);
    out
}
