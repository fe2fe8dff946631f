//! Recurring expense command implementation

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use spendcast_core::recurring::{self, RecurringExpense};
use spendcast_core::{ExpenseRecord, ForecastConfig};

use super::{parse_date_arg, print_json, truncate};

/// What is due, what is coming up, and what auto-generation would record
#[derive(Debug, Serialize)]
pub struct RecurringReport {
    pub as_of: NaiveDate,
    pub days: u32,
    pub due_today: Vec<RecurringExpense>,
    pub upcoming: Vec<RecurringExpense>,
    pub overdue: Vec<RecurringExpense>,
    /// Records for auto-generating items due on or before `as_of`
    pub generated: Vec<ExpenseRecord>,
}

pub fn recurring_report(
    config: &ForecastConfig,
    file: &Path,
    as_of: Option<&str>,
    days: Option<u32>,
) -> Result<RecurringReport> {
    let as_of = match as_of {
        Some(value) => parse_date_arg(value, "--as-of")?,
        None => Utc::now().date_naive(),
    };
    let days = days.unwrap_or(config.upcoming_days);

    let items = recurring::load_file(file)
        .with_context(|| format!("Failed to load recurring expenses from {}", file.display()))?;

    let due_today = recurring::due_on(&items, as_of).into_iter().cloned().collect();
    let upcoming = recurring::upcoming(&items, as_of, days)
        .into_iter()
        .cloned()
        .collect();
    let overdue = items
        .iter()
        .filter(|e| e.is_overdue(as_of))
        .cloned()
        .collect();

    let mut generated = Vec::new();
    for item in items.iter().filter(|e| e.auto_generate) {
        let mut item = item.clone();
        generated.extend(
            item.catch_up(as_of)
                .with_context(|| format!("Failed to generate records for '{}'", item.name))?,
        );
    }
    generated.sort_by_key(|r: &ExpenseRecord| r.date);

    Ok(RecurringReport {
        as_of,
        days,
        due_today,
        upcoming,
        overdue,
        generated,
    })
}

fn print_items(title: &str, items: &[RecurringExpense]) {
    println!();
    println!("   {} ({})", title, items.len());
    if items.is_empty() {
        return;
    }
    println!(
        "   {:20} │ {:15} │ {:>9} │ {:8} │ {:10}",
        "Name", "Category", "Amount", "Every", "Due"
    );
    println!("   ─────────────────────┼─────────────────┼───────────┼──────────┼───────────");
    for item in items {
        println!(
            "   {:20} │ {:15} │ {:>9.2} │ {:8} │ {}",
            truncate(&item.name, 20),
            truncate(&item.category, 15),
            item.amount,
            item.frequency.as_str(),
            item.next_due_date
        );
    }
}

pub fn cmd_recurring(
    config: &ForecastConfig,
    file: &Path,
    as_of: Option<&str>,
    days: Option<u32>,
    json: bool,
) -> Result<()> {
    let report = recurring_report(config, file, as_of, days)?;

    if json {
        return print_json(&report);
    }

    println!();
    println!("🔁 Recurring Expenses");
    println!("   As of: {} (next {} days)", report.as_of, report.days);
    println!("   ─────────────────────────────────────────────────────────────");

    print_items("Due today", &report.due_today);
    print_items("Upcoming", &report.upcoming);
    if !report.overdue.is_empty() {
        print_items("⚠️  Overdue", &report.overdue);
    }

    if !report.generated.is_empty() {
        let total: f64 = report.generated.iter().map(|r| r.amount).sum();
        println!();
        println!(
            "   Auto-generated: {} records, ${:.2}",
            report.generated.len(),
            total
        );
        for record in &report.generated {
            println!(
                "   {} │ {:15} │ {:>9.2}",
                record.date,
                truncate(&record.category, 15),
                record.amount
            );
        }
    }

    Ok(())
}
