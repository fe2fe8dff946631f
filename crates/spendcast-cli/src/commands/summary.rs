//! Summary command implementation

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use spendcast_core::summary::{self, SpendingSummary};

use super::{load_records, parse_date_arg, print_json, truncate};

/// Summarize the records in `file` as of the given date (default today)
pub fn summarize_file(file: &Path, as_of: Option<&str>) -> Result<SpendingSummary> {
    let as_of = match as_of {
        Some(value) => parse_date_arg(value, "--as-of")?,
        None => Utc::now().date_naive(),
    };
    let records = load_records(file)?;
    Ok(summary::summarize(&records, as_of))
}

pub fn cmd_summary(file: &Path, as_of: Option<&str>, json: bool) -> Result<()> {
    let summary = summarize_file(file, as_of)?;

    if json {
        return print_json(&summary);
    }

    println!();
    println!("📊 Spending Summary");
    println!("   As of: {}", summary.as_of);
    println!("   ─────────────────────────────────────────────────────────────");

    if summary.record_count == 0 {
        println!("   No spending found up to this date.");
        return Ok(());
    }

    println!("   Today:       ${:.2}", summary.today_total);
    println!("   This week:   ${:.2}", summary.week_total);
    println!("   This month:  ${:.2}", summary.month_total);
    println!("   All time:    ${:.2} ({} records)", summary.total, summary.record_count);
    println!();
    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼────────────┼────────┼───────");
    for cat in &summary.categories {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            truncate(&cat.category, 25),
            cat.amount,
            cat.percentage,
            cat.count
        );
    }

    Ok(())
}
