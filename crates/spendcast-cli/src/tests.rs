//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use spendcast_core::test_utils::date;
use spendcast_core::{Algorithm, BudgetPeriod, ForecastConfig, RecurringExpense, Trend};
use tempfile::TempDir;

use crate::commands::{self, truncate};

/// Write a CSV of `date,amount,category` rows into a temp dir
fn write_csv(dir: &TempDir, rows: &[(NaiveDate, f64, &str)]) -> PathBuf {
    let path = dir.path().join("expenses.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "date,amount,category,note").unwrap();
    for (i, (day, amount, category)) in rows.iter().enumerate() {
        writeln!(file, "{},{:.2},{},row {}", day, amount, category, i).unwrap();
    }
    path
}

/// Twelve daily Dining records rising by 20, plus a few Transport ones
fn sample_rows() -> Vec<(NaiveDate, f64, &'static str)> {
    let mut rows: Vec<(NaiveDate, f64, &'static str)> = (0..12)
        .map(|i| (date(2024, 3, 1 + i), 100.0 + 20.0 * i as f64, "Dining"))
        .collect();
    rows.push((date(2024, 3, 2), 3.5, "Transport"));
    rows.push((date(2024, 3, 9), 3.5, "Transport"));
    rows
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Groceries", 25), "Groceries");
    assert_eq!(truncate("A very long category name indeed", 10), "A very ...");
}

#[test]
fn test_parse_algorithm_defaults_to_config() {
    let config = ForecastConfig::default();
    assert_eq!(
        commands::parse_algorithm(None, &config).unwrap(),
        Algorithm::Combined
    );
    assert_eq!(
        commands::parse_algorithm(Some("ma"), &config).unwrap(),
        Algorithm::MovingAverage
    );
    assert!(commands::parse_algorithm(Some("prophet"), &config).is_err());
}

#[test]
fn test_parse_date_arg() {
    assert_eq!(
        commands::parse_date_arg("2024-03-15", "--as-of").unwrap(),
        date(2024, 3, 15)
    );
    assert!(commands::parse_date_arg("15 March", "--as-of").is_err());
}

#[test]
fn test_load_config_missing_path_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");
    assert!(commands::load_config(Some(&missing)).is_err());
}

// ========== Predict Command Tests ==========

#[test]
fn test_prediction_options() {
    let config = ForecastConfig::default();
    let options =
        commands::prediction_options(&config, Some("Dining"), Some(3), Some("linear")).unwrap();
    assert_eq!(options.prediction_months, 3);
    assert_eq!(options.algorithm, Algorithm::Linear);
    assert_eq!(options.category.as_deref(), Some("Dining"));

    let defaults = commands::prediction_options(&config, None, None, None).unwrap();
    assert_eq!(defaults.prediction_months, 1);
    assert_eq!(defaults.algorithm, Algorithm::Combined);

    assert!(commands::prediction_options(&config, None, Some(0), None).is_err());
    assert!(commands::prediction_options(&config, None, Some(120), None).is_ok());
    assert!(commands::prediction_options(&config, None, Some(200_000_000), None).is_err());
}

#[test]
fn test_predict_file_by_category() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, &sample_rows());
    let config = ForecastConfig::default();

    let options =
        commands::prediction_options(&config, Some("Dining"), Some(1), Some("linear")).unwrap();
    let (records, prediction) = commands::predict_file(&config, &path, &options).unwrap();

    assert_eq!(records.len(), 14);
    let prediction = prediction.unwrap();
    assert_eq!(prediction.trend, Trend::Increasing);
    assert_eq!(prediction.historical_points().count(), 12);
    assert_eq!(prediction.predicted_points().count(), 4);
}

#[test]
fn test_predict_file_not_enough_data() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, &sample_rows());
    let config = ForecastConfig::default();

    let options = commands::prediction_options(&config, Some("Transport"), None, None).unwrap();
    let (_, prediction) = commands::predict_file(&config, &path, &options).unwrap();
    assert!(prediction.is_none());
}

#[test]
fn test_cmd_predict_outputs() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, &sample_rows());
    let config = ForecastConfig::default();

    assert!(commands::cmd_predict(&config, &path, Some("Dining"), None, None, false).is_ok());
    assert!(commands::cmd_predict(&config, &path, Some("Dining"), Some(2), None, true).is_ok());
    assert!(commands::cmd_predict(&config, &path, Some("Transport"), None, None, false).is_ok());
}

#[test]
fn test_cmd_predict_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.csv");
    let config = ForecastConfig::default();
    assert!(commands::cmd_predict(&config, &path, None, None, None, false).is_err());
}

// ========== Summary Command Tests ==========

#[test]
fn test_summarize_file() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, &sample_rows());

    // 2024-03-12 is a Tuesday; the week starts Sunday 2024-03-10
    let summary = commands::summarize_file(&path, Some("2024-03-12")).unwrap();
    assert_eq!(summary.today_total, 320.0);
    assert_eq!(summary.week_total, 280.0 + 300.0 + 320.0);
    assert_eq!(summary.record_count, 14);
    assert_eq!(summary.categories[0].category, "Dining");
}

#[test]
fn test_cmd_summary() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, &sample_rows());
    assert!(commands::cmd_summary(&path, Some("2024-03-12"), false).is_ok());
    assert!(commands::cmd_summary(&path, Some("2024-03-12"), true).is_ok());
    assert!(commands::cmd_summary(&path, Some("not-a-date"), false).is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_default_start() {
    let today = date(2024, 3, 13);
    assert_eq!(
        commands::default_start(BudgetPeriod::Weekly, today),
        date(2024, 3, 10)
    );
    assert_eq!(
        commands::default_start(BudgetPeriod::Monthly, today),
        date(2024, 3, 1)
    );
    assert_eq!(
        commands::default_start(BudgetPeriod::Yearly, today),
        date(2024, 1, 1)
    );
}

#[test]
fn test_budget_report() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, &sample_rows());
    let config = ForecastConfig::default();

    let report = commands::budget_report(
        &config,
        &path,
        1000.0,
        Some("Dining"),
        "monthly",
        Some("2024-03-01"),
        Some("linear"),
    )
    .unwrap();

    // 100 + 120 + ... + 320 over twelve days
    assert_eq!(report.status.spent, 2520.0);
    assert!(report.status.over_budget);
    let projected = report.projected.unwrap();
    assert!(projected.will_exceed);
    assert_eq!(projected.trend, Trend::Increasing);
}

#[test]
fn test_budget_report_projection_matches_period() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, &sample_rows());
    let config = ForecastConfig::default();
    let report = |limit: f64, period: &str| {
        commands::budget_report(
            &config,
            &path,
            limit,
            Some("Dining"),
            period,
            Some("2024-03-01"),
            Some("linear"),
        )
        .unwrap()
        .projected
        .unwrap()
    };

    // Month-ahead estimate is 100 + 20 * 39 = 880
    let weekly = report(250.0, "weekly");
    assert!((weekly.predicted_amount - 880.0).abs() < 1e-6);
    assert!((weekly.monthly_limit - 250.0 * 52.0 / 12.0).abs() < 1e-6);
    assert!(!weekly.will_exceed);

    let yearly = report(1200.0, "yearly");
    assert!((yearly.monthly_limit - 100.0).abs() < 1e-6);
    assert!(yearly.will_exceed);

    let yearly = report(12_000.0, "yearly");
    assert!(!yearly.will_exceed);
}

#[test]
fn test_budget_report_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, &sample_rows());
    let config = ForecastConfig::default();

    assert!(commands::budget_report(&config, &path, 100.0, None, "daily", None, None).is_err());
    assert!(commands::budget_report(&config, &path, -5.0, None, "monthly", None, None).is_err());
}

#[test]
fn test_cmd_budget() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, &sample_rows());
    let config = ForecastConfig::default();

    assert!(commands::cmd_budget(
        &config,
        &path,
        5000.0,
        None,
        "monthly",
        Some("2024-03-01"),
        None,
        false
    )
    .is_ok());
    assert!(commands::cmd_budget(
        &config,
        &path,
        10.0,
        Some("Transport"),
        "weekly",
        Some("2024-03-01"),
        None,
        true
    )
    .is_ok());
}

// ========== Recurring Command Tests ==========

fn write_recurring(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("recurring.json");
    std::fs::write(
        &path,
        r#"[
  {"name": "Rent", "category": "Housing", "amount": 1200, "frequency": "monthly",
   "start_date": "2024-01-01", "next_due_date": "2024-03-01", "auto_generate": true},
  {"name": "Gym", "category": "Health", "amount": 15, "frequency": "weekly",
   "start_date": "2024-03-04"},
  {"name": "Phone", "category": "Utilities", "amount": 40, "frequency": "monthly",
   "start_date": "2024-03-07"},
  {"name": "Magazine", "category": "Leisure", "amount": 8, "frequency": "monthly",
   "start_date": "2024-03-05", "is_active": false}
]"#,
    )
    .unwrap();
    path
}

fn names(items: &[RecurringExpense]) -> Vec<String> {
    items.iter().map(|e| e.name.clone()).collect()
}

#[test]
fn test_recurring_report() {
    let dir = TempDir::new().unwrap();
    let path = write_recurring(&dir);
    let config = ForecastConfig::default();

    let report = commands::recurring_report(&config, &path, Some("2024-03-04"), None).unwrap();
    assert_eq!(report.days, 3);

    assert_eq!(names(&report.due_today), vec!["Gym"]);
    assert_eq!(names(&report.upcoming), vec!["Gym", "Phone"]);
    assert_eq!(names(&report.overdue), vec!["Rent"]);

    // Rent auto-generates its missed March occurrence only
    assert_eq!(report.generated.len(), 1);
    assert_eq!(report.generated[0].date, date(2024, 3, 1));
    assert_eq!(report.generated[0].category, "Housing");
}

#[test]
fn test_recurring_report_custom_window() {
    let dir = TempDir::new().unwrap();
    let path = write_recurring(&dir);
    let config = ForecastConfig::default();

    let report = commands::recurring_report(&config, &path, Some("2024-03-05"), Some(1)).unwrap();
    assert!(report.due_today.is_empty());
    assert!(report.upcoming.is_empty());
    assert_eq!(report.overdue.len(), 2);
}

#[test]
fn test_cmd_recurring() {
    let dir = TempDir::new().unwrap();
    let path = write_recurring(&dir);
    let config = ForecastConfig::default();

    assert!(commands::cmd_recurring(&config, &path, Some("2024-03-04"), None, false).is_ok());
    assert!(commands::cmd_recurring(&config, &path, Some("2024-03-04"), Some(30), true).is_ok());
    let missing = dir.path().join("none.json");
    assert!(commands::cmd_recurring(&config, &missing, None, None, false).is_err());
}

// ========== Config Command Tests ==========

#[test]
fn test_cmd_config_with_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forecast.toml");
    std::fs::write(&path, "[engine]\nmin_records = 5\n").unwrap();

    assert_eq!(commands::load_config(Some(&path)).unwrap().min_records, 5);
    assert!(commands::cmd_config(Some(&path)).is_ok());
}
