//! Shared utilities for commands
//!
//! This module contains:
//! - `load_config` - Resolve the forecast configuration
//! - `load_records` - Load and deduplicate an expense record file
//! - `parse_algorithm` / `parse_date_arg` - Argument parsing helpers
//! - `print_json` - JSON output

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use spendcast_core::{load, Algorithm, ExpenseRecord, ForecastConfig};

/// Load config from an explicit path, the data-dir override, or defaults
pub fn load_config(path: Option<&Path>) -> Result<ForecastConfig> {
    ForecastConfig::load(path).context("Failed to load forecast config")
}

/// Load expense records from a CSV or JSON file
pub fn load_records(file: &Path) -> Result<Vec<ExpenseRecord>> {
    load::load_file(file).with_context(|| format!("Failed to load records from {}", file.display()))
}

/// Parse an algorithm name, falling back to the configured default
pub fn parse_algorithm(value: Option<&str>, config: &ForecastConfig) -> Result<Algorithm> {
    match value {
        Some(name) => name.parse::<Algorithm>().map_err(|e| {
            anyhow::anyhow!("{}. Available: linear, moving_average, combined", e)
        }),
        None => Ok(config.default_algorithm),
    }
}

/// Parse a YYYY-MM-DD (or other supported format) date argument
pub fn parse_date_arg(value: &str, flag: &str) -> Result<NaiveDate> {
    load::parse_date(value).with_context(|| format!("Invalid {} date (use YYYY-MM-DD)", flag))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
