//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendcast - See where your spending is heading
#[derive(Parser)]
#[command(name = "spendcast")]
#[command(about = "Forecast future spending from expense records", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Forecast config file
    ///
    /// Defaults to ~/.local/share/spendcast/config/forecast.toml when it
    /// exists, otherwise the built-in configuration.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict future spending
    Predict {
        /// Expense records (.csv or .json)
        #[arg(short, long)]
        file: PathBuf,

        /// Only use records in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Months to project (defaults to the configured value)
        #[arg(short, long)]
        months: Option<u32>,

        /// Algorithm: linear, moving_average, combined
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show spending totals and category breakdown
    Summary {
        /// Expense records (.csv or .json)
        #[arg(short, long)]
        file: PathBuf,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check spending against a budget, now and projected
    Budget {
        /// Expense records (.csv or .json)
        #[arg(short, long)]
        file: PathBuf,

        /// Budget limit for the period
        #[arg(short, long)]
        limit: f64,

        /// Category the budget applies to (all categories if omitted)
        #[arg(short, long)]
        category: Option<String>,

        /// Budget period: weekly, monthly, yearly
        #[arg(short, long, default_value = "monthly")]
        period: String,

        /// Start of the budget window (YYYY-MM-DD, defaults to the start of
        /// the current period)
        #[arg(long)]
        start: Option<String>,

        /// Algorithm used for the projection
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List due, upcoming and overdue recurring expenses
    Recurring {
        /// Recurring expenses (.json)
        #[arg(short, long)]
        file: PathBuf,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// Days ahead to list as upcoming (defaults to the configured value)
        #[arg(short, long)]
        days: Option<u32>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective forecast configuration
    Config,
}
