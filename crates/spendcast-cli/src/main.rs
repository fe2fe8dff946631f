//! Spendcast CLI - Expense trend predictor
//!
//! Usage:
//!   spendcast predict --file expenses.csv     Forecast next month's spending
//!   spendcast summary --file expenses.csv     Day/week/month totals
//!   spendcast budget --file F --limit 500     Budget status and projection
//!   spendcast recurring --file bills.json     Due and upcoming recurring expenses
//!   spendcast config                          Show effective configuration

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Predict {
            file,
            category,
            months,
            algorithm,
            json,
        } => {
            let config = commands::load_config(config_path)?;
            commands::cmd_predict(
                &config,
                &file,
                category.as_deref(),
                months,
                algorithm.as_deref(),
                json,
            )
        }
        Commands::Summary { file, as_of, json } => {
            commands::cmd_summary(&file, as_of.as_deref(), json)
        }
        Commands::Budget {
            file,
            limit,
            category,
            period,
            start,
            algorithm,
            json,
        } => {
            let config = commands::load_config(config_path)?;
            commands::cmd_budget(
                &config,
                &file,
                limit,
                category.as_deref(),
                &period,
                start.as_deref(),
                algorithm.as_deref(),
                json,
            )
        }
        Commands::Recurring {
            file,
            as_of,
            days,
            json,
        } => {
            let config = commands::load_config(config_path)?;
            commands::cmd_recurring(&config, &file, as_of.as_deref(), days, json)
        }
        Commands::Config => commands::cmd_config(config_path),
    }
}
