//! Budget command implementation

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use spendcast_core::summary::{month_start, week_start};
use spendcast_core::{
    Budget, BudgetPeriod, BudgetStatus, ForecastConfig, PredictionOptions, ProjectedBudget,
    TrendPredictor,
};

use super::{load_records, parse_algorithm, parse_date_arg, print_json};

/// Budget status plus the projection, when one is available
#[derive(Debug, Serialize)]
pub struct BudgetReport {
    pub budget: Budget,
    pub status: BudgetStatus,
    pub projected: Option<ProjectedBudget>,
}

/// Start of the current period containing `today`
pub fn default_start(period: BudgetPeriod, today: NaiveDate) -> NaiveDate {
    match period {
        BudgetPeriod::Weekly => week_start(today),
        BudgetPeriod::Monthly => month_start(today),
        BudgetPeriod::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn budget_report(
    config: &ForecastConfig,
    file: &Path,
    limit: f64,
    category: Option<&str>,
    period: &str,
    start: Option<&str>,
    algorithm: Option<&str>,
) -> Result<BudgetReport> {
    let period: BudgetPeriod = period
        .parse()
        .map_err(|e| anyhow::anyhow!("{}. Available: weekly, monthly, yearly", e))?;
    let start = match start {
        Some(value) => parse_date_arg(value, "--start")?,
        None => default_start(period, Utc::now().date_naive()),
    };
    let budget = Budget::new(category.map(str::to_string), limit, period, start)
        .context("Invalid budget")?;

    let records = load_records(file)?;
    let status = budget.status(&records);

    let mut options = PredictionOptions::new(
        config.default_prediction_months,
        parse_algorithm(algorithm, config)?,
    );
    options.category = budget.category.clone();
    let projected = TrendPredictor::new(config.clone())
        .predict(&records, &options)
        .map(|prediction| budget.projected_status(&prediction));

    Ok(BudgetReport {
        budget,
        status,
        projected,
    })
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_budget(
    config: &ForecastConfig,
    file: &Path,
    limit: f64,
    category: Option<&str>,
    period: &str,
    start: Option<&str>,
    algorithm: Option<&str>,
    json: bool,
) -> Result<()> {
    let report = budget_report(config, file, limit, category, period, start, algorithm)?;

    if json {
        return print_json(&report);
    }

    let status = &report.status;
    println!();
    println!(
        "💰 Budget: ${:.2} {} ({})",
        report.budget.limit,
        report.budget.period,
        report.budget.category.as_deref().unwrap_or("all categories")
    );
    println!(
        "   Window: {} to {}",
        status.start_date,
        status.end_date.pred_opt().unwrap_or(status.end_date)
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Spent:       ${:.2} ({:.1}% used)",
        status.spent, status.percent_used
    );
    if status.over_budget {
        println!("   ⚠️  Over budget by ${:.2}", -status.remaining);
    } else {
        println!("   Remaining:   ${:.2}", status.remaining);
    }

    println!();
    match &report.projected {
        Some(projected) => {
            println!(
                "   Next month:  ${:.2} predicted ({}, {:.0}% confidence)",
                projected.predicted_amount,
                projected.trend,
                projected.confidence * 100.0
            );
            if projected.period != BudgetPeriod::Monthly {
                println!(
                    "   Monthly equivalent of the {} limit: ${:.2}",
                    projected.period, projected.monthly_limit
                );
            }
            if projected.will_exceed {
                println!(
                    "   ⚠️  Projected to exceed the monthly limit by ${:.2}",
                    -projected.projected_remaining
                );
            } else {
                println!("   ✅ Projected to stay within the monthly limit");
            }
        }
        None => println!("   Not enough data to project spending."),
    }

    Ok(())
}
