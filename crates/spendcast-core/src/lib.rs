//! Spendcast Core Library
//!
//! Shared functionality for the Spendcast expense trend predictor:
//! - Trend prediction engine (linear regression, moving average, combined)
//! - Expense record loading from CSV and JSON exports
//! - Spending summaries (day/week/month totals, category breakdown)
//! - Budget windows and projected budget status
//! - Recurring expenses (due dates, upcoming items, record generation)
//! - Engine configuration with embedded defaults

pub mod budget;
pub mod config;
pub mod error;
pub mod forecast;
pub mod load;
pub mod models;
pub mod recurring;
pub mod summary;

/// Test utilities including record builders
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use budget::{Budget, BudgetPeriod, BudgetStatus, ProjectedBudget};
pub use config::ForecastConfig;
pub use error::{Error, ForecastError, Result};
pub use forecast::{generate_prediction, ForecastStrategy, TrendPredictor};
pub use models::{
    Algorithm, ExpenseRecord, ForecastPoint, PredictionOptions, PredictionResult, Trend,
};
pub use recurring::{Frequency, RecurringExpense};
pub use summary::{CategoryTotal, SpendingSummary};
