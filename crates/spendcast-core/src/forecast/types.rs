//! Intermediate types passed between the models and the orchestrator

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};
use crate::models::{ExpenseRecord, ForecastPoint, Trend};

/// Whole days from `base` to `date`, computed on the proleptic Gregorian
/// day count so no timezone or locale is involved
pub fn days_between(base: NaiveDate, date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce() - base.num_days_from_ce())
}

/// Date of the `step`-th projected point after `last` (step starts at 1)
pub fn projection_date(last: NaiveDate, step_days: u32, step: usize) -> ForecastResult<NaiveDate> {
    u64::try_from(step)
        .ok()
        .and_then(|s| s.checked_mul(u64::from(step_days)))
        .and_then(|days| last.checked_add_days(Days::new(days)))
        .ok_or_else(|| {
            ForecastError::DegenerateInput(format!(
                "projection step {} from {} is out of the calendar range",
                step, last
            ))
        })
}

/// A record placed on the time axis of its (sorted) set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    /// Days since the first record of the set
    pub day_offset: f64,
    pub amount: f64,
}

impl DataPoint {
    /// Convert chronologically sorted records; the first point sits at offset 0
    pub fn from_sorted(records: &[ExpenseRecord]) -> Vec<DataPoint> {
        let Some(first) = records.first() else {
            return vec![];
        };
        records
            .iter()
            .map(|r| DataPoint {
                day_offset: days_between(first.date, r.date),
                amount: r.amount,
            })
            .collect()
    }
}

/// Ordinary least squares line through (day offset, amount)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionFit {
    /// Amount per day
    pub slope: f64,
    pub intercept: f64,
    /// R², clamped to [0, 1]
    pub confidence: f64,
}

impl RegressionFit {
    pub fn value_at(&self, day_offset: f64) -> f64 {
        self.slope * day_offset + self.intercept
    }
}

/// One value of a moving-average series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub amount: f64,
}

/// What a strategy hands back to the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct ModelForecast {
    /// Projected points, chronological, all flagged as predicted
    pub projected: Vec<ForecastPoint>,
    pub trend: Trend,
    pub confidence: f64,
}
