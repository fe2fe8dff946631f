//! Budget windows
//!
//! A budget caps spending in one category (or overall) for a weekly, monthly
//! or yearly window starting at a given date. Status compares recorded
//! spending with the cap. Projected status compares a prediction's
//! one-month-ahead estimate with the cap converted to a monthly equivalent.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{ExpenseRecord, PredictionResult, Trend};

const WEEKS_PER_YEAR: f64 = 52.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Length of a budget window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Exclusive end of a window starting at `start`.
    ///
    /// Month and year steps clamp to the last day of a shorter month
    /// (Jan 31 + 1 month = Feb 29 in a leap year).
    pub fn end_date(&self, start: NaiveDate) -> NaiveDate {
        let end = match self {
            Self::Weekly => start.checked_add_days(Days::new(7)),
            Self::Monthly => start.checked_add_months(Months::new(1)),
            Self::Yearly => start.checked_add_months(Months::new(12)),
        };
        end.unwrap_or(NaiveDate::MAX)
    }

    /// Length of the period in months (a week is 12/52 of a month)
    pub fn months(&self) -> f64 {
        match self {
            Self::Weekly => MONTHS_PER_YEAR / WEEKS_PER_YEAR,
            Self::Monthly => 1.0,
            Self::Yearly => MONTHS_PER_YEAR,
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Category the budget applies to (all categories when unset)
    pub category: Option<String>,
    pub limit: f64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
}

/// Recorded spending against a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub start_date: NaiveDate,
    /// Exclusive
    pub end_date: NaiveDate,
    pub limit: f64,
    pub spent: f64,
    /// Negative when over budget
    pub remaining: f64,
    pub percent_used: f64,
    pub over_budget: bool,
}

/// Predicted spending against a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedBudget {
    pub period: BudgetPeriod,
    pub limit: f64,
    /// `limit` scaled to one month, the horizon of `predicted_amount`
    pub monthly_limit: f64,
    pub predicted_amount: f64,
    /// Against `monthly_limit`
    pub projected_remaining: f64,
    pub will_exceed: bool,
    pub trend: Trend,
    pub confidence: f64,
}

impl Budget {
    pub fn new(
        category: Option<String>,
        limit: f64,
        period: BudgetPeriod,
        start_date: NaiveDate,
    ) -> Result<Self> {
        if !limit.is_finite() || limit <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Budget limit must be a positive amount, got {}",
                limit
            )));
        }
        Ok(Self {
            category,
            limit,
            period,
            start_date,
        })
    }

    pub fn end_date(&self) -> NaiveDate {
        self.period.end_date(self.start_date)
    }

    fn applies_to(&self, record: &ExpenseRecord) -> bool {
        self.category
            .as_ref()
            .map_or(true, |category| &record.category == category)
            && record.date >= self.start_date
            && record.date < self.end_date()
    }

    /// Spending recorded inside the budget window
    pub fn status(&self, records: &[ExpenseRecord]) -> BudgetStatus {
        let spent: f64 = records
            .iter()
            .filter(|r| self.applies_to(r))
            .map(|r| r.amount)
            .sum();

        BudgetStatus {
            start_date: self.start_date,
            end_date: self.end_date(),
            limit: self.limit,
            spent,
            remaining: self.limit - spent,
            percent_used: spent / self.limit * 100.0,
            over_budget: spent > self.limit,
        }
    }

    /// The limit scaled to one month
    pub fn monthly_limit(&self) -> f64 {
        self.limit / self.period.months()
    }

    /// Compare a prediction's one-month-ahead estimate with the monthly
    /// equivalent of the limit, whatever the budget period
    pub fn projected_status(&self, prediction: &PredictionResult) -> ProjectedBudget {
        let monthly_limit = self.monthly_limit();
        ProjectedBudget {
            period: self.period,
            limit: self.limit,
            monthly_limit,
            predicted_amount: prediction.predicted_amount,
            projected_remaining: monthly_limit - prediction.predicted_amount,
            will_exceed: prediction.predicted_amount > monthly_limit,
            trend: prediction.trend,
            confidence: prediction.confidence,
        }
    }
}
