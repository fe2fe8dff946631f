//! Domain models for Spendcast

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single expense as supplied by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    /// Amount spent (non-negative)
    pub amount: f64,
    pub category: String,
}

impl ExpenseRecord {
    pub fn new(date: NaiveDate, amount: f64, category: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            category: category.into(),
        }
    }
}

/// A point on a charted series, either observed or projected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Always non-negative
    pub amount: f64,
    pub is_predicted: bool,
}

impl ForecastPoint {
    /// Historical point taken verbatim from a record
    pub fn historical(record: &ExpenseRecord) -> Self {
        Self {
            date: record.date,
            amount: record.amount,
            is_predicted: false,
        }
    }

    /// Projected point; negative model output is clamped to zero
    pub fn predicted(date: NaiveDate, amount: f64) -> Self {
        Self {
            date,
            amount: amount.max(0.0),
            is_predicted: true,
        }
    }
}

/// Direction of spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }

    /// Classify a signed change against a symmetric threshold
    pub fn classify(change: f64, threshold: f64) -> Self {
        if change > threshold {
            Self::Increasing
        } else if change < -threshold {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

impl std::str::FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "increasing" => Ok(Self::Increasing),
            "decreasing" => Ok(Self::Decreasing),
            "stable" => Ok(Self::Stable),
            _ => Err(format!("Unknown trend: {}", s)),
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forecasting method requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Ordinary least squares over day offsets
    Linear,
    /// Trailing-window mean extrapolation
    MovingAverage,
    /// Blend of every available method
    #[default]
    Combined,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::MovingAverage => "moving_average",
            Self::Combined => "combined",
        }
    }

    /// Get all algorithms
    pub fn all() -> &'static [Algorithm] {
        &[Self::Linear, Self::MovingAverage, Self::Combined]
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" | "regression" => Ok(Self::Linear),
            "moving_average" | "moving-average" | "ma" => Ok(Self::MovingAverage),
            "combined" => Ok(Self::Combined),
            _ => Err(format!("Unknown algorithm: {}", s)),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller options for a prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOptions {
    /// Only consider records in this category (all categories when unset)
    #[serde(default)]
    pub category: Option<String>,
    /// Months to project; each month is projected as weekly points
    pub prediction_months: u32,
    #[serde(default)]
    pub algorithm: Algorithm,
}

impl Default for PredictionOptions {
    fn default() -> Self {
        Self {
            category: None,
            prediction_months: 1,
            algorithm: Algorithm::Combined,
        }
    }
}

impl PredictionOptions {
    pub fn new(prediction_months: u32, algorithm: Algorithm) -> Self {
        Self {
            category: None,
            prediction_months,
            algorithm,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Output of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// One-month-ahead estimate
    pub predicted_amount: f64,
    pub trend: Trend,
    /// In [0, 1]
    pub confidence: f64,
    /// Historical points followed by predicted points, chronological
    pub data_points: Vec<ForecastPoint>,
}

impl PredictionResult {
    pub fn historical_points(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.data_points.iter().filter(|p| !p.is_predicted)
    }

    pub fn predicted_points(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.data_points.iter().filter(|p| p.is_predicted)
    }

    /// True when every amount and the confidence are finite and in range
    pub fn is_well_formed(&self) -> bool {
        self.predicted_amount.is_finite()
            && self.predicted_amount >= 0.0
            && (0.0..=1.0).contains(&self.confidence)
            && self
                .data_points
                .iter()
                .all(|p| p.amount.is_finite() && p.amount >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_trend_classify() {
        assert_eq!(Trend::classify(10.5, 10.0), Trend::Increasing);
        assert_eq!(Trend::classify(-10.5, 10.0), Trend::Decreasing);
        assert_eq!(Trend::classify(10.0, 10.0), Trend::Stable);
        assert_eq!(Trend::classify(-10.0, 10.0), Trend::Stable);
        assert_eq!(Trend::classify(0.0, 50.0), Trend::Stable);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!(Algorithm::from_str("linear").unwrap(), Algorithm::Linear);
        assert_eq!(
            Algorithm::from_str("moving-average").unwrap(),
            Algorithm::MovingAverage
        );
        assert_eq!(
            Algorithm::from_str("MOVING_AVERAGE").unwrap(),
            Algorithm::MovingAverage
        );
        assert_eq!(Algorithm::from_str("combined").unwrap(), Algorithm::Combined);
        assert!(Algorithm::from_str("arima").is_err());
    }

    #[test]
    fn test_algorithm_serde_roundtrip_names() {
        let json = serde_json::to_string(&Algorithm::MovingAverage).unwrap();
        assert_eq!(json, "\"moving_average\"");
        assert_eq!(Algorithm::default(), Algorithm::Combined);
    }

    #[test]
    fn test_predicted_point_clamps_negative() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let point = ForecastPoint::predicted(date, -42.0);
        assert_eq!(point.amount, 0.0);
        assert!(point.is_predicted);
    }

    #[test]
    fn test_options_deserialize_defaults() {
        let options: PredictionOptions =
            serde_json::from_str(r#"{"prediction_months": 2}"#).unwrap();
        assert_eq!(options.prediction_months, 2);
        assert_eq!(options.algorithm, Algorithm::Combined);
        assert!(options.category.is_none());
    }

    #[test]
    fn test_is_well_formed() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut result = PredictionResult {
            predicted_amount: 10.0,
            trend: Trend::Stable,
            confidence: 0.5,
            data_points: vec![ForecastPoint::predicted(date, 10.0)],
        };
        assert!(result.is_well_formed());

        result.confidence = f64::NAN;
        assert!(!result.is_well_formed());

        result.confidence = 0.5;
        result.data_points[0].amount = f64::INFINITY;
        assert!(!result.is_well_formed());
    }
}
