//! Linear regression model
//!
//! Fits an ordinary least squares line to (day offset, amount) pairs and
//! projects it forward in weekly steps past the last record.

use crate::config::ForecastConfig;
use crate::error::{ForecastError, ForecastResult};
use crate::models::{ExpenseRecord, ForecastPoint, Trend};

use super::engine::ForecastStrategy;
use super::types::{days_between, projection_date, DataPoint, ModelForecast, RegressionFit};

/// OLS trend model over day offsets
#[derive(Debug, Clone)]
pub struct RegressionModel {
    min_points: usize,
    slope_threshold: f64,
    step_days: u32,
}

impl RegressionModel {
    pub fn new() -> Self {
        Self::from_config(&ForecastConfig::default())
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            min_points: config.regression_min_points,
            slope_threshold: config.slope_threshold,
            step_days: config.step_days,
        }
    }

    /// Fit a line to chronologically sorted records
    pub fn fit(&self, records: &[ExpenseRecord]) -> ForecastResult<RegressionFit> {
        self.fit_points(&DataPoint::from_sorted(records))
    }

    pub fn fit_points(&self, points: &[DataPoint]) -> ForecastResult<RegressionFit> {
        if points.len() < self.min_points {
            return Err(ForecastError::insufficient(self.min_points, points.len()));
        }

        let n = points.len() as f64;
        let (sum_x, sum_y, sum_xy, sum_xx) =
            points
                .iter()
                .fold((0.0, 0.0, 0.0, 0.0), |(sx, sy, sxy, sxx), p| {
                    (
                        sx + p.day_offset,
                        sy + p.amount,
                        sxy + p.day_offset * p.amount,
                        sxx + p.day_offset * p.day_offset,
                    )
                });

        let denominator = n * sum_xx - sum_x * sum_x;
        if denominator.abs() <= f64::EPSILON * (n * sum_xx).abs() {
            return Err(ForecastError::DegenerateInput(
                "all records fall on the same day".into(),
            ));
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        let mean_y = sum_y / n;
        let ss_total: f64 = points.iter().map(|p| (p.amount - mean_y).powi(2)).sum();
        let ss_residual: f64 = points
            .iter()
            .map(|p| (p.amount - (slope * p.day_offset + intercept)).powi(2))
            .sum();

        // Flat amounts are explained exactly by a flat line
        let confidence = if ss_total == 0.0 {
            1.0
        } else {
            (1.0 - ss_residual / ss_total).clamp(0.0, 1.0)
        };

        if !(slope.is_finite() && intercept.is_finite() && confidence.is_finite()) {
            return Err(ForecastError::DegenerateInput(
                "regression produced a non-finite value".into(),
            ));
        }

        Ok(RegressionFit {
            slope,
            intercept,
            confidence,
        })
    }

    /// Project `periods` weekly points past the last record, evaluating the
    /// line at each point's offset from the first record
    pub fn project(
        &self,
        records: &[ExpenseRecord],
        fit: &RegressionFit,
        periods: usize,
    ) -> ForecastResult<Vec<ForecastPoint>> {
        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            return Err(ForecastError::insufficient(self.min_points, 0));
        };

        (1..=periods)
            .map(|step| {
                let date = projection_date(last.date, self.step_days, step)?;
                let amount = fit.value_at(days_between(first.date, date));
                Ok(ForecastPoint::predicted(date, amount))
            })
            .collect()
    }

    pub fn classify(&self, fit: &RegressionFit) -> Trend {
        Trend::classify(fit.slope, self.slope_threshold)
    }
}

impl Default for RegressionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastStrategy for RegressionModel {
    fn id(&self) -> &'static str {
        "linear"
    }

    fn name(&self) -> &'static str {
        "Linear Regression"
    }

    fn forecast(&self, sorted: &[ExpenseRecord], periods: usize) -> ForecastResult<ModelForecast> {
        let fit = self.fit(sorted)?;
        tracing::debug!(
            slope = fit.slope,
            intercept = fit.intercept,
            r_squared = fit.confidence,
            "Regression fit"
        );

        Ok(ModelForecast {
            projected: self.project(sorted, &fit, periods)?,
            trend: self.classify(&fit),
            confidence: fit.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{daily_records, date, records_from_amounts};

    #[test]
    fn test_fit_constant_amounts() {
        let records = daily_records(date(2024, 1, 1), &[100.0; 10]);
        let fit = RegressionModel::new().fit(&records).unwrap();

        assert!(fit.slope.abs() < 1e-9);
        assert!((fit.intercept - 100.0).abs() < 1e-9);
        assert_eq!(fit.confidence, 1.0);
    }

    #[test]
    fn test_fit_perfect_line() {
        let amounts: Vec<f64> = (0..10).map(|i| 50.0 + 20.0 * i as f64).collect();
        let records = daily_records(date(2024, 1, 1), &amounts);
        let fit = RegressionModel::new().fit(&records).unwrap();

        assert!((fit.slope - 20.0).abs() < 1e-9);
        assert!((fit.intercept - 50.0).abs() < 1e-9);
        assert!((fit.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_uses_calendar_offsets() {
        // Day 0, 2 and 6: gaps are respected, not record indices
        let records = records_from_amounts(&[
            (date(2024, 1, 1), 0.0),
            (date(2024, 1, 3), 20.0),
            (date(2024, 1, 7), 60.0),
        ]);
        let fit = RegressionModel::new().fit(&records).unwrap();
        assert!((fit.slope - 10.0).abs() < 1e-9);
        assert!(fit.intercept.abs() < 1e-9);
    }

    #[test]
    fn test_confidence_stays_in_range_for_noise() {
        let amounts = [5.0, 900.0, 3.0, 750.0, 1.0, 820.0, 0.0, 999.0, 2.0, 640.0];
        let records = daily_records(date(2024, 1, 1), &amounts);
        let fit = RegressionModel::new().fit(&records).unwrap();
        assert!((0.0..=1.0).contains(&fit.confidence));
    }

    #[test]
    fn test_fit_requires_three_points() {
        let records = daily_records(date(2024, 1, 1), &[10.0, 20.0]);
        let err = RegressionModel::new().fit(&records).unwrap_err();
        assert_eq!(err, ForecastError::insufficient(3, 2));
    }

    #[test]
    fn test_fit_same_day_is_degenerate() {
        let day = date(2024, 1, 1);
        let records = records_from_amounts(&[(day, 10.0), (day, 20.0), (day, 30.0)]);
        let err = RegressionModel::new().fit(&records).unwrap_err();
        assert!(matches!(err, ForecastError::DegenerateInput(_)));
    }

    #[test]
    fn test_project_weekly_from_last_record() {
        let amounts: Vec<f64> = (0..10).map(|i| 10.0 * i as f64).collect();
        let records = daily_records(date(2024, 1, 1), &amounts);
        let model = RegressionModel::new();
        let fit = model.fit(&records).unwrap();
        let projected = model.project(&records, &fit, 4).unwrap();

        assert_eq!(projected.len(), 4);
        assert_eq!(projected[0].date, date(2024, 1, 17));
        assert_eq!(projected[3].date, date(2024, 2, 7));
        // Offset of Feb 7 from Jan 1 is 37 days
        assert!((projected[3].amount - 370.0).abs() < 1e-6);
        assert!(projected.iter().all(|p| p.is_predicted));
    }

    #[test]
    fn test_project_clamps_negative_values() {
        let amounts: Vec<f64> = (0..10).map(|i| 900.0 - 100.0 * i as f64).collect();
        let records = daily_records(date(2024, 1, 1), &amounts);
        let model = RegressionModel::new();
        let fit = model.fit(&records).unwrap();
        let projected = model.project(&records, &fit, 8).unwrap();

        assert!(projected.iter().all(|p| p.amount >= 0.0));
        assert_eq!(projected[7].amount, 0.0);
        assert_eq!(model.classify(&fit), Trend::Decreasing);
    }

    #[test]
    fn test_forecast_strategy_output() {
        let amounts: Vec<f64> = (0..10).map(|i| 100.0 + 20.0 * i as f64).collect();
        let records = daily_records(date(2024, 1, 1), &amounts);
        let forecast = RegressionModel::new().forecast(&records, 4).unwrap();

        assert_eq!(forecast.trend, Trend::Increasing);
        assert_eq!(forecast.projected.len(), 4);
        assert!((forecast.confidence - 1.0).abs() < 1e-9);
    }
}
