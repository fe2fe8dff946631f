//! Prediction orchestrator - filters, validates and dispatches to strategies

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::ForecastConfig;
use crate::error::{ForecastError, ForecastResult};
use crate::models::{Algorithm, ExpenseRecord, ForecastPoint, PredictionOptions, PredictionResult};

use super::types::ModelForecast;
use super::{MovingAverageModel, RegressionModel};

/// A forecasting method the orchestrator can dispatch to
pub trait ForecastStrategy: Send + Sync {
    /// Identifier matched against [`Algorithm::as_str`]
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Project `periods` points from chronologically sorted records
    fn forecast(&self, sorted: &[ExpenseRecord], periods: usize) -> ForecastResult<ModelForecast>;
}

/// Stateless trend predictor over in-memory expense records
pub struct TrendPredictor {
    config: ForecastConfig,
    strategies: Vec<Box<dyn ForecastStrategy>>,
}

impl Default for TrendPredictor {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

impl TrendPredictor {
    /// Create a predictor with the built-in strategies, linear first
    pub fn new(config: ForecastConfig) -> Self {
        let mut predictor = Self {
            strategies: vec![],
            config,
        };

        predictor.register(Box::new(RegressionModel::from_config(&predictor.config)));
        predictor.register(Box::new(MovingAverageModel::from_config(&predictor.config)));

        predictor
    }

    /// Register a strategy. Registration order is the fallback order of the
    /// combined algorithm.
    pub fn register(&mut self, strategy: Box<dyn ForecastStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Get the ids of registered strategies
    pub fn strategy_ids(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.id()).collect()
    }

    /// Predict future spending.
    ///
    /// Returns `None` when there is not enough data or any stage fails; the
    /// caller never sees a partial result.
    pub fn predict(
        &self,
        records: &[ExpenseRecord],
        options: &PredictionOptions,
    ) -> Option<PredictionResult> {
        match self.try_predict(records, options) {
            Ok(result) => result,
            Err(e) if e.is_insufficient_data() => {
                tracing::debug!(error = %e, "Prediction unavailable");
                None
            }
            Err(e) => {
                tracing::warn!(
                    algorithm = options.algorithm.as_str(),
                    error = %e,
                    "Prediction failed"
                );
                None
            }
        }
    }

    /// Like [`TrendPredictor::predict`] but keeps the failure reason.
    ///
    /// `Ok(None)` means the filtered record set is below the minimum sample
    /// size, which is "cannot predict" rather than "failed to predict".
    pub fn try_predict(
        &self,
        records: &[ExpenseRecord],
        options: &PredictionOptions,
    ) -> ForecastResult<Option<PredictionResult>> {
        let periods = self.periods(options)?;

        // 1. Filter
        let mut sorted: Vec<ExpenseRecord> = records
            .iter()
            .filter(|r| match &options.category {
                Some(category) => &r.category == category,
                None => true,
            })
            .cloned()
            .collect();

        // 2. Sort
        sorted.sort_by_key(|r| r.date);

        // 3. Validate
        if sorted.len() < self.config.min_records {
            tracing::debug!(
                found = sorted.len(),
                needed = self.config.min_records,
                category = options.category.as_deref().unwrap_or("*"),
                "Not enough records to predict"
            );
            return Ok(None);
        }
        if let Some(bad) = sorted
            .iter()
            .find(|r| !r.amount.is_finite() || r.amount < 0.0)
        {
            return Err(ForecastError::DegenerateInput(format!(
                "record on {} has invalid amount {}",
                bad.date, bad.amount
            )));
        }

        // 4. Dispatch
        let result = match options.algorithm {
            Algorithm::Combined => self.combined(&sorted, periods)?,
            algorithm => {
                let strategy = self
                    .strategies
                    .iter()
                    .find(|s| s.id() == algorithm.as_str())
                    .ok_or_else(|| {
                        ForecastError::InvalidOptions(format!(
                            "no strategy registered for {}",
                            algorithm
                        ))
                    })?;
                self.run(strategy.as_ref(), &sorted, periods)?
            }
        };

        // 5. Report
        if !result.is_well_formed() {
            return Err(ForecastError::DegenerateInput(
                "prediction contains out-of-range values".into(),
            ));
        }

        tracing::debug!(
            algorithm = options.algorithm.as_str(),
            records = sorted.len(),
            predicted = result.predicted_amount,
            trend = result.trend.as_str(),
            confidence = result.confidence,
            "Prediction complete"
        );
        Ok(Some(result))
    }

    fn periods(&self, options: &PredictionOptions) -> ForecastResult<usize> {
        if options.prediction_months == 0 {
            return Err(ForecastError::InvalidOptions(
                "prediction_months must be at least 1".into(),
            ));
        }
        if options.prediction_months > self.config.max_prediction_months {
            return Err(ForecastError::InvalidOptions(format!(
                "prediction_months {} exceeds the maximum of {}",
                options.prediction_months, self.config.max_prediction_months
            )));
        }
        options
            .prediction_months
            .checked_mul(self.config.weeks_per_month)
            .and_then(|p| usize::try_from(p).ok())
            .ok_or_else(|| {
                ForecastError::InvalidOptions(format!(
                    "prediction_months {} is too large",
                    options.prediction_months
                ))
            })
    }

    /// Run one strategy and assemble its full result
    fn run(
        &self,
        strategy: &dyn ForecastStrategy,
        sorted: &[ExpenseRecord],
        periods: usize,
    ) -> ForecastResult<PredictionResult> {
        let forecast = strategy.forecast(sorted, periods)?;

        // The point one month out
        let month_index = (self.config.weeks_per_month as usize).saturating_sub(1);
        let predicted_amount = forecast
            .projected
            .get(month_index)
            .map(|p| p.amount)
            .unwrap_or(0.0);

        let mut data_points: Vec<ForecastPoint> =
            sorted.iter().map(ForecastPoint::historical).collect();
        data_points.extend(forecast.projected);

        Ok(PredictionResult {
            predicted_amount,
            trend: forecast.trend,
            confidence: forecast.confidence,
            data_points,
        })
    }

    /// Blend every strategy when all succeed; otherwise return the first
    /// one that does, unmodified
    fn combined(
        &self,
        sorted: &[ExpenseRecord],
        periods: usize,
    ) -> ForecastResult<PredictionResult> {
        let mut results = Vec::with_capacity(self.strategies.len());
        let mut last_error = None;

        for strategy in &self.strategies {
            match self.run(strategy.as_ref(), sorted, periods) {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        error = %e,
                        "Strategy skipped in combined prediction"
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            None if !results.is_empty() => Ok(blend(results)),
            _ => results.into_iter().next().ok_or_else(|| {
                last_error.unwrap_or_else(|| {
                    ForecastError::InvalidOptions("no strategies registered".into())
                })
            }),
        }
    }
}

/// Average amounts and confidences; the trend comes from the most confident
/// result, with later results winning ties. Predicted points are aligned by
/// date against the first result.
fn blend(results: Vec<PredictionResult>) -> PredictionResult {
    let count = results.len() as f64;
    let predicted_amount = results.iter().map(|r| r.predicted_amount).sum::<f64>() / count;
    let confidence = results.iter().map(|r| r.confidence).sum::<f64>() / count;

    let mut trend_source = &results[0];
    for result in &results[1..] {
        if result.confidence >= trend_source.confidence {
            trend_source = result;
        }
    }
    let trend = trend_source.trend;

    let others: Vec<HashMap<NaiveDate, f64>> = results[1..]
        .iter()
        .map(|r| r.predicted_points().map(|p| (p.date, p.amount)).collect())
        .collect();

    let data_points = results[0]
        .data_points
        .iter()
        .map(|point| {
            if !point.is_predicted {
                return point.clone();
            }
            let (sum, n) = others
                .iter()
                .filter_map(|by_date| by_date.get(&point.date))
                .fold((point.amount, 1.0), |(sum, n), amount| (sum + amount, n + 1.0));
            ForecastPoint::predicted(point.date, sum / n)
        })
        .collect();

    PredictionResult {
        predicted_amount,
        trend,
        confidence,
        data_points,
    }
}
