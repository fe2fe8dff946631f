//! Moving average model
//!
//! Smooths records with a trailing window mean, then extends the recent
//! slope of that series in weekly steps.

use crate::config::ForecastConfig;
use crate::error::{ForecastError, ForecastResult};
use crate::models::{ExpenseRecord, ForecastPoint, Trend};

use super::engine::ForecastStrategy;
use super::types::{projection_date, ModelForecast, SeriesPoint};

/// Number of most recent series points treated as "recent"
const RECENT_POINTS: usize = 4;

/// Trailing-window trend model
#[derive(Debug, Clone)]
pub struct MovingAverageModel {
    window_size: usize,
    min_series_points: usize,
    trend_threshold: f64,
    confidence_floor: f64,
    step_days: u32,
}

impl MovingAverageModel {
    pub fn new() -> Self {
        Self::from_config(&ForecastConfig::default())
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            window_size: config.window_size,
            min_series_points: config.moving_average_min_points,
            trend_threshold: config.moving_average_threshold,
            confidence_floor: config.confidence_floor,
            step_days: config.step_days,
        }
    }

    /// Trailing mean at every record from the `window_size`-th one on.
    /// Empty when there are fewer records than the window.
    pub fn compute_series(&self, records: &[ExpenseRecord]) -> Vec<SeriesPoint> {
        if self.window_size == 0 || records.len() < self.window_size {
            return vec![];
        }

        let window = self.window_size as f64;
        records
            .windows(self.window_size)
            .filter_map(|w| {
                let last = w.last()?;
                Some(SeriesPoint {
                    date: last.date,
                    amount: w.iter().map(|r| r.amount).sum::<f64>() / window,
                })
            })
            .collect()
    }

    /// Extend the series by `periods` weekly points.
    ///
    /// The per-step trend is half the change across the last three series
    /// points. Returns an empty list when the series is too short.
    pub fn extrapolate(
        &self,
        series: &[SeriesPoint],
        periods: usize,
    ) -> ForecastResult<Vec<ForecastPoint>> {
        if series.len() < self.min_series_points.max(3) {
            return Ok(vec![]);
        }

        let last = series[series.len() - 1];
        let third_last = series[series.len() - 3];
        let trend = (last.amount - third_last.amount) / 2.0;

        (1..=periods)
            .map(|step| {
                let date = projection_date(last.date, self.step_days, step)?;
                Ok(ForecastPoint::predicted(
                    date,
                    last.amount + trend * step as f64,
                ))
            })
            .collect()
    }

    /// Heuristic stability score, not a statistical confidence interval.
    ///
    /// Mean squared deviation of the whole series around the mean of the
    /// recent points, relative to that mean squared, inverted and floored.
    /// Volatile series bottom out at the floor rather than approaching zero.
    pub fn stability_confidence(&self, series: &[SeriesPoint]) -> f64 {
        let recent = recent_mean(series);
        if series.is_empty() || !recent.is_finite() || recent == 0.0 {
            return self.confidence_floor;
        }

        let variance = series
            .iter()
            .map(|p| (p.amount - recent).powi(2))
            .sum::<f64>()
            / series.len() as f64;

        let score = 1.0 - variance / (recent * recent);
        if score.is_finite() {
            score.clamp(self.confidence_floor, 1.0)
        } else {
            self.confidence_floor
        }
    }

    /// Compare the recent mean with the mean of the points just before it.
    ///
    /// The preceding mean divides by the points actually present, so a short
    /// series with one to three earlier points is not biased toward
    /// `Increasing`. No earlier points at all means `Stable`.
    pub fn classify(&self, series: &[SeriesPoint]) -> Trend {
        let recent_start = series.len().saturating_sub(RECENT_POINTS);
        let preceding = &series[recent_start.saturating_sub(RECENT_POINTS)..recent_start];
        if preceding.is_empty() {
            return Trend::Stable;
        }

        Trend::classify(
            recent_mean(series) - mean(preceding),
            self.trend_threshold,
        )
    }
}

impl Default for MovingAverageModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastStrategy for MovingAverageModel {
    fn id(&self) -> &'static str {
        "moving_average"
    }

    fn name(&self) -> &'static str {
        "Moving Average"
    }

    fn forecast(&self, sorted: &[ExpenseRecord], periods: usize) -> ForecastResult<ModelForecast> {
        let series = self.compute_series(sorted);
        let projected = self.extrapolate(&series, periods)?;
        if projected.is_empty() {
            return Err(ForecastError::insufficient(
                self.min_series_points.max(3),
                series.len(),
            ));
        }

        let confidence = self.stability_confidence(&series);
        tracing::debug!(
            window = self.window_size,
            series_len = series.len(),
            confidence,
            "Moving average series"
        );

        Ok(ModelForecast {
            projected,
            trend: self.classify(&series),
            confidence,
        })
    }
}

fn mean(points: &[SeriesPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.amount).sum::<f64>() / points.len() as f64
}

fn recent_mean(series: &[SeriesPoint]) -> f64 {
    mean(&series[series.len().saturating_sub(RECENT_POINTS)..])
}
