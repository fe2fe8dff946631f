//! Forecast engine configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/spendcast/config/forecast.toml)
//!    or an explicit path
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Any key missing from an override keeps its built-in value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Algorithm;

/// Embedded default config (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/forecast.toml");

/// Tunable constants of the prediction engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastConfig {
    /// Records required (after filtering) before predicting at all
    pub min_records: usize,
    /// Points required for a regression fit
    pub regression_min_points: usize,
    /// Trailing window of the moving average
    pub window_size: usize,
    /// Moving-average points required to extrapolate
    pub moving_average_min_points: usize,
    /// Projected points per requested month
    pub weeks_per_month: u32,
    /// Days between projected points
    pub step_days: u32,
    /// Largest prediction horizon accepted, in months
    pub max_prediction_months: u32,
    /// Slope (amount/day) beyond which the regression trend is not stable
    pub slope_threshold: f64,
    /// Mean shift beyond which the moving-average trend is not stable
    pub moving_average_threshold: f64,
    /// Floor of the moving-average stability score
    pub confidence_floor: f64,
    pub default_algorithm: Algorithm,
    pub default_prediction_months: u32,
    /// Days ahead a recurring expense counts as upcoming
    pub upcoming_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_records: 10,
            regression_min_points: 3,
            window_size: 7,
            moving_average_min_points: 3,
            weeks_per_month: 4,
            step_days: 7,
            max_prediction_months: 120,
            slope_threshold: 10.0,
            moving_average_threshold: 50.0,
            confidence_floor: 0.3,
            default_algorithm: Algorithm::Combined,
            default_prediction_months: 1,
            upcoming_days: 3,
        }
    }
}

impl ForecastConfig {
    /// Load config, preferring `override_path`, then the data-dir override,
    /// then the embedded defaults
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let (content, _) = read_config(override_path)?;
        parse_config(&content)
    }

    /// Like [`ForecastConfig::load`], also reporting which file was used
    /// (`None` for the embedded defaults)
    pub fn load_with_source(override_path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let (content, source) = read_config(override_path)?;
        Ok((parse_config(&content)?, source))
    }

    /// Reject values that would make the engine misbehave
    pub fn validate(&self) -> Result<()> {
        if self.min_records == 0 {
            return Err(Error::Config("min_records must be at least 1".into()));
        }
        if self.regression_min_points < 2 {
            return Err(Error::Config(
                "regression_min_points must be at least 2".into(),
            ));
        }
        if self.window_size == 0 {
            return Err(Error::Config("window_size must be at least 1".into()));
        }
        if self.moving_average_min_points < 3 {
            return Err(Error::Config(
                "moving_average_min_points must be at least 3".into(),
            ));
        }
        if self.weeks_per_month == 0 || self.step_days == 0 {
            return Err(Error::Config(
                "weeks_per_month and step_days must be at least 1".into(),
            ));
        }
        if self.max_prediction_months == 0 {
            return Err(Error::Config(
                "max_prediction_months must be at least 1".into(),
            ));
        }
        if !(self.slope_threshold.is_finite() && self.slope_threshold >= 0.0) {
            return Err(Error::Config(format!(
                "slope_threshold must be a non-negative number, got {}",
                self.slope_threshold
            )));
        }
        if !(self.moving_average_threshold.is_finite() && self.moving_average_threshold >= 0.0) {
            return Err(Error::Config(format!(
                "moving_average_threshold must be a non-negative number, got {}",
                self.moving_average_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(Error::Config(format!(
                "moving_average_floor must be within [0, 1], got {}",
                self.confidence_floor
            )));
        }
        if self.default_prediction_months == 0
            || self.default_prediction_months > self.max_prediction_months
        {
            return Err(Error::Config(format!(
                "default prediction_months must be within [1, {}], got {}",
                self.max_prediction_months, self.default_prediction_months
            )));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendcast").join("config").join("forecast.toml"))
}

fn read_config(override_path: Option<&Path>) -> Result<(String, Option<PathBuf>)> {
    let candidate = match override_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        }
        None => default_config_path().filter(|p| p.exists()),
    };

    match candidate {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            tracing::debug!(path = %path.display(), "Loaded forecast config override");
            Ok((content, Some(path)))
        }
        None => Ok((DEFAULT_CONFIG.to_string(), None)),
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    engine: Option<RawEngine>,
    trend: Option<RawTrend>,
    confidence: Option<RawConfidence>,
    defaults: Option<RawDefaults>,
    recurring: Option<RawRecurring>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEngine {
    min_records: Option<usize>,
    regression_min_points: Option<usize>,
    window_size: Option<usize>,
    moving_average_min_points: Option<usize>,
    weeks_per_month: Option<u32>,
    step_days: Option<u32>,
    max_prediction_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTrend {
    slope_threshold: Option<f64>,
    moving_average_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfidence {
    moving_average_floor: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefaults {
    algorithm: Option<String>,
    prediction_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecurring {
    upcoming_days: Option<u32>,
}

/// Parse and validate configuration from TOML content
pub fn parse_config(content: &str) -> Result<ForecastConfig> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut config = ForecastConfig::default();

    if let Some(engine) = raw.engine {
        config.min_records = engine.min_records.unwrap_or(config.min_records);
        config.regression_min_points = engine
            .regression_min_points
            .unwrap_or(config.regression_min_points);
        config.window_size = engine.window_size.unwrap_or(config.window_size);
        config.moving_average_min_points = engine
            .moving_average_min_points
            .unwrap_or(config.moving_average_min_points);
        config.weeks_per_month = engine.weeks_per_month.unwrap_or(config.weeks_per_month);
        config.step_days = engine.step_days.unwrap_or(config.step_days);
        config.max_prediction_months = engine
            .max_prediction_months
            .unwrap_or(config.max_prediction_months);
    }

    if let Some(trend) = raw.trend {
        config.slope_threshold = trend.slope_threshold.unwrap_or(config.slope_threshold);
        config.moving_average_threshold = trend
            .moving_average_threshold
            .unwrap_or(config.moving_average_threshold);
    }

    if let Some(confidence) = raw.confidence {
        config.confidence_floor = confidence
            .moving_average_floor
            .unwrap_or(config.confidence_floor);
    }

    if let Some(defaults) = raw.defaults {
        if let Some(algorithm) = defaults.algorithm {
            config.default_algorithm = algorithm.parse().map_err(Error::Config)?;
        }
        config.default_prediction_months = defaults
            .prediction_months
            .unwrap_or(config.default_prediction_months);
    }

    if let Some(recurring) = raw.recurring {
        config.upcoming_days = recurring.upcoming_days.unwrap_or(config.upcoming_days);
    }

    config.validate()?;
    Ok(config)
}
