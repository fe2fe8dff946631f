//! Error types for Spendcast

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures local to the forecasting engine.
///
/// None of these reach the caller of the public entry point; they are either
/// consumed by the combined path's fallback or turned into "no prediction".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Not enough data: need at least {needed} points, found {found}")]
    InsufficientData { needed: usize, found: usize },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl ForecastError {
    pub fn insufficient(needed: usize, found: usize) -> Self {
        Self::InsufficientData { needed, found }
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

pub type ForecastResult<T> = std::result::Result<T, ForecastError>;
