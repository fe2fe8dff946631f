//! Trend prediction engine
//!
//! Projects future spending from historical expense records with two
//! independent methods, optionally blended:
//!
//! - **Linear regression** - least squares line over day offsets
//! - **Moving average** - trailing 7-record mean, extended by its recent slope
//! - **Combined** - both of the above averaged, falling back to whichever
//!   one succeeds
//!
//! The engine is a pure computation: it sorts a filtered copy of the input,
//! keeps no state between calls and reports "no prediction" as `None`
//! instead of an error.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendcast_core::forecast::generate_prediction;
//! use spendcast_core::models::{Algorithm, PredictionOptions};
//!
//! let options = PredictionOptions::new(3, Algorithm::Combined).with_category("Dining");
//! if let Some(prediction) = generate_prediction(&records, &options) {
//!     println!("next month: {:.2} ({})", prediction.predicted_amount, prediction.trend);
//! }
//! ```

pub mod engine;
pub mod moving_average;
pub mod regression;
pub mod types;

pub use crate::error::{ForecastError, ForecastResult};
pub use engine::{ForecastStrategy, TrendPredictor};
pub use moving_average::MovingAverageModel;
pub use regression::RegressionModel;
pub use types::{days_between, DataPoint, ModelForecast, RegressionFit, SeriesPoint};

use crate::models::{ExpenseRecord, PredictionOptions, PredictionResult};

/// Predict with the built-in configuration.
///
/// Returns `None` when fewer than 10 records match, when the options are
/// invalid, or when every requested method fails.
pub fn generate_prediction(
    records: &[ExpenseRecord],
    options: &PredictionOptions,
) -> Option<PredictionResult> {
    TrendPredictor::default().predict(records, options)
}
