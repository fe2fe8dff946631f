//! Config command implementation

use std::path::Path;

use anyhow::{Context, Result};
use spendcast_core::config::default_config_path;
use spendcast_core::{ForecastConfig, TrendPredictor};

pub fn cmd_config(path: Option<&Path>) -> Result<()> {
    let (config, source) =
        ForecastConfig::load_with_source(path).context("Failed to load forecast config")?;

    println!();
    println!("⚙️  Forecast Configuration");
    match source {
        Some(source) => println!("   Source: {}", source.display()),
        None => {
            println!("   Source: built-in defaults");
            if let Some(override_path) = default_config_path() {
                println!("   Override: {} (not present)", override_path.display());
            }
        }
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Minimum records:          {}", config.min_records);
    println!("   Regression min points:    {}", config.regression_min_points);
    println!("   Moving average window:    {}", config.window_size);
    println!("   Moving average min points: {}", config.moving_average_min_points);
    println!("   Weeks per month:          {}", config.weeks_per_month);
    println!("   Step (days):              {}", config.step_days);
    println!("   Max months:               {}", config.max_prediction_months);
    println!("   Slope threshold:          {}", config.slope_threshold);
    println!("   Moving average threshold: {}", config.moving_average_threshold);
    println!("   Confidence floor:         {}", config.confidence_floor);
    println!("   Default algorithm:        {}", config.default_algorithm);
    println!("   Default months:           {}", config.default_prediction_months);
    println!("   Upcoming window (days):   {}", config.upcoming_days);

    let predictor = TrendPredictor::new(config);
    println!("   Strategies:               {}", predictor.strategy_ids().join(", "));

    Ok(())
}
