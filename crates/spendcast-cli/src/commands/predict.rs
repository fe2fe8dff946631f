//! Prediction command implementation

use std::path::Path;

use anyhow::Result;
use spendcast_core::{
    ExpenseRecord, ForecastConfig, PredictionOptions, PredictionResult, Trend, TrendPredictor,
};

use super::{load_records, parse_algorithm, print_json};

/// Build prediction options from CLI arguments and config defaults
pub fn prediction_options(
    config: &ForecastConfig,
    category: Option<&str>,
    months: Option<u32>,
    algorithm: Option<&str>,
) -> Result<PredictionOptions> {
    let months = months.unwrap_or(config.default_prediction_months);
    if months == 0 || months > config.max_prediction_months {
        anyhow::bail!(
            "--months must be between 1 and {}",
            config.max_prediction_months
        );
    }

    let mut options = PredictionOptions::new(months, parse_algorithm(algorithm, config)?);
    if let Some(category) = category {
        options = options.with_category(category);
    }
    Ok(options)
}

/// Run a prediction over the records in `file`
pub fn predict_file(
    config: &ForecastConfig,
    file: &Path,
    options: &PredictionOptions,
) -> Result<(Vec<ExpenseRecord>, Option<PredictionResult>)> {
    let records = load_records(file)?;
    let predictor = TrendPredictor::new(config.clone());
    let prediction = predictor.predict(&records, options);
    Ok((records, prediction))
}

pub fn cmd_predict(
    config: &ForecastConfig,
    file: &Path,
    category: Option<&str>,
    months: Option<u32>,
    algorithm: Option<&str>,
    json: bool,
) -> Result<()> {
    let options = prediction_options(config, category, months, algorithm)?;
    let (records, prediction) = predict_file(config, file, &options)?;

    if json {
        return print_json(&prediction);
    }

    println!();
    println!("📈 Spending Forecast ({})", options.algorithm);
    if let Some(ref category) = options.category {
        println!("   Category: {}", category);
    }
    println!("   ─────────────────────────────────────────────────────────────");

    let Some(prediction) = prediction else {
        let matching = records
            .iter()
            .filter(|r| options.category.as_ref().map_or(true, |c| &r.category == c))
            .count();
        println!("   Not enough data to predict.");
        println!(
            "   Found {} matching records; at least {} are needed.",
            matching, config.min_records
        );
        return Ok(());
    };

    print_prediction(&prediction);
    Ok(())
}

fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Increasing => "↑",
        Trend::Decreasing => "↓",
        Trend::Stable => "→",
    }
}

fn print_prediction(prediction: &PredictionResult) {
    let historical: Vec<_> = prediction.historical_points().collect();
    if let (Some(first), Some(last)) = (historical.first(), historical.last()) {
        println!(
            "   Based on {} records ({} to {})",
            historical.len(),
            first.date,
            last.date
        );
    }

    println!("   Next month:  ${:.2}", prediction.predicted_amount);
    println!(
        "   Trend:       {} {}",
        prediction.trend,
        trend_arrow(prediction.trend)
    );
    println!("   Confidence:  {:.0}%", prediction.confidence * 100.0);
    println!();
    println!("   {:12} │ {:>10}", "Week of", "Predicted");
    println!("   ─────────────┼───────────");
    for point in prediction.predicted_points() {
        println!("   {:12} │ {:>10.2}", point.date.to_string(), point.amount);
    }
}
