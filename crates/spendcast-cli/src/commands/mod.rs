//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `common` - Shared utilities (config, record loading, argument parsing)
//! - `predict` - Spending forecast
//! - `summary` - Period totals and category breakdown
//! - `budget` - Budget status and projection
//! - `recurring` - Due and upcoming recurring expenses
//! - `config` - Effective configuration display

pub mod budget;
pub mod common;
pub mod config;
pub mod predict;
pub mod recurring;
pub mod summary;

// Re-export command functions for main.rs
pub use budget::*;
pub use common::*;
pub use config::*;
pub use predict::*;
pub use recurring::*;
pub use summary::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
