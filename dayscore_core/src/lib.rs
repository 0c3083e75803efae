#![forbid(unsafe_code)]

//! Core domain model and business logic for the Dayscore system.
//!
//! This crate provides:
//! - Domain types (categories, target rules, score profiles, entries)
//! - Portion quantization
//! - Daily totals, adherence, and score evaluation
//! - Body metric trend averaging
//! - Persistence (journal, CSV rollup, metrics, config)

pub mod types;
pub mod error;
pub mod portion;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod journal;
pub mod rollup;
pub mod metrics;
pub mod totals;
pub mod score;
pub mod trend;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use portion::{round_to_increment, Portion};
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use config::Config;
pub use journal::{entries_for_day, EntrySink, JsonlJournal};
pub use metrics::{append_metric_entry, load_metric_entries};
pub use totals::{evaluate_adherence, totals_by_category};
pub use score::{evaluate_daily_score, profile_for};
pub use trend::seven_day_averages;
