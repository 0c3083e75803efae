//! Body metric persistence.
//!
//! Metric entries are stored as CSV rows, one per day-stamped measurement.
//! Loading tolerates malformed rows so one bad line never hides the rest of
//! the history.

use crate::types::BodyMetricEntry;
use crate::Result;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;

/// CSV row format for metric entries
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    day: String,
    weight_kg: Option<f64>,
    muscle_kg: Option<f64>,
    body_fat_pct: Option<f64>,
    waist_cm: Option<f64>,
    steps: Option<f64>,
    active_energy_kcal: Option<f64>,
}

impl TryFrom<CsvRow> for BodyMetricEntry {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let day = NaiveDate::parse_from_str(&row.day, "%Y-%m-%d")
            .map_err(|e| crate::Error::Other(format!("Invalid date '{}': {}", row.day, e)))?;

        Ok(BodyMetricEntry {
            day,
            weight_kg: row.weight_kg,
            muscle_kg: row.muscle_kg,
            body_fat_pct: row.body_fat_pct,
            waist_cm: row.waist_cm,
            steps: row.steps,
            active_energy_kcal: row.active_energy_kcal,
        })
    }
}

impl From<&BodyMetricEntry> for CsvRow {
    fn from(entry: &BodyMetricEntry) -> Self {
        CsvRow {
            day: entry.day.to_string(),
            weight_kg: entry.weight_kg,
            muscle_kg: entry.muscle_kg,
            body_fat_pct: entry.body_fat_pct,
            waist_cm: entry.waist_cm,
            steps: entry.steps,
            active_energy_kcal: entry.active_energy_kcal,
        }
    }
}

/// Append one metric entry to the CSV file, creating it with headers if needed
pub fn append_metric_entry(path: &Path, entry: &BodyMetricEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    writer.serialize(CsvRow::from(entry))?;
    writer.flush()?;

    tracing::debug!("Appended metric entry for {} to {:?}", entry.day, path);
    Ok(())
}

/// Load all metric entries from a CSV file
///
/// Returns an empty list if the file doesn't exist. Malformed rows are
/// logged and skipped.
pub fn load_metric_entries(path: &Path) -> Result<Vec<BodyMetricEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut entries = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match BodyMetricEntry::try_from(row) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Failed to parse metric row: {}", e);
                    // Continue processing other rows
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize metric row: {}", e);
            }
        }
    }

    // Sort by day, oldest first, so trend windows read naturally
    entries.sort_by_key(|e| e.day);

    tracing::debug!("Loaded {} metric entries from {:?}", entries.len(), path);
    Ok(entries)
}
