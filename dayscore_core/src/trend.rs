//! Trailing 7-day body metric averages.
//!
//! Each metric field is averaged independently over the inclusive window
//! `[reference_date - 6 days, reference_date]`; days missing one field still
//! contribute to the others. No interpolation, no recency weighting.

use crate::types::{BodyMetricAverages, BodyMetricEntry};
use chrono::{Duration, NaiveDate};

/// Mean of one metric field over the in-window entries that carry it.
///
/// Returns None when no entry in the window has the field.
fn field_average(
    entries: &[&BodyMetricEntry],
    field: impl Fn(&BodyMetricEntry) -> Option<f64>,
) -> Option<f64> {
    let values: Vec<f64> = entries.iter().filter_map(|e| field(e)).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Compute trailing 7-day averages for every metric field.
pub fn seven_day_averages(
    entries: &[BodyMetricEntry],
    reference_date: NaiveDate,
) -> BodyMetricAverages {
    let window_start = reference_date - Duration::days(6);
    let in_window: Vec<&BodyMetricEntry> = entries
        .iter()
        .filter(|e| e.day >= window_start && e.day <= reference_date)
        .collect();

    tracing::debug!(
        "{} of {} metric entries fall in the 7-day window ending {}",
        in_window.len(),
        entries.len(),
        reference_date
    );

    BodyMetricAverages {
        weight_kg: field_average(&in_window, |e| e.weight_kg),
        muscle_kg: field_average(&in_window, |e| e.muscle_kg),
        body_fat_pct: field_average(&in_window, |e| e.body_fat_pct),
        waist_cm: field_average(&in_window, |e| e.waist_cm),
        steps: field_average(&in_window, |e| e.steps),
        active_energy_kcal: field_average(&in_window, |e| e.active_energy_kcal),
    }
}
