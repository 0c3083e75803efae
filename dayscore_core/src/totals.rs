//! Daily totals aggregation and target adherence evaluation.
//!
//! Entries for a day are summed per category, then each enabled category's
//! total is checked against its target rule. A missing total counts as 0.

use crate::types::{Category, CategoryAdherence, DailyAdherenceSummary, DailyLogEntry};
use std::collections::HashMap;

/// Sum portion values grouped by category.
///
/// Categories with no entries are absent from the map; callers treat
/// absence as 0.
pub fn totals_by_category(entries: &[DailyLogEntry]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for entry in entries {
        *totals.entry(entry.category_id.clone()).or_insert(0.0) += entry.portion.value();
    }
    totals
}

/// Evaluate per-category pass/fail adherence for a day.
///
/// Only enabled categories are evaluated. `all_targets_met` is the AND over
/// the evaluated categories; with zero enabled categories it is vacuously
/// true and the result list is empty.
pub fn evaluate_adherence(
    categories: &[&Category],
    totals: &HashMap<String, f64>,
) -> DailyAdherenceSummary {
    let mut results = Vec::new();
    let mut all_met = true;

    for category in categories.iter().filter(|c| c.enabled) {
        let total = totals.get(&category.id).copied().unwrap_or(0.0);
        let target_met = category.rule.is_satisfied(total);
        all_met &= target_met;
        results.push(CategoryAdherence {
            category_id: category.id.clone(),
            total,
            target_met,
        });
    }

    tracing::debug!(
        "Evaluated adherence for {} categories, all_targets_met={}",
        results.len(),
        all_met
    );

    DailyAdherenceSummary {
        categories: results,
        all_targets_met: all_met,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portion::Portion;
    use crate::types::{MealSlot, TargetRule};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn entry(category_id: &str, amount: f64) -> DailyLogEntry {
        DailyLogEntry {
            id: Uuid::new_v4(),
            category_id: category_id.into(),
            day: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            slot: MealSlot::Lunch,
            portion: Portion::new(amount),
            raw_amount: None,
            raw_unit: None,
            note: None,
            food_id: None,
            logged_at: Utc::now(),
        }
    }

    fn category(id: &str, enabled: bool, rule: TargetRule) -> Category {
        Category {
            id: id.into(),
            name: id.into(),
            enabled,
            sort_order: 0,
            unit: "servings".into(),
            rule,
        }
    }

    #[test]
    fn test_totals_group_by_category() {
        let entries = vec![
            entry("vegetables", 1.0),
            entry("vegetables", 1.5),
            entry("fruit", 2.0),
        ];
        let totals = totals_by_category(&entries);
        assert_eq!(totals["vegetables"], 2.5);
        assert_eq!(totals["fruit"], 2.0);
        assert!(!totals.contains_key("water"));
    }

    #[test]
    fn test_totals_empty_entries() {
        let totals = totals_by_category(&[]);
        assert!(totals.is_empty());
    }

    #[test]
    fn test_adherence_missing_total_counts_as_zero() {
        let veg = category("vegetables", true, TargetRule::AtLeast { target: 3.0 });
        let treats = category("treats", true, TargetRule::AtMost { target: 1.0 });
        let categories = vec![&veg, &treats];

        let summary = evaluate_adherence(&categories, &HashMap::new());

        assert_eq!(summary.categories.len(), 2);
        // vegetables: 0 < 3, fails; treats: 0 <= 1, passes
        let by_id: HashMap<_, _> = summary
            .categories
            .iter()
            .map(|c| (c.category_id.as_str(), c.target_met))
            .collect();
        assert!(!by_id["vegetables"]);
        assert!(by_id["treats"]);
        assert!(!summary.all_targets_met);
    }

    #[test]
    fn test_adherence_all_met() {
        let veg = category("vegetables", true, TargetRule::AtLeast { target: 3.0 });
        let categories = vec![&veg];
        let totals = HashMap::from([("vegetables".to_string(), 3.5)]);

        let summary = evaluate_adherence(&categories, &totals);
        assert!(summary.all_targets_met);
    }

    #[test]
    fn test_adherence_skips_disabled_categories() {
        let veg = category("vegetables", false, TargetRule::AtLeast { target: 3.0 });
        let categories = vec![&veg];

        let summary = evaluate_adherence(&categories, &HashMap::new());
        assert!(summary.categories.is_empty());
        assert!(summary.all_targets_met);
    }

    #[test]
    fn test_adherence_vacuous_truth_with_no_categories() {
        let summary = evaluate_adherence(&[], &HashMap::new());
        assert!(summary.categories.is_empty());
        assert!(summary.all_targets_met);
    }
}
