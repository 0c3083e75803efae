//! Daily score evaluation.
//!
//! This module implements the scoring pipeline:
//! - Per-category raw score from deficit/excess against the target rule,
//!   scaled by the profile's penalty rates, soft limits, and curve
//! - Compensation pass transferring surplus between categories
//! - Weighted blend into a single 0–100 daily score

use crate::types::{
    Category, CategoryScore, CompensationRule, DailyScoreSummary, ScoreProfile,
};
use std::collections::HashMap;

/// Look up a category's stored profile, falling back to the rule-derived
/// default. Pure; keeps the evaluator free of storage concerns.
pub fn profile_for(category: &Category, stored: &HashMap<String, ScoreProfile>) -> ScoreProfile {
    stored
        .get(&category.id)
        .cloned()
        .unwrap_or_else(|| ScoreProfile::default_for_rule(&category.rule))
}

/// Raw score for one category, before any compensation.
///
/// Deficit is measured against the rule's lower bound, excess against its
/// upper bound; an unbounded side contributes no penalty, and
/// `cap_over_at_target` forces the excess penalty to zero. Each penalty is
/// `penalty_per_unit * curve(deviation / soft_limit) * soft_limit`, so the
/// soft limit sets the scale at which one penalty unit is incurred.
pub fn raw_score(category: &Category, total: f64, profile: &ScoreProfile) -> f64 {
    let deficit = category
        .rule
        .lower_bound()
        .map(|lower| (lower - total).max(0.0))
        .unwrap_or(0.0);

    let excess = if profile.cap_over_at_target {
        0.0
    } else {
        category
            .rule
            .upper_bound()
            .map(|upper| (total - upper).max(0.0))
            .unwrap_or(0.0)
    };

    let penalty_under = profile.under_penalty_per_unit
        * profile.curve.apply(deficit / profile.under_soft_limit)
        * profile.under_soft_limit;
    let penalty_over = profile.over_penalty_per_unit
        * profile.curve.apply(excess / profile.over_soft_limit)
        * profile.over_soft_limit;

    (100.0 - penalty_under - penalty_over).clamp(0.0, 100.0)
}

/// Evaluate the day's blended score over the enabled categories.
///
/// Stored profiles are optional per category; missing ones fall back to
/// [`ScoreProfile::default_for_rule`]. Compensation rules are applied in
/// ascending `(from_category, to_category)` order so repeated evaluation of
/// the same inputs is bit-for-bit reproducible. `overall_score` is `None`
/// when no enabled category carries positive weight.
pub fn evaluate_daily_score(
    categories: &[&Category],
    totals: &HashMap<String, f64>,
    stored_profiles: &HashMap<String, ScoreProfile>,
    compensation_rules: &[CompensationRule],
) -> DailyScoreSummary {
    let enabled: Vec<&Category> = categories.iter().copied().filter(|c| c.enabled).collect();

    // Raw pass: score each category independently of compensation
    let mut scores: Vec<CategoryScore> = Vec::with_capacity(enabled.len());
    let mut index_by_id: HashMap<&str, usize> = HashMap::new();

    for category in &enabled {
        let total = totals.get(&category.id).copied().unwrap_or(0.0);
        let profile = profile_for(category, stored_profiles);
        let raw = raw_score(category, total, &profile);

        index_by_id.insert(category.id.as_str(), scores.len());
        scores.push(CategoryScore {
            category_id: category.id.clone(),
            total,
            target_met: category.rule.is_satisfied(total),
            raw_score: raw,
            compensation_applied: 0.0,
            final_score: raw,
            weight: profile.weight,
        });
    }

    apply_compensation(&enabled, totals, compensation_rules, &index_by_id, &mut scores);

    // Weighted blend over positive-weight categories
    let weight_sum: f64 = scores.iter().map(|s| s.weight).filter(|w| *w > 0.0).sum();
    let overall_score = if weight_sum > 0.0 {
        let weighted: f64 = scores
            .iter()
            .filter(|s| s.weight > 0.0)
            .map(|s| s.weight * s.final_score)
            .sum();
        Some(weighted / weight_sum)
    } else {
        tracing::debug!("No scorable categories (zero total weight)");
        None
    };

    DailyScoreSummary {
        overall_score,
        categories: scores,
    }
}

/// Compensation pass: surplus in a donor category offsets penalty in a
/// recipient, bounded by the rule's ratio and daily ceiling.
///
/// Each donor keeps one surplus pool for the whole evaluation; units
/// consumed by one rule are unavailable to later rules from the same donor.
/// An offset never lifts a score above 100, so a category can never end up
/// better than it would have with zero deviation.
fn apply_compensation(
    enabled: &[&Category],
    totals: &HashMap<String, f64>,
    rules: &[CompensationRule],
    index_by_id: &HashMap<&str, usize>,
    scores: &mut [CategoryScore],
) {
    if rules.is_empty() {
        return;
    }

    // Fixed processing order for reproducibility
    let mut ordered: Vec<&CompensationRule> = rules.iter().collect();
    ordered.sort_by(|a, b| {
        (a.from_category.as_str(), a.to_category.as_str())
            .cmp(&(b.from_category.as_str(), b.to_category.as_str()))
    });

    // Surplus pools, in donor units: total beyond the donor's own lower bound.
    // A donor with no lower bound has nothing to spare.
    let mut surplus_pools: HashMap<&str, f64> = HashMap::new();
    for category in enabled {
        if let Some(lower) = category.rule.lower_bound() {
            let total = totals.get(&category.id).copied().unwrap_or(0.0);
            surplus_pools.insert(category.id.as_str(), (total - lower).max(0.0));
        }
    }

    for rule in ordered {
        let Some(&to_idx) = index_by_id.get(rule.to_category.as_str()) else {
            tracing::debug!(
                "Skipping compensation rule {} -> {}: recipient not enabled",
                rule.from_category,
                rule.to_category
            );
            continue;
        };
        let Some(pool) = surplus_pools.get_mut(rule.from_category.as_str()) else {
            tracing::debug!(
                "Skipping compensation rule {} -> {}: donor has no surplus pool",
                rule.from_category,
                rule.to_category
            );
            continue;
        };

        let recipient = &mut scores[to_idx];
        let remaining_penalty = 100.0 - recipient.final_score;
        let offset = remaining_penalty
            .min(*pool / rule.ratio)
            .min(rule.max_offset)
            .max(0.0);

        if offset <= 0.0 {
            continue;
        }

        recipient.compensation_applied += offset;
        recipient.final_score += offset;
        *pool -= offset * rule.ratio;

        tracing::debug!(
            "Compensation {} -> {}: +{:.2} points ({:.2} donor units remain)",
            rule.from_category,
            rule.to_category,
            offset,
            pool
        );
    }
}
