//! Core domain types for the Dayscore system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Categories and their daily target rules
//! - Score profiles and penalty curves
//! - Compensation rules between categories
//! - Daily log entries and body metric entries
//! - Adherence and score summaries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::portion::Portion;
use crate::{Error, Result};

// ============================================================================
// Target Rules
// ============================================================================

/// Tolerance used when checking an `Exact` target, absorbing quantization
/// noise from portion rounding (half the 0.1 portion increment).
pub const EXACT_TOLERANCE: f64 = 0.05;

/// The shape of a category's daily goal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetRule {
    /// Total should equal the target (within a fixed tolerance)
    Exact { target: f64 },
    /// Total should be at least the target
    AtLeast { target: f64 },
    /// Total should be at most the target
    AtMost { target: f64 },
    /// Total should fall within [min, max]
    Range { min: f64, max: f64 },
}

impl TargetRule {
    /// Whether a day's total satisfies this rule
    pub fn is_satisfied(&self, total: f64) -> bool {
        match self {
            TargetRule::Exact { target } => (total - target).abs() <= EXACT_TOLERANCE,
            TargetRule::AtLeast { target } => total >= *target,
            TargetRule::AtMost { target } => total <= *target,
            TargetRule::Range { min, max } => *min <= total && total <= *max,
        }
    }

    /// Lower bound implied by the rule (None = unbounded below)
    pub fn lower_bound(&self) -> Option<f64> {
        match self {
            TargetRule::Exact { target } => Some(*target),
            TargetRule::AtLeast { target } => Some(*target),
            TargetRule::AtMost { .. } => None,
            TargetRule::Range { min, .. } => Some(*min),
        }
    }

    /// Upper bound implied by the rule (None = unbounded above)
    pub fn upper_bound(&self) -> Option<f64> {
        match self {
            TargetRule::Exact { target } => Some(*target),
            TargetRule::AtLeast { .. } => None,
            TargetRule::AtMost { target } => Some(*target),
            TargetRule::Range { max, .. } => Some(*max),
        }
    }

    /// Human-readable rendering of the goal, e.g. "at least 5 servings"
    pub fn display_text(&self, unit: &str) -> String {
        match self {
            TargetRule::Exact { target } => format!("exactly {} {}", trim_num(*target), unit),
            TargetRule::AtLeast { target } => format!("at least {} {}", trim_num(*target), unit),
            TargetRule::AtMost { target } => format!("at most {} {}", trim_num(*target), unit),
            TargetRule::Range { min, max } => {
                format!("{}–{} {}", trim_num(*min), trim_num(*max), unit)
            }
        }
    }

    /// Validate rule bounds at construction time
    pub fn validate(&self) -> Result<()> {
        let check_finite = |v: f64, what: &str| -> Result<()> {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Validation(format!(
                    "target rule {} must be finite and non-negative, got {}",
                    what, v
                )));
            }
            Ok(())
        };

        match self {
            TargetRule::Exact { target }
            | TargetRule::AtLeast { target }
            | TargetRule::AtMost { target } => check_finite(*target, "target"),
            TargetRule::Range { min, max } => {
                check_finite(*min, "min")?;
                check_finite(*max, "max")?;
                if min > max {
                    return Err(Error::Validation(format!(
                        "target rule range min {} > max {}",
                        min, max
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Format a bound without a trailing ".0" for whole numbers
fn trim_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

// ============================================================================
// Score Profiles
// ============================================================================

/// Penalty curve shape applied to normalized deviation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyCurve {
    Linear,
    Quadratic,
}

impl PenaltyCurve {
    /// Apply the curve to a normalized deviation (deviation / soft limit)
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            PenaltyCurve::Linear => x,
            PenaltyCurve::Quadratic => x * x,
        }
    }
}

/// Per-category scoring parameters
///
/// The soft limits set the deviation magnitude at which one "penalty unit"
/// (`*_penalty_per_unit` points) is incurred per soft-limit's worth of
/// deviation; smaller soft limits are stricter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoreProfile {
    /// Relative influence on the overall score; 0 excludes the category
    pub weight: f64,
    pub under_penalty_per_unit: f64,
    pub over_penalty_per_unit: f64,
    pub under_soft_limit: f64,
    pub over_soft_limit: f64,
    pub curve: PenaltyCurve,
    /// When true, exceeding the rule's upper bound never reduces the score
    pub cap_over_at_target: bool,
}

impl ScoreProfile {
    /// Rule-derived default profile for categories without a stored profile.
    ///
    /// Pure and deterministic: moderate penalties, linear curve.
    /// `AtLeast` rules get `cap_over_at_target = true` since overshooting a
    /// minimum is never a fault.
    pub fn default_for_rule(rule: &TargetRule) -> Self {
        ScoreProfile {
            weight: 1.0,
            under_penalty_per_unit: 10.0,
            over_penalty_per_unit: 10.0,
            under_soft_limit: 1.0,
            over_soft_limit: 1.0,
            curve: PenaltyCurve::Linear,
            cap_over_at_target: matches!(rule, TargetRule::AtLeast { .. }),
        }
    }

    /// Validate profile parameters at construction time
    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(Error::Validation(format!(
                "profile weight must be non-negative, got {}",
                self.weight
            )));
        }
        if !self.under_penalty_per_unit.is_finite() || self.under_penalty_per_unit < 0.0 {
            return Err(Error::Validation(format!(
                "under_penalty_per_unit must be non-negative, got {}",
                self.under_penalty_per_unit
            )));
        }
        if !self.over_penalty_per_unit.is_finite() || self.over_penalty_per_unit < 0.0 {
            return Err(Error::Validation(format!(
                "over_penalty_per_unit must be non-negative, got {}",
                self.over_penalty_per_unit
            )));
        }
        if !self.under_soft_limit.is_finite() || self.under_soft_limit <= 0.0 {
            return Err(Error::Validation(format!(
                "under_soft_limit must be positive, got {}",
                self.under_soft_limit
            )));
        }
        if !self.over_soft_limit.is_finite() || self.over_soft_limit <= 0.0 {
            return Err(Error::Validation(format!(
                "over_soft_limit must be positive, got {}",
                self.over_soft_limit
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Compensation Rules
// ============================================================================

/// A directed relation letting surplus in one category offset penalty in
/// another, bounded by a ratio and a daily ceiling.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompensationRule {
    pub from_category: String,
    pub to_category: String,
    /// Units of `from` surplus required to offset one penalty-equivalent unit
    pub ratio: f64,
    /// Ceiling on total penalty-equivalent units transferred per day
    pub max_offset: f64,
}

impl CompensationRule {
    /// Validate rule parameters at construction time
    pub fn validate(&self) -> Result<()> {
        if self.from_category == self.to_category {
            return Err(Error::Validation(format!(
                "compensation rule must relate two distinct categories, got '{}' twice",
                self.from_category
            )));
        }
        if !self.ratio.is_finite() || self.ratio <= 0.0 {
            return Err(Error::Validation(format!(
                "compensation ratio must be positive, got {}",
                self.ratio
            )));
        }
        if !self.max_offset.is_finite() || self.max_offset < 0.0 {
            return Err(Error::Validation(format!(
                "compensation max_offset must be non-negative, got {}",
                self.max_offset
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Categories
// ============================================================================

/// A trackable behavior/nutrient bucket with a daily target
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub sort_order: u32,
    /// Unit name used in displays (e.g. "servings", "minutes", "glasses")
    pub unit: String,
    pub rule: TargetRule,
}

// ============================================================================
// Log Entries
// ============================================================================

/// Meal slot a log entry belongs to
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// One logged amount for a category on a given day
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyLogEntry {
    pub id: Uuid,
    pub category_id: String,
    pub day: NaiveDate,
    pub slot: MealSlot,
    pub portion: Portion,
    pub raw_amount: Option<f64>,
    pub raw_unit: Option<String>,
    pub note: Option<String>,
    pub food_id: Option<String>,
    pub logged_at: DateTime<Utc>,
}

// ============================================================================
// Body Metrics
// ============================================================================

/// Date-stamped body measurements; every field is optional
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BodyMetricEntry {
    pub day: NaiveDate,
    pub weight_kg: Option<f64>,
    pub muscle_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub waist_cm: Option<f64>,
    pub steps: Option<f64>,
    pub active_energy_kcal: Option<f64>,
}

/// Trailing 7-day means, mirroring [`BodyMetricEntry`] field for field
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyMetricAverages {
    pub weight_kg: Option<f64>,
    pub muscle_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub waist_cm: Option<f64>,
    pub steps: Option<f64>,
    pub active_energy_kcal: Option<f64>,
}

// ============================================================================
// Summaries
// ============================================================================

/// Per-category pass/fail verdict
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryAdherence {
    pub category_id: String,
    pub total: f64,
    pub target_met: bool,
}

/// Pass/fail view of a day, independent of the numeric score
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyAdherenceSummary {
    pub categories: Vec<CategoryAdherence>,
    /// AND over enabled categories; vacuously true when none are enabled
    pub all_targets_met: bool,
}

/// Per-category scoring detail backing the UI breakdown
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryScore {
    pub category_id: String,
    pub total: f64,
    pub target_met: bool,
    /// Score before compensation, clamped to [0, 100]
    pub raw_score: f64,
    /// Points restored by compensation rules targeting this category
    pub compensation_applied: f64,
    /// Raw score plus compensation, never above 100
    pub final_score: f64,
    pub weight: f64,
}

/// The day's blended 0–100 score
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyScoreSummary {
    /// None when no enabled category carries positive weight
    pub overall_score: Option<f64>,
    pub categories: Vec<CategoryScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_rule_tolerance() {
        let rule = TargetRule::Exact { target: 3.0 };
        assert!(rule.is_satisfied(3.0));
        assert!(rule.is_satisfied(3.04));
        assert!(rule.is_satisfied(2.96));
        assert!(!rule.is_satisfied(3.1));
        assert!(!rule.is_satisfied(2.9));
    }

    #[test]
    fn test_at_least_rule() {
        let rule = TargetRule::AtLeast { target: 5.0 };
        assert!(rule.is_satisfied(5.0));
        assert!(rule.is_satisfied(7.5));
        assert!(!rule.is_satisfied(4.9));
    }

    #[test]
    fn test_at_most_rule() {
        let rule = TargetRule::AtMost { target: 2.0 };
        assert!(rule.is_satisfied(0.0));
        assert!(rule.is_satisfied(2.0));
        assert!(!rule.is_satisfied(2.1));
    }

    #[test]
    fn test_range_rule() {
        let rule = TargetRule::Range { min: 3.0, max: 5.0 };
        assert!(rule.is_satisfied(3.0));
        assert!(rule.is_satisfied(4.0));
        assert!(rule.is_satisfied(5.0));
        assert!(!rule.is_satisfied(2.9));
        assert!(!rule.is_satisfied(5.1));
    }

    #[test]
    fn test_bounds_derivation() {
        assert_eq!(TargetRule::Exact { target: 3.0 }.lower_bound(), Some(3.0));
        assert_eq!(TargetRule::Exact { target: 3.0 }.upper_bound(), Some(3.0));
        assert_eq!(TargetRule::AtLeast { target: 5.0 }.upper_bound(), None);
        assert_eq!(TargetRule::AtMost { target: 2.0 }.lower_bound(), None);
        let range = TargetRule::Range { min: 1.0, max: 4.0 };
        assert_eq!(range.lower_bound(), Some(1.0));
        assert_eq!(range.upper_bound(), Some(4.0));
    }

    #[test]
    fn test_display_text_mentions_unit_and_bounds() {
        let text = TargetRule::AtLeast { target: 5.0 }.display_text("servings");
        assert!(text.contains("servings"));
        assert!(text.contains('5'));

        let text = TargetRule::Range { min: 3.0, max: 5.0 }.display_text("glasses");
        assert!(text.contains("glasses"));
        assert!(text.contains('3'));
        assert!(text.contains('5'));
    }

    #[test]
    fn test_range_validation_rejects_inverted_bounds() {
        let rule = TargetRule::Range { min: 5.0, max: 3.0 };
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_negative_target_rejected() {
        let rule = TargetRule::AtLeast { target: -1.0 };
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_default_profile_is_deterministic() {
        let rule = TargetRule::AtLeast { target: 3.0 };
        let a = ScoreProfile::default_for_rule(&rule);
        let b = ScoreProfile::default_for_rule(&rule);
        assert_eq!(a, b);
        assert!(a.cap_over_at_target);

        let capped = ScoreProfile::default_for_rule(&TargetRule::AtMost { target: 2.0 });
        assert!(!capped.cap_over_at_target);
    }

    #[test]
    fn test_profile_validation() {
        let rule = TargetRule::AtLeast { target: 3.0 };
        let mut profile = ScoreProfile::default_for_rule(&rule);
        assert!(profile.validate().is_ok());

        profile.weight = -1.0;
        assert!(profile.validate().is_err());

        profile.weight = 1.0;
        profile.under_soft_limit = 0.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_compensation_rule_validation() {
        let rule = CompensationRule {
            from_category: "sports".into(),
            to_category: "treats".into(),
            ratio: 60.0,
            max_offset: 15.0,
        };
        assert!(rule.validate().is_ok());

        let self_rule = CompensationRule {
            from_category: "sports".into(),
            to_category: "sports".into(),
            ratio: 1.0,
            max_offset: 1.0,
        };
        assert!(self_rule.validate().is_err());

        let zero_ratio = CompensationRule {
            ratio: 0.0,
            ..rule.clone()
        };
        assert!(zero_ratio.validate().is_err());
    }

    #[test]
    fn test_penalty_curves() {
        assert_eq!(PenaltyCurve::Linear.apply(2.0), 2.0);
        assert_eq!(PenaltyCurve::Quadratic.apply(2.0), 4.0);
        assert_eq!(PenaltyCurve::Quadratic.apply(0.5), 0.25);
    }
}
