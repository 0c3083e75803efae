//! Portion quantization.
//!
//! Logged amounts are snapped to a fixed 0.1 increment and clamped to the
//! valid portion range before they reach totals or scoring. Rounding is
//! half-away-from-zero and idempotent.

use serde::{Deserialize, Serialize};

/// Smallest portion step; all stored portions are multiples of this.
pub const MINIMUM_INCREMENT: f64 = 0.1;

/// Valid portion range
pub const MIN_PORTION: f64 = 0.0;
pub const MAX_PORTION: f64 = 6.0;

/// A quantized, range-clamped portion amount
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct Portion(f64);

impl Portion {
    /// Clamp a raw amount into the valid range and round to the increment
    pub fn new(raw: f64) -> Self {
        let clamped = raw.clamp(MIN_PORTION, MAX_PORTION);
        Portion(round_to_increment(clamped))
    }

    /// The quantized amount
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Round to the nearest multiple of [`MINIMUM_INCREMENT`],
/// half-away-from-zero.
///
/// Idempotent: rounding an already-rounded value returns it unchanged.
pub fn round_to_increment(value: f64) -> f64 {
    // f64::round is half-away-from-zero. The final step divides rather than
    // multiplies by the increment: division is correctly rounded, so the
    // result is the nearest representable multiple (1.24 -> 1.2 exactly,
    // not 1.2000000000000002).
    (value / MINIMUM_INCREMENT).round() / (1.0 / MINIMUM_INCREMENT)
}
