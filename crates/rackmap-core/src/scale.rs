//! Linear value translation between parameter ranges.
//!
//! Macro mappings carry a [`ValueScale`] from the macro's range into the
//! target parameter's range. The host applies it when a macro moves; the
//! engine uses the same type to report and simulate that translation.
//!
//! # Formulas
//!
//! - normalize: `(value - min) / (max - min)`, 0.0 for an empty range
//! - denormalize: `min + normalized * (max - min)`
//!
//! # Example
//!
//! ```rust
//! use rackmap_core::{ParamRange, ValueScale};
//!
//! let scale = ValueScale::linear(ParamRange::new(0.0, 127.0), ParamRange::new(-24.0, 24.0));
//! assert_eq!(scale.apply(0.0), -24.0);
//! assert_eq!(scale.apply(127.0), 24.0);
//! ```

use serde::{Deserialize, Serialize};

/// Closed interval `[min, max]` with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl ParamRange {
    /// Unit range `[0, 1]`.
    pub const UNIT: ParamRange = ParamRange { min: 0.0, max: 1.0 };

    /// Creates a range, swapping reversed bounds.
    pub fn new(a: f32, b: f32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// `max - min`.
    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// True if `value` lies within the range. False for NaN.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamps `value` into the range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Maps a value in the range to `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.span();
        if span == 0.0 {
            return 0.0;
        }
        (value - self.min) / span
    }

    /// Maps `[0, 1]` back into the range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized * self.span()
    }
}

impl Default for ParamRange {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Linear map from a source range onto a target range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScale {
    /// Range values come from (the macro).
    pub source: ParamRange,
    /// Range values land in (the mapped parameter).
    pub target: ParamRange,
}

impl ValueScale {
    /// Linear scale from `source` onto `target`.
    pub fn linear(source: ParamRange, target: ParamRange) -> Self {
        Self { source, target }
    }

    /// Translates a source value into the target range, clamped.
    pub fn apply(&self, value: f32) -> f32 {
        let n = self.source.normalize(self.source.clamp(value));
        self.target.clamp(self.target.denormalize(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_to_unit_is_identity() {
        let scale = ValueScale::linear(ParamRange::UNIT, ParamRange::UNIT);
        for v in [0.0, 0.25, 0.5, 0.8, 1.0] {
            assert_eq!(scale.apply(v), v);
        }
    }

    #[test]
    fn maps_onto_wider_target() {
        let scale = ValueScale::linear(ParamRange::UNIT, ParamRange::new(20.0, 20_000.0));
        assert_eq!(scale.apply(0.0), 20.0);
        assert_eq!(scale.apply(1.0), 20_000.0);
        assert!((scale.apply(0.5) - 10_010.0).abs() < 1e-2);
    }

    #[test]
    fn source_is_clamped() {
        let scale = ValueScale::linear(ParamRange::UNIT, ParamRange::new(-1.0, 1.0));
        assert_eq!(scale.apply(2.0), 1.0);
        assert_eq!(scale.apply(-3.0), -1.0);
    }

    #[test]
    fn empty_source_maps_to_target_min() {
        let scale = ValueScale::linear(ParamRange::new(0.5, 0.5), ParamRange::new(2.0, 4.0));
        assert_eq!(scale.apply(0.5), 2.0);
    }

    #[test]
    fn range_swaps_reversed_bounds() {
        let r = ParamRange::new(1.0, -1.0);
        assert_eq!((r.min, r.max), (-1.0, 1.0));
        assert!(!r.contains(f32::NAN));
    }
}
