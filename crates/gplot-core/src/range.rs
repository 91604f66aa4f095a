//! Symmetric numeric ranges.

use serde::{Deserialize, Serialize};

/// An interval stored as a center and a non-negative half-width.
///
/// Axis ranges are usually nudged around their midpoint (`3+-` re-centers
/// while keeping the span), so center/half-width is the native form and
/// bounds are derived.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub center: f64,
    pub half_width: f64,
}

impl Range {
    /// Create a range. A negative half-width is folded to its magnitude.
    pub const fn new(center: f64, half_width: f64) -> Self {
        Self {
            center,
            half_width: half_width.abs(),
        }
    }

    /// Create a range from two bounds given in either order.
    pub fn from_bounds(a: f64, b: f64) -> Self {
        Self {
            center: (a + b) / 2.0,
            half_width: (b - a).abs() / 2.0,
        }
    }

    pub fn min(&self) -> f64 {
        self.center - self.half_width
    }

    pub fn max(&self) -> f64 {
        self.center + self.half_width
    }

    /// Same half-width, new center.
    pub fn recentered(&self, center: f64) -> Self {
        Self::new(center, self.half_width)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::new(0.0, 10.0)
    }
}

/// How a [`Range`] is written back as text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeNotation {
    /// `[min;max]`
    #[default]
    Bounds,
    /// `center+-halfwidth`
    Centered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_in_either_order() {
        let r = Range::from_bounds(5.0, 1.0);
        assert_eq!(r.center, 3.0);
        assert_eq!(r.half_width, 2.0);
        assert_eq!(r.min(), 1.0);
        assert_eq!(r.max(), 5.0);
    }

    #[test]
    fn negative_half_width_is_folded() {
        assert_eq!(Range::new(1.0, -2.0).half_width, 2.0);
    }

    #[test]
    fn recentered_keeps_span() {
        let r = Range::new(0.0, 4.0).recentered(10.0);
        assert_eq!(r, Range::new(10.0, 4.0));
        assert_eq!(r.min(), 6.0);
        assert_eq!(r.max(), 14.0);
    }
}
