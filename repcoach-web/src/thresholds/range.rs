//! Closed intervals used by every threshold

use serde::{Deserialize, Serialize};

/// Boundary-inclusive membership test.
pub fn in_range(val: f32, low: f32, high: f32) -> bool {
    low <= val && val <= high
}

/// Closed interval `[low, high]`, written as a two-element array in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Range {
    pub low: f32,
    pub high: f32,
}

impl Range {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Range covering a slice of samples, `None` when empty.
    pub fn spanning(values: &[f32]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        let (low, high) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(Self { low, high })
    }

    pub fn contains(&self, val: f32) -> bool {
        in_range(val, self.low, self.high)
    }

    pub fn center(&self) -> f32 {
        (self.low + self.high) / 2.0
    }

    pub fn length(&self) -> f32 {
        self.high - self.low
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low <= self.high
    }
}

impl From<[f32; 2]> for Range {
    fn from(pair: [f32; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<Range> for [f32; 2] {
    fn from(range: Range) -> Self {
        [range.low, range.high]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_is_boundary_inclusive() {
        assert!(in_range(10.0, 10.0, 20.0));
        assert!(in_range(20.0, 10.0, 20.0));
        assert!(in_range(15.0, 10.0, 20.0));
        assert!(!in_range(9.99, 10.0, 20.0));
        assert!(!in_range(20.01, 10.0, 20.0));
    }

    #[test]
    fn test_spanning() {
        assert_eq!(Range::spanning(&[]), None);
        assert_eq!(Range::spanning(&[3.0]), Some(Range::new(3.0, 3.0)));
        assert_eq!(Range::spanning(&[5.0, 1.0, 9.0, 2.0]), Some(Range::new(1.0, 9.0)));
    }

    #[test]
    fn test_deserialize_from_pair() {
        let range: Range = serde_json::from_str("[160, 180]").unwrap();
        assert_eq!(range, Range::new(160.0, 180.0));
        assert!((range.center() - 170.0).abs() < 1e-6);
    }

    #[test]
    fn test_validity() {
        assert!(Range::new(1.0, 1.0).is_valid());
        assert!(!Range::new(2.0, 1.0).is_valid());
        assert!(!Range::new(f32::NAN, 1.0).is_valid());
    }
}
