//! Range-overlap scores
//!
//! All scores here are fractions in [0, 1]; callers scale to percent.

use crate::thresholds::Range;

/// Fraction of the observed range that lies inside the reference range
///
/// A single-point observation scores 1 if the point is inside the
/// reference and 0 otherwise.
pub fn containment_score(observed: Range, reference: Range) -> f32 {
    if observed.low == observed.high {
        return if reference.contains(observed.low) { 1.0 } else { 0.0 };
    }

    let observed_len = observed.length();
    if observed_len <= 0.0 {
        return 1.0;
    }

    let overlap_low = observed.low.max(reference.low);
    let overlap_high = observed.high.min(reference.high);
    (overlap_high - overlap_low).max(0.0) / observed_len
}

/// Containment of the range spanned by `samples`, 0 when there are none
pub fn samples_containment(samples: &[f32], reference: Option<Range>) -> f32 {
    match (Range::spanning(samples), reference) {
        (Some(observed), Some(reference)) => containment_score(observed, reference),
        _ => 0.0,
    }
}

/// Range-of-motion score for one joint in one stage
///
/// Full marks as soon as the lowest observed angle lands inside the
/// reference band. Otherwise the overshoot below and above the band, each
/// reduced by `buffer` degrees, is subtracted from the observed range
/// length.
pub fn dynamic_angle_score(observed: Range, reference: Range, buffer: f32) -> f32 {
    if reference.contains(observed.low) {
        return 1.0;
    }

    let below = (reference.low - observed.low).max(0.0);
    let above = (observed.high - reference.high).max(0.0);
    let penalty = (below - buffer).max(0.0) + (above - buffer).max(0.0);

    let observed_len = observed.length();
    if observed_len > 0.0 {
        ((observed_len - penalty) / observed_len).max(0.0)
    } else {
        0.0
    }
}
