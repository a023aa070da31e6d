//! Joint angle and distance helpers
//!
//! Points are `(x, y)` in whatever frame the caller uses; the angle is
//! invariant to translation and rotation.

/// Angle at vertex `b` between rays `b→a` and `b→c`, in degrees
///
/// Uses the difference of the two ray headings (atan2), folded so the
/// result always lies in [0, 180]:
/// - 180° = straight limb
/// - 90° = right angle
///
/// Coincident points are not guarded; callers must not feed zero-length
/// segments.
pub fn calculate_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let heading_c = (c.1 - b.1).atan2(c.0 - b.0);
    let heading_a = (a.1 - b.1).atan2(a.0 - b.0);

    let angle = (heading_c - heading_a).to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Euclidean distance between two points
pub fn distance(p1: (f32, f32), p2: (f32, f32)) -> f32 {
    let dx = p2.0 - p1.0;
    let dy = p2.1 - p1.1;
    (dx * dx + dy * dy).sqrt()
}
