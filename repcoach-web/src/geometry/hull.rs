//! Convex hull of the body silhouette
//!
//! Andrew's monotone chain plus the shoelace formula. Area is in the units
//! of the input frame (torso-normalized image units, not pixels).

use std::cmp::Ordering;

/// Cross product of `o→a` and `o→b` (positive = counter-clockwise turn)
fn cross(o: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Hull vertices in counter-clockwise order, collinear points dropped
///
/// Fewer than three distinct points yield the points themselves.
pub fn convex_hull(points: &[(f32, f32)]) -> Vec<(f32, f32)> {
    let mut pts: Vec<(f32, f32)> = points
        .iter()
        .copied()
        .filter(|p| p.0.is_finite() && p.1.is_finite())
        .collect();
    pts.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    });
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<(f32, f32)> = Vec::with_capacity(pts.len() * 2);

    // Lower hull
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Upper hull
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Last point repeats the first
    hull.pop();
    hull
}

/// Area enclosed by the convex hull of `points`
pub fn convex_hull_area(points: &[(f32, f32)]) -> f32 {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return 0.0;
    }

    let twice_area: f32 = hull
        .iter()
        .zip(hull.iter().cycle().skip(1))
        .map(|(a, b)| a.0 * b.1 - b.0 * a.1)
        .sum();
    twice_area.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_with_interior_points() {
        let points = [
            (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0),
            (0.5, 0.5), (0.25, 0.75), (0.5, 0.0),
        ];
        assert_eq!(convex_hull(&points).len(), 4);
        assert!((convex_hull_area(&points) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_area() {
        let points = [(0.0, 0.0), (2.0, 0.0), (0.0, 1.0)];
        assert!((convex_hull_area(&points) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_inputs_have_zero_area() {
        assert_eq!(convex_hull_area(&[]), 0.0);
        assert_eq!(convex_hull_area(&[(1.0, 1.0), (1.0, 1.0)]), 0.0);
        assert_eq!(convex_hull_area(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]), 0.0);
    }

    #[test]
    fn test_area_is_translation_invariant() {
        let base = [(0.0, 0.0), (0.3, 0.1), (0.2, 0.4), (-0.1, 0.3)];
        let shifted: Vec<(f32, f32)> = base.iter().map(|p| (p.0 + 5.0, p.1 - 2.0)).collect();
        assert!((convex_hull_area(&base) - convex_hull_area(&shifted)).abs() < 1e-4);
    }
}
