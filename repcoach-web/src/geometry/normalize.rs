//! Torso-aligned normalization
//!
//! Fits a line through both shoulders and both hips by least squares
//! (x as the independent variable), then moves every landmark so the hip
//! midpoint is the origin and the fitted torso line has no tilt. Angles,
//! distances and areas measured afterwards do not depend on where the
//! person stands or how the camera is rolled.

use nalgebra::{Matrix4x2, Vector4};

use super::{Landmark, LEFT_HIP, LEFT_SHOULDER, RIGHT_HIP, RIGHT_SHOULDER};

/// Singular values below this are treated as zero by the solver
const LSTSQ_EPS: f32 = 1e-6;

/// Trunk landmarks used for the line fit
const TRUNK: [usize; 4] = [LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP];

/// Normalize landmarks into the torso frame
///
/// Returns one point per input landmark, same order, or `None` when the
/// slice is too short to hold the four trunk landmarks.
pub(crate) fn normalize_by_least_squares(landmarks: &[Landmark]) -> Option<Vec<(f32, f32)>> {
    if TRUNK.iter().any(|&idx| idx >= landmarks.len()) {
        return None;
    }

    let theta = torso_slope(landmarks).atan();
    let (sin_t, cos_t) = (-theta).sin_cos();

    let hip_l = landmarks[LEFT_HIP];
    let hip_r = landmarks[RIGHT_HIP];
    let mid_hip = ((hip_l.x + hip_r.x) / 2.0, (hip_l.y + hip_r.y) / 2.0);

    let points = landmarks
        .iter()
        .map(|lm| {
            let x = lm.x - mid_hip.0;
            let y = lm.y - mid_hip.1;
            (x * cos_t - y * sin_t, x * sin_t + y * cos_t)
        })
        .collect();
    Some(points)
}

/// Slope `m` of `y = m·x + c` through the trunk landmarks
///
/// Solved with SVD so a rank-deficient fit (all four x equal) falls back to
/// the minimum-norm solution instead of dividing by zero.
fn torso_slope(landmarks: &[Landmark]) -> f32 {
    let mut design = Matrix4x2::<f32>::zeros();
    let mut ys = Vector4::<f32>::zeros();
    for (row, &idx) in TRUNK.iter().enumerate() {
        design[(row, 0)] = landmarks[idx].x;
        design[(row, 1)] = 1.0;
        ys[row] = landmarks[idx].y;
    }

    design
        .svd(true, true)
        .solve(&ys, LSTSQ_EPS)
        .map(|solution| solution[0])
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{calculate_angle, LANDMARK_COUNT, LEFT_ELBOW};

    fn pose_with_trunk(shoulder_l: (f32, f32), shoulder_r: (f32, f32), hip_l: (f32, f32), hip_r: (f32, f32)) -> Vec<Landmark> {
        let mut lms = vec![Landmark::default(); LANDMARK_COUNT];
        lms[LEFT_SHOULDER] = Landmark::new(shoulder_l.0, shoulder_l.1, 0.0);
        lms[RIGHT_SHOULDER] = Landmark::new(shoulder_r.0, shoulder_r.1, 0.0);
        lms[LEFT_HIP] = Landmark::new(hip_l.0, hip_l.1, 0.0);
        lms[RIGHT_HIP] = Landmark::new(hip_r.0, hip_r.1, 0.0);
        lms
    }

    #[test]
    fn test_hip_midpoint_becomes_origin() {
        let lms = pose_with_trunk((0.4, 0.3), (0.6, 0.3), (0.45, 0.6), (0.55, 0.6));
        let norm = normalize_by_least_squares(&lms).unwrap();
        let mid = (
            (norm[LEFT_HIP].0 + norm[RIGHT_HIP].0) / 2.0,
            (norm[LEFT_HIP].1 + norm[RIGHT_HIP].1) / 2.0,
        );
        assert!(mid.0.abs() < 1e-5);
        assert!(mid.1.abs() < 1e-5);
        assert_eq!(norm.len(), LANDMARK_COUNT);
    }

    #[test]
    fn test_level_trunk_only_translates() {
        // Shoulders and hips on one horizontal line: slope 0, no rotation
        let lms = pose_with_trunk((0.2, 0.5), (0.4, 0.5), (0.6, 0.5), (0.8, 0.5));
        let norm = normalize_by_least_squares(&lms).unwrap();
        assert!((norm[LEFT_SHOULDER].0 - (0.2 - 0.7)).abs() < 1e-5);
        assert!(norm[LEFT_SHOULDER].1.abs() < 1e-5);
    }

    #[test]
    fn test_tilted_trunk_is_levelled() {
        // All four trunk points on y = x: fitted slope 1, rotated by -45°
        let lms = pose_with_trunk((0.1, 0.1), (0.2, 0.2), (0.3, 0.3), (0.4, 0.4));
        let norm = normalize_by_least_squares(&lms).unwrap();
        for idx in TRUNK {
            assert!(norm[idx].1.abs() < 1e-4, "trunk point {idx} not levelled");
        }
    }

    #[test]
    fn test_short_slice_returns_none() {
        assert!(normalize_by_least_squares(&[]).is_none());
        let lms = vec![Landmark::default(); RIGHT_HIP];
        assert!(normalize_by_least_squares(&lms).is_none());

        // Trunk indices present is enough
        let lms = vec![Landmark::default(); RIGHT_HIP + 1];
        assert_eq!(normalize_by_least_squares(&lms).map(|norm| norm.len()), Some(RIGHT_HIP + 1));
    }

    #[test]
    fn test_angles_survive_normalization() {
        let mut lms = pose_with_trunk((0.4, 0.3), (0.6, 0.32), (0.45, 0.6), (0.55, 0.62));
        lms[LEFT_ELBOW] = Landmark::new(0.35, 0.45, 0.0);
        let raw = calculate_angle(lms[LEFT_ELBOW].xy(), lms[LEFT_SHOULDER].xy(), lms[LEFT_HIP].xy());

        let norm = normalize_by_least_squares(&lms).unwrap();
        let normalized = calculate_angle(norm[LEFT_ELBOW], norm[LEFT_SHOULDER], norm[LEFT_HIP]);
        assert!((raw - normalized).abs() < 0.01);
    }
}
