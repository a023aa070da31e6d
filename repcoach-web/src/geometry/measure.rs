//! Per-frame measurements from a pose
//!
//! Turns 33 raw landmarks into the scalar inputs of the repetition counter:
//! four dynamic angles, six static joint angles, wrist spacing and
//! silhouette area.

use crate::thresholds::{DynamicJoint, StaticJoint};

use super::{
    calculate_angle, convex_hull_area, distance, normalize_by_least_squares, Landmark,
    LANDMARK_COUNT, LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST,
    RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

/// Elbow and shoulder angles for one frame, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DynamicAngles {
    pub elbow_r: f32,
    pub elbow_l: f32,
    pub shoulder_r: f32,
    pub shoulder_l: f32,
}

impl DynamicAngles {
    pub fn new(elbow_r: f32, elbow_l: f32, shoulder_r: f32, shoulder_l: f32) -> Self {
        Self { elbow_r, elbow_l, shoulder_r, shoulder_l }
    }

    pub fn get(&self, joint: DynamicJoint) -> f32 {
        match joint {
            DynamicJoint::ElbowR => self.elbow_r,
            DynamicJoint::ElbowL => self.elbow_l,
            DynamicJoint::ShoulderR => self.shoulder_r,
            DynamicJoint::ShoulderL => self.shoulder_l,
        }
    }
}

/// Static joint angles for one frame, indexed by [`StaticJoint`]
///
/// A joint that could not be measured is `None` and is skipped by the
/// static checks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaticAngles {
    values: [Option<f32>; StaticJoint::COUNT],
}

impl StaticAngles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, joint: StaticJoint, angle: f32) -> Self {
        self.set(joint, angle);
        self
    }

    pub fn set(&mut self, joint: StaticJoint, angle: f32) {
        self.values[joint.index()] = Some(angle);
    }

    pub fn get(&self, joint: StaticJoint) -> Option<f32> {
        self.values[joint.index()]
    }

    /// Measured joints in [`StaticJoint::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (StaticJoint, f32)> + '_ {
        StaticJoint::ALL
            .iter()
            .filter_map(move |joint| self.get(*joint).map(|angle| (*joint, angle)))
    }
}

/// Everything the counter needs from one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameMeasurements {
    pub dynamic: DynamicAngles,
    pub statics: StaticAngles,
    /// Distance between the wrists in the normalized frame
    pub wrist_distance: f32,
    /// Convex hull area of all normalized landmarks
    pub hull_area: f32,
}

/// Measure a full MediaPipe pose
///
/// Dynamic angles, wrist distance and hull area come from the
/// torso-normalized landmarks; static joint angles use the raw image
/// positions. Returns `None` if fewer than 33 landmarks are supplied.
pub fn measure_frame(landmarks: &[Landmark]) -> Option<FrameMeasurements> {
    if landmarks.len() < LANDMARK_COUNT {
        return None;
    }

    let norm = normalize_by_least_squares(landmarks)?;

    let dynamic = DynamicAngles {
        elbow_r: calculate_angle(norm[RIGHT_SHOULDER], norm[RIGHT_ELBOW], norm[RIGHT_WRIST]),
        elbow_l: calculate_angle(norm[LEFT_SHOULDER], norm[LEFT_ELBOW], norm[LEFT_WRIST]),
        shoulder_r: calculate_angle(norm[RIGHT_ELBOW], norm[RIGHT_SHOULDER], norm[RIGHT_HIP]),
        shoulder_l: calculate_angle(norm[LEFT_ELBOW], norm[LEFT_SHOULDER], norm[LEFT_HIP]),
    };

    let raw = |a: usize, b: usize, c: usize| {
        calculate_angle(landmarks[a].xy(), landmarks[b].xy(), landmarks[c].xy())
    };
    let statics = StaticAngles::new()
        .with(StaticJoint::KneeR, raw(RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE))
        .with(StaticJoint::KneeL, raw(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE))
        .with(StaticJoint::HipR, raw(RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE))
        .with(StaticJoint::HipL, raw(LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE))
        .with(StaticJoint::ShoulderR, raw(RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_HIP))
        .with(StaticJoint::ShoulderL, raw(LEFT_ELBOW, LEFT_SHOULDER, LEFT_HIP));

    Some(FrameMeasurements {
        dynamic,
        statics,
        wrist_distance: distance(norm[LEFT_WRIST], norm[RIGHT_WRIST]),
        hull_area: convex_hull_area(&norm),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Upright frontal pose with straight legs and arms hanging by the sides
    pub(crate) fn standing_pose() -> Vec<Landmark> {
        let mut lms = vec![Landmark::new(0.5, 0.15, 0.0); LANDMARK_COUNT];
        let mut put = |idx: usize, x: f32, y: f32| lms[idx] = Landmark::new(x, y, 0.0);
        put(LEFT_SHOULDER, 0.60, 0.30);
        put(RIGHT_SHOULDER, 0.40, 0.30);
        put(LEFT_ELBOW, 0.62, 0.45);
        put(RIGHT_ELBOW, 0.38, 0.45);
        put(LEFT_WRIST, 0.62, 0.60);
        put(RIGHT_WRIST, 0.38, 0.60);
        put(LEFT_HIP, 0.56, 0.60);
        put(RIGHT_HIP, 0.44, 0.60);
        put(LEFT_KNEE, 0.56, 0.80);
        put(RIGHT_KNEE, 0.44, 0.80);
        put(LEFT_ANKLE, 0.56, 0.95);
        put(RIGHT_ANKLE, 0.44, 0.95);
        lms
    }

    #[test]
    fn test_too_few_landmarks() {
        assert!(measure_frame(&[Landmark::default(); 10]).is_none());
    }

    #[test]
    fn test_standing_pose_measurements() {
        let m = measure_frame(&standing_pose()).unwrap();

        // Straight legs
        assert!((m.statics.get(StaticJoint::KneeR).unwrap() - 180.0).abs() < 0.5);
        assert!((m.statics.get(StaticJoint::KneeL).unwrap() - 180.0).abs() < 0.5);

        // Arms straight down: elbows nearly straight, shoulders nearly closed
        assert!(m.dynamic.elbow_r > 160.0);
        assert!(m.dynamic.elbow_l > 160.0);
        assert!(m.dynamic.shoulder_r < 30.0);
        assert!(m.dynamic.shoulder_l < 30.0);

        assert!(m.wrist_distance > 0.2 && m.wrist_distance < 0.3);
        assert!(m.hull_area > 0.0);
    }

    #[test]
    fn test_static_angles_iterate_in_joint_order() {
        let angles = StaticAngles::new()
            .with(StaticJoint::HipL, 170.0)
            .with(StaticJoint::KneeR, 175.0);
        let joints: Vec<StaticJoint> = angles.iter().map(|(joint, _)| joint).collect();
        assert_eq!(joints, vec![StaticJoint::KneeR, StaticJoint::HipL]);
        assert_eq!(angles.get(StaticJoint::ShoulderR), None);
    }
}
