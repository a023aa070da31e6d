//! Per-repetition sample collection
//!
//! Gathers everything observed while a repetition is in progress so it can
//! be scored once the repetition completes.

use std::collections::BTreeSet;

use crate::geometry::FrameMeasurements;
use crate::thresholds::{DynamicJoint, ExerciseKind, Stage, StaticJoint};

/// Feedback markers that flag a problem line
const PROBLEM_MARKERS: [&str; 2] = ["ADJUST", "REMAIN"];

/// Samples split by the stage they were observed in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageSamples {
    pub up: Vec<f32>,
    pub down: Vec<f32>,
}

impl StageSamples {
    pub fn get(&self, stage: Stage) -> &[f32] {
        match stage {
            Stage::Up => &self.up,
            Stage::Down => &self.down,
        }
    }

    pub fn push(&mut self, stage: Stage, value: f32) {
        match stage {
            Stage::Up => self.up.push(value),
            Stage::Down => self.down.push(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }
}

/// Mutable buffer for the repetition currently in progress
#[derive(Debug, Clone, Default)]
pub struct RepetitionAccumulator {
    /// Indexed like [`DynamicJoint::ALL`]
    dynamic: [StageSamples; 4],
    hull_area: StageSamples,
    wrist_distance: Vec<f32>,
    /// Indexed like [`StaticJoint::ALL`]
    static_angles: [Vec<f32>; StaticJoint::COUNT],
    feedback: Vec<String>,
    frame_times: Vec<f32>,
}

impl RepetitionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame observed while the right side was in `stage`
    ///
    /// Shoulder static angles are only kept for exercises that hold the
    /// shoulder still.
    pub fn record(
        &mut self,
        stage: Stage,
        exercise: ExerciseKind,
        frame: &FrameMeasurements,
        feedback: &[String],
        frame_secs: f32,
    ) {
        for (slot, joint) in self.dynamic.iter_mut().zip(DynamicJoint::ALL) {
            slot.push(stage, frame.dynamic.get(joint));
        }
        self.hull_area.push(stage, frame.hull_area);
        self.wrist_distance.push(frame.wrist_distance);
        self.feedback.extend(feedback.iter().cloned());
        self.frame_times.push(frame_secs);

        for (joint, angle) in frame.statics.iter() {
            if joint.is_shoulder() && !exercise.shoulder_is_static() {
                continue;
            }
            self.static_angles[joint.index()].push(angle);
        }
    }

    pub fn dynamic(&self, joint: DynamicJoint) -> &StageSamples {
        &self.dynamic[joint as usize]
    }

    pub fn hull_area(&self) -> &StageSamples {
        &self.hull_area
    }

    pub fn wrist_distance(&self) -> &[f32] {
        &self.wrist_distance
    }

    pub fn static_angles(&self, joint: StaticJoint) -> &[f32] {
        &self.static_angles[joint.index()]
    }

    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_times.is_empty()
    }

    /// Average frame rate over the recorded frames, 0 when unknown
    pub fn average_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let mean = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if mean > 0.0 {
            1.0 / mean
        } else {
            0.0
        }
    }

    /// Distinct problem sources raised during the repetition
    ///
    /// Takes the text before the first `:` of every problem line, sorted and
    /// joined with `"; "`.
    pub fn problem_summary(&self) -> String {
        let problems: BTreeSet<&str> = self
            .feedback
            .iter()
            .filter(|msg| PROBLEM_MARKERS.iter().any(|marker| msg.contains(marker)))
            .filter_map(|msg| msg.split(':').next())
            .map(str::trim)
            .collect();
        problems.into_iter().collect::<Vec<_>>().join("; ")
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DynamicAngles, StaticAngles};

    fn frame() -> FrameMeasurements {
        FrameMeasurements {
            dynamic: DynamicAngles::new(170.0, 168.0, 10.0, 12.0),
            statics: StaticAngles::new()
                .with(StaticJoint::KneeR, 175.0)
                .with(StaticJoint::ShoulderR, 15.0),
            wrist_distance: 0.3,
            hull_area: 0.15,
        }
    }

    #[test]
    fn test_record_buckets_by_stage() {
        let mut acc = RepetitionAccumulator::new();
        acc.record(Stage::Down, ExerciseKind::HammerCurl, &frame(), &[], 0.05);
        acc.record(Stage::Up, ExerciseKind::HammerCurl, &frame(), &[], 0.05);

        assert_eq!(acc.dynamic(DynamicJoint::ElbowL).get(Stage::Down), &[168.0]);
        assert_eq!(acc.dynamic(DynamicJoint::ElbowL).get(Stage::Up), &[168.0]);
        assert_eq!(acc.hull_area().get(Stage::Down), &[0.15]);
        assert_eq!(acc.wrist_distance().len(), 2);
        assert_eq!(acc.frame_count(), 2);
    }

    #[test]
    fn test_shoulder_static_only_for_hammer_curl() {
        let mut curl = RepetitionAccumulator::new();
        curl.record(Stage::Down, ExerciseKind::HammerCurl, &frame(), &[], 0.05);
        assert_eq!(curl.static_angles(StaticJoint::ShoulderR), &[15.0]);
        assert_eq!(curl.static_angles(StaticJoint::KneeR), &[175.0]);

        let mut press = RepetitionAccumulator::new();
        press.record(Stage::Down, ExerciseKind::OverheadPress, &frame(), &[], 0.05);
        assert!(press.static_angles(StaticJoint::ShoulderR).is_empty());
        assert_eq!(press.static_angles(StaticJoint::KneeR), &[175.0]);
    }

    #[test]
    fn test_average_fps() {
        let mut acc = RepetitionAccumulator::new();
        assert_eq!(acc.average_fps(), 0.0);
        acc.record(Stage::Down, ExerciseKind::HammerCurl, &frame(), &[], 0.04);
        acc.record(Stage::Down, ExerciseKind::HammerCurl, &frame(), &[], 0.06);
        assert!((acc.average_fps() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_problem_summary_dedups_and_sorts() {
        let mut acc = RepetitionAccumulator::new();
        let feedback = vec![
            "knee_r: 150.0deg (ref: 170.0) REMAIN STATIONARY".to_string(),
            "Wrist Distance: 0.900 in range ADJUST WRIST".to_string(),
            "hip_l: 172.0deg (ref: 170.0) OK".to_string(),
        ];
        acc.record(Stage::Down, ExerciseKind::HammerCurl, &frame(), &feedback, 0.05);
        acc.record(Stage::Up, ExerciseKind::HammerCurl, &frame(), &feedback, 0.05);
        assert_eq!(acc.problem_summary(), "Wrist Distance; knee_r");
    }

    #[test]
    fn test_clear() {
        let mut acc = RepetitionAccumulator::new();
        acc.record(Stage::Down, ExerciseKind::HammerCurl, &frame(), &[], 0.05);
        acc.clear();
        assert!(acc.is_empty());
        assert!(acc.hull_area().is_empty());
    }
}
