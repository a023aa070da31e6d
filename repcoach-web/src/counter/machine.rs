//! Repetition counter
//!
//! Runs once per frame. Two counts are kept per exercise:
//! - strict: advances only on frames with valid posture and hull agreement,
//!   reported to the caller as `strict_completed`
//! - raw: advances on the debounced limb stage alone; its completion is what
//!   scores the repetition

use std::collections::BTreeMap;

use log::{debug, info};
use serde::Serialize;

use crate::geometry::FrameMeasurements;
use crate::scoring::{check_static_angles, score_repetition, RepetitionScore};
use crate::thresholds::{
    DynamicAngleThresholds, DynamicJoint, ExerciseKind, GenderThresholds, JointKind, Stage,
    ThresholdTable,
};

use super::stage::{combine_side, detect_stage, HullPhase, Phase, SideTracker};
use super::RepetitionAccumulator;

/// Result of scoring one completed repetition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepSummary {
    pub exercise: ExerciseKind,
    pub scores: RepetitionScore,
    /// Distinct problem sources raised during the repetition, `"; "` joined
    pub feedback_summary: String,
    pub fps: f32,
}

/// What one frame did to the counter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    pub stage_right: Option<Stage>,
    pub stage_left: Option<Stage>,
    /// A posture-validated repetition finished on this frame
    pub strict_completed: bool,
    /// Present when a raw repetition finished and reference data was available
    pub summary: Option<RepSummary>,
}

/// Both sides of one phase machine
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PhasePair {
    right: Phase,
    left: Phase,
}

impl PhasePair {
    fn both_done(&self) -> bool {
        self.right == Phase::Done && self.left == Phase::Done
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-frame repetition state machine
#[derive(Debug, Clone, Default)]
pub struct RepetitionCounter {
    right: SideTracker,
    left: SideTracker,
    strict: PhasePair,
    raw: PhasePair,
    hull_phase: HullPhase,
    raw_reps: BTreeMap<ExerciseKind, u32>,
    accumulator: RepetitionAccumulator,
}

impl RepetitionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter by one frame
    ///
    /// `feedback` is this frame's feedback text, kept for the repetition's
    /// problem summary. `frame_secs` is the frame duration used for the fps
    /// estimate.
    pub fn process_frame(
        &mut self,
        exercise: ExerciseKind,
        frame: &FrameMeasurements,
        thresholds: &ThresholdTable,
        reference: Option<&GenderThresholds>,
        feedback: &[String],
        frame_secs: f32,
    ) -> FrameOutcome {
        let Some(dynamic) = thresholds.dynamic(exercise) else {
            return self.outcome(false, None);
        };
        let config = &thresholds.global_config;

        let frame_valid = frame_is_valid(frame, reference, config.static_angle_tolerance);

        let observed_right = side_stage(exercise, dynamic, frame, DynamicJoint::ElbowR, DynamicJoint::ShoulderR);
        let observed_left = side_stage(exercise, dynamic, frame, DynamicJoint::ElbowL, DynamicJoint::ShoulderL);

        let hull_before = self.hull_phase;
        self.hull_phase = self
            .hull_phase
            .update(frame.hull_area, reference.map(|r| &r.convex_hull));
        if self.hull_phase != hull_before {
            debug!("Hull phase: {} -> {}", hull_before.as_str(), self.hull_phase.as_str());
        }

        // Samples follow the committed right-side stage from before this frame
        if let Some(stage) = self.right.committed() {
            self.accumulator.record(stage, exercise, frame, feedback, frame_secs);
        }

        self.right.update(observed_right, config.bad_frame_tolerance);
        self.left.update(observed_left, config.bad_frame_tolerance);
        let stage_right = self.right.committed();
        let stage_left = self.left.committed();

        let mut strict_completed = false;
        if frame_valid {
            let before = self.strict;
            self.strict.right = self.strict.right.advance_with_hull(stage_right, self.hull_phase);
            self.strict.left = self.strict.left.advance_with_hull(stage_left, self.hull_phase);
            if self.strict != before {
                debug!(
                    "Strict phases: right={} left={}",
                    self.strict.right.as_str(),
                    self.strict.left.as_str()
                );
            }
            if self.strict.both_done() {
                strict_completed = true;
                self.strict.reset();
                info!("Validated repetition completed: {}", exercise.as_str());
            }
        }

        self.raw.right = self.raw.right.advance(stage_right);
        self.raw.left = self.raw.left.advance(stage_left);

        let mut summary = None;
        if self.raw.both_done() {
            let count = self.raw_reps.entry(exercise).or_insert(0);
            *count += 1;
            info!("Repetition completed: {} (total {})", exercise.as_str(), count);

            if let Some(reference) = reference {
                let scores = score_repetition(&self.accumulator, reference, dynamic, exercise, config);
                summary = Some(RepSummary {
                    exercise,
                    scores,
                    feedback_summary: self.accumulator.problem_summary(),
                    fps: self.accumulator.average_fps(),
                });
            }

            self.accumulator.clear();
            self.raw.reset();
        }

        self.outcome(strict_completed, summary)
    }

    fn outcome(&self, strict_completed: bool, summary: Option<RepSummary>) -> FrameOutcome {
        FrameOutcome {
            stage_right: self.right.committed(),
            stage_left: self.left.committed(),
            strict_completed,
            summary,
        }
    }

    /// Raw repetitions counted for an exercise
    pub fn raw_reps(&self, exercise: ExerciseKind) -> u32 {
        self.raw_reps.get(&exercise).copied().unwrap_or(0)
    }

    pub fn hull_phase(&self) -> HullPhase {
        self.hull_phase
    }

    /// `(right, left)` phases of the posture-validated machine
    pub fn strict_phases(&self) -> (Phase, Phase) {
        (self.strict.right, self.strict.left)
    }

    /// `(right, left)` phases of the raw machine
    pub fn raw_phases(&self) -> (Phase, Phase) {
        (self.raw.right, self.raw.left)
    }

    pub fn accumulator(&self) -> &RepetitionAccumulator {
        &self.accumulator
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Wrist spacing in band and every static joint within tolerance
///
/// Without reference data no frame is valid.
fn frame_is_valid(frame: &FrameMeasurements, reference: Option<&GenderThresholds>, tolerance: f32) -> bool {
    let Some(reference) = reference else {
        return false;
    };

    let wrist_ok = reference
        .wrist_distance
        .map_or(false, |band| band.contains(frame.wrist_distance));
    let static_ok = check_static_angles(&frame.statics, &reference.static_angles, tolerance)
        .iter()
        .all(|check| check.ok);

    wrist_ok && static_ok
}

fn side_stage(
    exercise: ExerciseKind,
    dynamic: &DynamicAngleThresholds,
    frame: &FrameMeasurements,
    elbow: DynamicJoint,
    shoulder: DynamicJoint,
) -> Option<Stage> {
    let (elbow_up, elbow_down) = dynamic.bands(JointKind::Elbow);
    let (shoulder_up, shoulder_down) = dynamic.bands(JointKind::Shoulder);
    combine_side(
        exercise,
        detect_stage(frame.dynamic.get(elbow), elbow_up, elbow_down),
        detect_stage(frame.dynamic.get(shoulder), shoulder_up, shoulder_down),
    )
}
