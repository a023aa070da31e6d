//! Exercise classification from smoothed shoulder angles
//!
//! Hammer curls keep the upper arm by the side; overhead presses start with
//! the shoulder in its "down" band. Means over the last 15 frames are
//! compared against each exercise's detection ranges, hammer curl first.

use log::debug;

use crate::geometry::DynamicAngles;
use crate::thresholds::{ExerciseKind, Range, ThresholdTable};

use super::AngleWindow;

/// Rolling-history exercise classifier
#[derive(Debug, Clone)]
pub struct ExerciseClassifier {
    shoulder_r: AngleWindow,
    shoulder_l: AngleWindow,
    current: ExerciseKind,
}

impl ExerciseClassifier {
    pub fn new() -> Self {
        Self {
            shoulder_r: AngleWindow::new(),
            shoulder_l: AngleWindow::new(),
            current: ExerciseKind::Unknown,
        }
    }

    /// Append this frame's shoulder angles to the histories
    ///
    /// Elbows play no part in classification.
    pub fn update_angles(&mut self, angles: &DynamicAngles) {
        self.shoulder_r.push(angles.shoulder_r);
        self.shoulder_l.push(angles.shoulder_l);
    }

    /// Re-classify the exercise from the shoulder histories
    ///
    /// Exercises without a detection range are never selected.
    pub fn detect_exercise(&mut self, thresholds: &ThresholdTable) -> ExerciseKind {
        let avg_r = self.shoulder_r.mean();
        let avg_l = self.shoulder_l.mean();
        let both_in = |range: Option<Range>| {
            range.map_or(false, |r| r.contains(avg_r) && r.contains(avg_l))
        };

        let detection = |kind: ExerciseKind| thresholds.exercise(kind).map(|e| &e.detection);

        let detected = if both_in(detection(ExerciseKind::HammerCurl).and_then(|d| d.shoulder_static)) {
            ExerciseKind::HammerCurl
        } else if both_in(detection(ExerciseKind::OverheadPress).and_then(|d| d.shoulder_down)) {
            ExerciseKind::OverheadPress
        } else {
            ExerciseKind::Unknown
        };

        if detected != self.current {
            debug!(
                "Exercise changed {} -> {} (shoulder mean R {:.1}, L {:.1})",
                self.current.as_str(),
                detected.as_str(),
                avg_r,
                avg_l
            );
            self.current = detected;
        }
        detected
    }

    /// Last classification result
    pub fn current(&self) -> ExerciseKind {
        self.current
    }

    /// Forget the histories (e.g. when the video source changes)
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ExerciseClassifier {
    fn default() -> Self {
        Self::new()
    }
}
