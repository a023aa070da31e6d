//! Per-frame pipeline
//!
//! Owns everything one counting session needs and runs
//! measure → classify → feedback → count → log once per frame.

use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;

use crate::classifier::ExerciseClassifier;
use crate::counter::{RepSummary, RepetitionCounter};
use crate::geometry::{measure_frame, FrameMeasurements, Landmark};
use crate::scoring::{
    check_static_angles, dynamic_angle_violations, dynamic_feedback_lines, generate_feedback,
    problem_landmarks, FeedbackLine,
};
use crate::session::{SessionScoreLog, SessionSummary};
use crate::thresholds::{ExerciseKind, Gender, Stage, ThresholdError, ThresholdTable};

/// Everything the UI needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub exercise: ExerciseKind,
    pub stage_right: Option<Stage>,
    pub stage_left: Option<Stage>,
    /// Repetitions counted on limb stage alone
    pub raw_reps: u32,
    /// Repetitions that also passed posture and hull checks
    pub corrected_reps: u32,
    pub strict_completed: bool,
    pub feedback: Vec<FeedbackLine>,
    /// Landmark indices to mark red on the skeleton
    pub highlighted: Vec<usize>,
    pub summary: Option<RepSummary>,
}

/// One counting session
#[derive(Debug, Clone)]
pub struct RepCoach {
    thresholds: ThresholdTable,
    gender: Gender,
    classifier: ExerciseClassifier,
    counter: RepetitionCounter,
    score_log: SessionScoreLog,
    corrected_reps: BTreeMap<ExerciseKind, u32>,
    last_summary: Option<RepSummary>,
    warned: Option<(ExerciseKind, Gender)>,
}

impl RepCoach {
    pub fn new(thresholds: ThresholdTable, gender: Gender) -> Self {
        Self {
            thresholds,
            gender,
            classifier: ExerciseClassifier::new(),
            counter: RepetitionCounter::new(),
            score_log: SessionScoreLog::new(),
            corrected_reps: ExerciseKind::TRACKED.iter().map(|kind| (*kind, 0)).collect(),
            last_summary: None,
            warned: None,
        }
    }

    pub fn from_json(json: &str, gender: Gender) -> Result<Self, ThresholdError> {
        Ok(Self::new(ThresholdTable::from_json(json)?, gender))
    }

    /// Process one pose; `None` if it has fewer than 33 landmarks
    pub fn process_landmarks(&mut self, landmarks: &[Landmark], frame_secs: f32) -> Option<FrameReport> {
        let frame = measure_frame(landmarks)?;
        Some(self.process_measurements(&frame, frame_secs))
    }

    /// Process one frame of precomputed measurements
    pub fn process_measurements(&mut self, frame: &FrameMeasurements, frame_secs: f32) -> FrameReport {
        self.classifier.update_angles(&frame.dynamic);
        let exercise = self.classifier.detect_exercise(&self.thresholds);

        self.warn_missing_reference(exercise);

        let reference = self.thresholds.gender(exercise, self.gender);
        let dynamic = self.thresholds.dynamic(exercise);
        let tolerance = self.thresholds.global_config.static_angle_tolerance;

        let mut feedback = generate_feedback(exercise, reference, frame, tolerance);
        let dynamic_lines = dynamic_feedback_lines(exercise, &frame.dynamic, dynamic);

        let feedback_text: Vec<String> = feedback
            .iter()
            .chain(dynamic_lines.iter())
            .map(|line| line.text.clone())
            .collect();

        // Dynamic lines are shown right after the wrist line
        let insert_at = feedback
            .iter()
            .position(|line| line.text.starts_with("Wrist Distance"))
            .map_or(feedback.len(), |idx| idx + 1);
        let tail = feedback.split_off(insert_at);
        feedback.extend(dynamic_lines);
        feedback.extend(tail);

        let mut highlighted = dynamic_angle_violations(exercise, &frame.dynamic, dynamic);
        if let Some(reference) = reference {
            let checks = check_static_angles(&frame.statics, &reference.static_angles, tolerance);
            highlighted.extend(problem_landmarks(exercise, &checks));
        }
        highlighted.sort_unstable();
        highlighted.dedup();

        let outcome = self.counter.process_frame(
            exercise,
            frame,
            &self.thresholds,
            reference,
            &feedback_text,
            frame_secs,
        );

        if outcome.strict_completed && exercise.is_tracked() {
            *self.corrected_reps.entry(exercise).or_insert(0) += 1;
        }
        if let Some(summary) = &outcome.summary {
            self.score_log.append(summary.exercise, summary.scores.clone());
            self.last_summary = Some(summary.clone());
        }

        FrameReport {
            exercise,
            stage_right: outcome.stage_right,
            stage_left: outcome.stage_left,
            raw_reps: self.counter.raw_reps(exercise),
            corrected_reps: self.corrected_reps(exercise),
            strict_completed: outcome.strict_completed,
            feedback,
            highlighted,
            summary: outcome.summary,
        }
    }

    /// Warn once per exercise/gender pair about reference data gaps
    fn warn_missing_reference(&mut self, exercise: ExerciseKind) {
        let has_reference = self.thresholds.gender(exercise, self.gender).is_some();
        let has_dynamic = self.thresholds.dynamic(exercise).is_some();
        if !exercise.is_tracked() || (has_reference && has_dynamic) {
            return;
        }
        let key = (exercise, self.gender);
        if self.warned == Some(key) {
            return;
        }
        self.warned = Some(key);

        if !has_dynamic {
            warn!("No dynamic angle thresholds for {}; repetitions are not counted", exercise.as_str());
        }
        if !has_reference {
            warn!(
                "No {} reference data for {}; repetitions are counted but not validated or scored",
                self.gender.as_str(),
                exercise.as_str()
            );
        }
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Switch reference data; takes effect on the next frame
    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = gender;
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn current_exercise(&self) -> ExerciseKind {
        self.classifier.current()
    }

    pub fn raw_reps(&self, exercise: ExerciseKind) -> u32 {
        self.counter.raw_reps(exercise)
    }

    /// Posture-validated repetitions for an exercise
    pub fn corrected_reps(&self, exercise: ExerciseKind) -> u32 {
        self.corrected_reps.get(&exercise).copied().unwrap_or(0)
    }

    pub fn last_summary(&self) -> Option<&RepSummary> {
        self.last_summary.as_ref()
    }

    pub fn score_log(&self) -> &SessionScoreLog {
        &self.score_log
    }

    pub fn session_summary(&self) -> SessionSummary {
        self.score_log.summarize()
    }

    /// Clear the session score log; counters keep running
    pub fn reset_summary(&mut self) {
        self.score_log.clear();
        self.last_summary = None;
    }

    /// Start over: histories, counters and scores
    pub fn reset(&mut self) {
        *self = Self::new(std::mem::take(&mut self.thresholds), self.gender);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{standing_pose, DynamicAngles, StaticAngles, LEFT_ELBOW, RIGHT_ELBOW, RIGHT_KNEE};
    use crate::thresholds::StaticJoint;
    use serde_json::json;

    fn table() -> ThresholdTable {
        let value = json!({
            "hammer_curl": {
                "detection": { "shoulder_static": [0, 25] },
                "dynamic_angles": {
                    "elbow_up": [30, 60], "elbow_down": [160, 180],
                    "shoulder_up": [0, 20], "shoulder_down": [0, 20]
                },
                "male": {
                    "static_angles": { "knee_r": 170, "knee_l": 170 },
                    "wrist_distance": [0.2, 0.4],
                    "convex_hull": { "up": [0.25, 0.4], "down": [0.1, 0.2] }
                }
            },
            "overhead_press": {
                "detection": { "shoulder_down": [70, 110] }
            }
        });
        ThresholdTable::from_json(&value.to_string()).unwrap()
    }

    fn frame(elbow: f32, hull: f32) -> FrameMeasurements {
        FrameMeasurements {
            dynamic: DynamicAngles::new(elbow, elbow, 10.0, 10.0),
            statics: StaticAngles::new()
                .with(StaticJoint::KneeR, 175.0)
                .with(StaticJoint::KneeL, 175.0),
            wrist_distance: 0.3,
            hull_area: hull,
        }
    }

    fn curl(coach: &mut RepCoach) -> Vec<FrameReport> {
        [(170.0, 0.15), (160.0, 0.15), (45.0, 0.3), (170.0, 0.15)]
            .iter()
            .map(|&(elbow, hull)| coach.process_measurements(&frame(elbow, hull), 1.0 / 30.0))
            .collect()
    }

    #[test]
    fn test_end_to_end_hammer_curl() {
        let mut coach = RepCoach::new(table(), Gender::Male);
        let reports = curl(&mut coach);

        assert!(reports.iter().all(|r| r.exercise == ExerciseKind::HammerCurl));
        assert_eq!(coach.raw_reps(ExerciseKind::HammerCurl), 1);
        assert_eq!(coach.corrected_reps(ExerciseKind::HammerCurl), 1);

        let last = reports.last().unwrap();
        assert!(last.strict_completed);
        assert_eq!(last.raw_reps, 1);
        assert_eq!(last.corrected_reps, 1);

        assert_eq!(coach.score_log().len(), 1);
        let entry = &coach.score_log().entries()[0];
        assert_eq!(entry.exercise, ExerciseKind::HammerCurl);
        assert!(entry.scores.hull_score > 0.0);
        assert!(coach.last_summary().is_some());
    }

    #[test]
    fn test_missing_gender_counts_raw_only() {
        let mut coach = RepCoach::new(table(), Gender::Female);
        curl(&mut coach);

        assert_eq!(coach.raw_reps(ExerciseKind::HammerCurl), 1);
        assert_eq!(coach.corrected_reps(ExerciseKind::HammerCurl), 0);
        assert!(coach.score_log().is_empty());

        coach.set_gender(Gender::Male);
        curl(&mut coach);
        assert_eq!(coach.raw_reps(ExerciseKind::HammerCurl), 2);
        assert_eq!(coach.score_log().len(), 1);
    }

    #[test]
    fn test_feedback_order_and_highlights() {
        let mut coach = RepCoach::new(table(), Gender::Male);
        let mut bad = frame(100.0, 0.15);
        bad.statics.set(StaticJoint::KneeR, 190.0);
        let report = coach.process_measurements(&bad, 0.03);

        let texts: Vec<&str> = report.feedback.iter().map(|l| l.text.as_str()).collect();
        let wrist = texts.iter().position(|t| t.starts_with("Wrist Distance")).unwrap();
        assert!(texts[wrist + 1].starts_with("Right Elbow"));
        assert!(texts.last().unwrap().starts_with("Convex Hull"));
        assert!(!report.feedback[0].ok);

        // Knee over tolerance plus both elbows outside every band
        assert_eq!(
            report.highlighted,
            vec![LEFT_ELBOW, RIGHT_ELBOW, RIGHT_KNEE]
        );
    }

    #[test]
    fn test_reset_summary_keeps_counts() {
        let mut coach = RepCoach::new(table(), Gender::Male);
        curl(&mut coach);
        assert!(!coach.session_summary().is_empty());

        coach.reset_summary();
        assert!(coach.session_summary().is_empty());
        assert!(coach.last_summary().is_none());
        assert_eq!(coach.raw_reps(ExerciseKind::HammerCurl), 1);

        coach.reset();
        assert_eq!(coach.raw_reps(ExerciseKind::HammerCurl), 0);
        assert_eq!(coach.current_exercise(), ExerciseKind::Unknown);
    }

    #[test]
    fn test_unknown_exercise_is_not_counted() {
        let mut coach = RepCoach::new(table(), Gender::Male);
        let mut raised = frame(170.0, 0.15);
        raised.dynamic.shoulder_r = 50.0;
        raised.dynamic.shoulder_l = 50.0;
        let report = coach.process_measurements(&raised, 0.03);

        assert_eq!(report.exercise, ExerciseKind::Unknown);
        assert_eq!(report.stage_right, None);
        assert_eq!(report.raw_reps, 0);
        assert!(report.highlighted.is_empty());
    }

    #[test]
    fn test_process_landmarks() {
        let mut coach = RepCoach::new(table(), Gender::Male);
        assert!(coach.process_landmarks(&[Landmark::default(); 5], 0.03).is_none());

        let pose = standing_pose();
        let report = coach.process_landmarks(&pose, 0.03).unwrap();
        assert!(report.feedback.iter().any(|l| l.text.starts_with("Convex Hull")));
    }
}
