//! JS-facing wrapper around [`RepCoach`]
//!
//! One instance per video source. JavaScript pushes a landmark buffer per
//! frame, then reads whatever it needs to draw through the getters.

use wasm_bindgen::prelude::*;

use crate::coach::{FrameReport, RepCoach};
use crate::thresholds::{ExerciseKind, Gender};

use super::landmarks::parse_landmarks;

#[wasm_bindgen]
pub struct WebCoach {
    coach: RepCoach,
    last_report: Option<FrameReport>,
}

#[wasm_bindgen]
impl WebCoach {
    /// Create a coach from the reference JSON
    ///
    /// `gender` is `"male"` or `"female"`.
    #[wasm_bindgen(constructor)]
    pub fn new(thresholds_json: &str, gender: &str) -> Result<WebCoach, JsValue> {
        let gender = Gender::parse(gender).map_err(to_js)?;
        let coach = RepCoach::from_json(thresholds_json, gender).map_err(to_js)?;
        Ok(Self { coach, last_report: None })
    }

    /// Feed one frame of 99 floats (33 × x, y, z)
    ///
    /// Returns `false` when the buffer was rejected.
    #[wasm_bindgen(js_name = "processFrame")]
    pub fn process_frame(&mut self, data: &[f32], frame_secs: f32) -> bool {
        let Some(landmarks) = parse_landmarks(data) else {
            return false;
        };
        self.last_report = self.coach.process_landmarks(&landmarks, frame_secs);
        self.last_report.is_some()
    }

    /// Current exercise name, e.g. `"hammer_curl"`
    #[wasm_bindgen(getter)]
    pub fn exercise(&self) -> String {
        self.coach.current_exercise().as_str().to_string()
    }

    #[wasm_bindgen(getter, js_name = "stageRight")]
    pub fn stage_right(&self) -> Option<String> {
        let stage = self.last_report.as_ref()?.stage_right?;
        Some(stage.as_str().to_string())
    }

    #[wasm_bindgen(getter, js_name = "stageLeft")]
    pub fn stage_left(&self) -> Option<String> {
        let stage = self.last_report.as_ref()?.stage_left?;
        Some(stage.as_str().to_string())
    }

    /// True on the frame a posture-validated repetition finished
    #[wasm_bindgen(getter, js_name = "strictCompleted")]
    pub fn strict_completed(&self) -> bool {
        self.last_report.as_ref().map_or(false, |r| r.strict_completed)
    }

    #[wasm_bindgen(js_name = "rawReps")]
    pub fn raw_reps(&self, exercise: &str) -> u32 {
        exercise_by_name(exercise).map_or(0, |kind| self.coach.raw_reps(kind))
    }

    #[wasm_bindgen(js_name = "correctedReps")]
    pub fn corrected_reps(&self, exercise: &str) -> u32 {
        exercise_by_name(exercise).map_or(0, |kind| self.coach.corrected_reps(kind))
    }

    /// `[{ "text": ..., "ok": ... }, ...]` for the last frame
    #[wasm_bindgen(js_name = "feedbackJson")]
    pub fn feedback_json(&self) -> Result<String, JsValue> {
        let feedback = self.last_report.as_ref().map(|r| r.feedback.as_slice()).unwrap_or(&[]);
        serde_json::to_string(feedback).map_err(to_js)
    }

    /// Landmark indices to highlight on the last frame
    #[wasm_bindgen(getter)]
    pub fn highlighted(&self) -> Vec<u32> {
        self.last_report
            .as_ref()
            .map(|r| r.highlighted.iter().map(|&idx| idx as u32).collect())
            .unwrap_or_default()
    }

    /// Scores of the most recent repetition, `"null"` before the first
    #[wasm_bindgen(js_name = "lastSummaryJson")]
    pub fn last_summary_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.coach.last_summary()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = "sessionSummaryJson")]
    pub fn session_summary_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.coach.session_summary()).map_err(to_js)
    }

    /// Plain-text session report
    #[wasm_bindgen(js_name = "sessionSummaryText")]
    pub fn session_summary_text(&self) -> String {
        self.coach.session_summary().to_string()
    }

    #[wasm_bindgen(js_name = "setGender")]
    pub fn set_gender(&mut self, gender: &str) -> Result<(), JsValue> {
        self.coach.set_gender(Gender::parse(gender).map_err(to_js)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = "resetSummary")]
    pub fn reset_summary(&mut self) {
        self.coach.reset_summary();
    }

    pub fn reset(&mut self) {
        self.coach.reset();
        self.last_report = None;
    }
}

fn exercise_by_name(name: &str) -> Option<ExerciseKind> {
    ExerciseKind::TRACKED.into_iter().find(|kind| kind.as_str() == name)
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
