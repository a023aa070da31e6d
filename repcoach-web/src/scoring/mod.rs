//! Scoring module - repetition form scores and live feedback
//!
//! Re-exports only. All logic in submodules.

mod containment;
mod feedback;
mod repetition;

pub use containment::{containment_score, dynamic_angle_score, samples_containment};
pub use feedback::{
    check_static_angles, classify_stage_by_proximity, dynamic_angle_violations,
    dynamic_feedback_lines, generate_feedback, is_problem_text, problem_landmarks, FeedbackLine,
    StaticCheck,
};
pub use repetition::{score_repetition, RepetitionScore};
