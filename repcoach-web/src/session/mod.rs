//! Session module - score log and end-of-session summary
//!
//! Re-exports only. All logic in submodules.

mod score_log;
mod summary;

pub use score_log::{ScoredRep, SessionScoreLog};
pub use summary::{ExerciseSummary, MetricAverage, SessionSummary, IMPROVEMENT_THRESHOLD};
