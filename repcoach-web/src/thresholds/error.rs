//! Configuration errors

use thiserror::Error;

/// Errors raised while loading a threshold table.
///
/// Per-frame processing never returns these; they only surface at load time.
#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error("threshold JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid range at {path}: low must be <= high and both finite")]
    InvalidRange { path: String },

    #[error("invalid global tunable {name}: must be finite and non-negative")]
    InvalidTunable { name: &'static str },

    #[error("unknown gender {0:?} (expected \"male\" or \"female\")")]
    UnknownGender(String),
}
