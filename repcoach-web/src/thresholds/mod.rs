//! Thresholds module - reference ranges per exercise and gender
//!
//! Re-exports only. Loaded once from JSON, read-only afterwards.

mod error;
mod labels;
mod range;
mod schema;

pub use error::ThresholdError;
pub use labels::{DynamicJoint, ExerciseKind, Gender, JointKind, Stage, StaticJoint};
pub use range::{in_range, Range};
pub use schema::{
    DetectionThresholds, DynamicAngleThresholds, ExerciseThresholds, GenderThresholds,
    GlobalConfig, HullThresholds, ThresholdTable,
};
