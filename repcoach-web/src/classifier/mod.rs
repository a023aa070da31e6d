//! Classifier module - exercise recognition from shoulder posture
//!
//! Rust keeps a short rolling history per joint and picks the exercise
//! whose static-posture range contains the smoothed shoulder angles.

mod buffer;
mod exercise;

pub use buffer::{AngleWindow, HISTORY_SIZE};
pub use exercise::ExerciseClassifier;
