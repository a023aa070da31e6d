//! Geometry module - angles, torso normalization, silhouette area
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod hull;
mod landmarks;
mod measure;
mod normalize;

pub use angles::{calculate_angle, distance};
pub use hull::{convex_hull, convex_hull_area};
pub use landmarks::{
    Landmark, LANDMARK_COUNT,
    LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_ELBOW, RIGHT_ELBOW, LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP, LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE,
};
pub use measure::{measure_frame, DynamicAngles, FrameMeasurements, StaticAngles};
pub(crate) use normalize::normalize_by_least_squares;

#[cfg(test)]
pub(crate) use measure::tests::standing_pose;
