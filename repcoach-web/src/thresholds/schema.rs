//! Threshold table schema
//!
//! Mirrors the reference JSON:
//!
//! ```json
//! {
//!   "hammer_curl": {
//!     "detection": { "shoulder_static": [0, 25] },
//!     "dynamic_angles": { "elbow_up": [30, 60], "elbow_down": [160, 180], ... },
//!     "male": {
//!       "static_angles": { "knee_r": 170, "hip_r": 170, ... },
//!       "wrist_distance": [0.2, 0.6],
//!       "convex_hull": { "up": [0.25, 0.4], "down": [0.1, 0.2] }
//!     }
//!   },
//!   "global_config": { "static_angle_tolerance": 12, ... }
//! }
//! ```
//!
//! Validated once in [`ThresholdTable::from_json`], never mutated afterwards.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Deserializer, Serialize};

use super::{DynamicJoint, ExerciseKind, Gender, JointKind, Range, Stage, StaticJoint, ThresholdError};

/// Complete reference configuration for all exercises
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub hammer_curl: Option<ExerciseThresholds>,
    pub overhead_press: Option<ExerciseThresholds>,
    #[serde(default)]
    pub global_config: GlobalConfig,
}

impl ThresholdTable {
    /// Parse and validate a threshold table
    pub fn from_json(json: &str) -> Result<Self, ThresholdError> {
        let table: ThresholdTable = serde_json::from_str(json)?;
        table.validate()?;

        let configured: Vec<&str> = ExerciseKind::TRACKED
            .iter()
            .filter(|kind| table.exercise(**kind).is_some())
            .map(|kind| kind.as_str())
            .collect();
        info!("Threshold table loaded: exercises={:?}", configured);

        Ok(table)
    }

    pub fn exercise(&self, kind: ExerciseKind) -> Option<&ExerciseThresholds> {
        match kind {
            ExerciseKind::HammerCurl => self.hammer_curl.as_ref(),
            ExerciseKind::OverheadPress => self.overhead_press.as_ref(),
            ExerciseKind::Unknown => None,
        }
    }

    /// Dynamic-angle bands for an exercise, `None` means "do not count"
    pub fn dynamic(&self, kind: ExerciseKind) -> Option<&DynamicAngleThresholds> {
        self.exercise(kind)?.dynamic_angles.as_ref()
    }

    /// Gender reference block, `None` when absent or empty
    pub fn gender(&self, kind: ExerciseKind, gender: Gender) -> Option<&GenderThresholds> {
        self.exercise(kind)?.for_gender(gender)
    }

    fn validate(&self) -> Result<(), ThresholdError> {
        for kind in ExerciseKind::TRACKED {
            if let Some(exercise) = self.exercise(kind) {
                exercise.validate(kind.as_str())?;
            }
        }
        self.global_config.validate()
    }
}

/// Thresholds for one exercise
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseThresholds {
    #[serde(default)]
    pub detection: DetectionThresholds,
    /// `{}` reads as absent, which disables counting for the exercise
    #[serde(default, deserialize_with = "empty_block_as_none")]
    pub dynamic_angles: Option<DynamicAngleThresholds>,
    pub male: Option<GenderThresholds>,
    pub female: Option<GenderThresholds>,
}

impl ExerciseThresholds {
    pub fn for_gender(&self, gender: Gender) -> Option<&GenderThresholds> {
        let block = match gender {
            Gender::Male => self.male.as_ref(),
            Gender::Female => self.female.as_ref(),
        };
        block.filter(|thresholds| !thresholds.is_empty())
    }

    fn validate(&self, path: &str) -> Result<(), ThresholdError> {
        self.detection.validate(&format!("{}.detection", path))?;
        if let Some(dynamic) = &self.dynamic_angles {
            dynamic.validate(&format!("{}.dynamic_angles", path))?;
        }
        for gender in [Gender::Male, Gender::Female] {
            let block = match gender {
                Gender::Male => &self.male,
                Gender::Female => &self.female,
            };
            if let Some(block) = block {
                block.validate(&format!("{}.{}", path, gender.as_str()))?;
            }
        }
        Ok(())
    }
}

fn empty_block_as_none<'de, D>(deserializer: D) -> Result<Option<DynamicAngleThresholds>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => DynamicAngleThresholds::deserialize(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Static-posture ranges used by the exercise classifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionThresholds {
    pub shoulder_static: Option<Range>,
    pub shoulder_down: Option<Range>,
    pub shoulder_up: Option<Range>,
}

impl DetectionThresholds {
    fn validate(&self, path: &str) -> Result<(), ThresholdError> {
        check_range(path, "shoulder_static", self.shoulder_static)?;
        check_range(path, "shoulder_down", self.shoulder_down)?;
        check_range(path, "shoulder_up", self.shoulder_up)
    }
}

/// Up/down bands for elbow and shoulder angles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicAngleThresholds {
    pub elbow_up: Range,
    pub elbow_down: Range,
    pub shoulder_up: Range,
    pub shoulder_down: Range,
}

impl DynamicAngleThresholds {
    /// `(up, down)` bands for a limb segment
    pub fn bands(&self, kind: JointKind) -> (Range, Range) {
        match kind {
            JointKind::Elbow => (self.elbow_up, self.elbow_down),
            JointKind::Shoulder => (self.shoulder_up, self.shoulder_down),
        }
    }

    /// Reference band for one joint in one stage
    pub fn band(&self, joint: DynamicJoint, stage: Stage) -> Range {
        let (up, down) = self.bands(joint.kind());
        match stage {
            Stage::Up => up,
            Stage::Down => down,
        }
    }

    fn validate(&self, path: &str) -> Result<(), ThresholdError> {
        check_range(path, "elbow_up", Some(self.elbow_up))?;
        check_range(path, "elbow_down", Some(self.elbow_down))?;
        check_range(path, "shoulder_up", Some(self.shoulder_up))?;
        check_range(path, "shoulder_down", Some(self.shoulder_down))
    }
}

/// Per-gender reference data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenderThresholds {
    /// Reference angle per static joint, in degrees
    #[serde(default)]
    pub static_angles: BTreeMap<StaticJoint, f32>,
    pub wrist_distance: Option<Range>,
    #[serde(default)]
    pub convex_hull: HullThresholds,
}

impl GenderThresholds {
    pub fn is_empty(&self) -> bool {
        self.static_angles.is_empty() && self.wrist_distance.is_none() && self.convex_hull.is_empty()
    }

    fn validate(&self, path: &str) -> Result<(), ThresholdError> {
        for (joint, angle) in &self.static_angles {
            if !angle.is_finite() {
                return Err(ThresholdError::InvalidRange {
                    path: format!("{}.static_angles.{}", path, joint.as_str()),
                });
            }
        }
        check_range(path, "wrist_distance", self.wrist_distance)?;
        let hull_path = format!("{}.convex_hull", path);
        check_range(&hull_path, "up", self.convex_hull.up)?;
        check_range(&hull_path, "down", self.convex_hull.down)
    }
}

/// Body-silhouette area bands for the open (up) and closed (down) posture
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HullThresholds {
    pub up: Option<Range>,
    pub down: Option<Range>,
}

impl HullThresholds {
    pub fn for_stage(&self, stage: Stage) -> Option<Range> {
        match stage {
            Stage::Up => self.up,
            Stage::Down => self.down,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.up.is_none() && self.down.is_none()
    }
}

/// Tunables shared by every exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Degrees a static joint may exceed its reference angle
    #[serde(default = "default_static_angle_tolerance")]
    pub static_angle_tolerance: f32,
    /// Degrees of overshoot forgiven before dynamic-angle penalties start
    #[serde(default = "default_dynamic_angle_buffer")]
    pub dynamic_angle_buffer: f32,
    /// Consecutive unclassifiable frames before a side's stage is dropped
    #[serde(default = "default_bad_frame_tolerance")]
    pub bad_frame_tolerance: u32,
}

fn default_static_angle_tolerance() -> f32 {
    12.0
}

fn default_dynamic_angle_buffer() -> f32 {
    10.0
}

fn default_bad_frame_tolerance() -> u32 {
    5
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            static_angle_tolerance: default_static_angle_tolerance(),
            dynamic_angle_buffer: default_dynamic_angle_buffer(),
            bad_frame_tolerance: default_bad_frame_tolerance(),
        }
    }
}

impl GlobalConfig {
    fn validate(&self) -> Result<(), ThresholdError> {
        if !self.static_angle_tolerance.is_finite() || self.static_angle_tolerance < 0.0 {
            return Err(ThresholdError::InvalidTunable { name: "static_angle_tolerance" });
        }
        if !self.dynamic_angle_buffer.is_finite() || self.dynamic_angle_buffer < 0.0 {
            return Err(ThresholdError::InvalidTunable { name: "dynamic_angle_buffer" });
        }
        Ok(())
    }
}

fn check_range(path: &str, name: &str, range: Option<Range>) -> Result<(), ThresholdError> {
    match range {
        Some(range) if !range.is_valid() => Err(ThresholdError::InvalidRange {
            path: format!("{}.{}", path, name),
        }),
        _ => Ok(()),
    }
}
