//! Typed labels shared by the configuration and the counter
//!
//! Exercise, gender, joint and stage names as they appear in the threshold
//! JSON and in score keys.

use serde::{Deserialize, Serialize};

use super::ThresholdError;

/// Exercise the classifier can recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    HammerCurl,
    OverheadPress,
    Unknown,
}

impl ExerciseKind {
    /// Exercises that have threshold tables and rep counters
    pub const TRACKED: [ExerciseKind; 2] = [ExerciseKind::HammerCurl, ExerciseKind::OverheadPress];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::HammerCurl => "hammer_curl",
            ExerciseKind::OverheadPress => "overhead_press",
            ExerciseKind::Unknown => "unknown",
        }
    }

    /// Human readable name for reports
    pub fn title(&self) -> &'static str {
        match self {
            ExerciseKind::HammerCurl => "Hammer Curl",
            ExerciseKind::OverheadPress => "Overhead Press",
            ExerciseKind::Unknown => "Unknown",
        }
    }

    pub fn is_tracked(&self) -> bool {
        *self != ExerciseKind::Unknown
    }

    /// Dynamic joints whose range of motion is scored for this exercise.
    ///
    /// Hammer curls keep the upper arm still, so only elbows are scored.
    pub fn scored_joints(&self) -> &'static [DynamicJoint] {
        match self {
            ExerciseKind::HammerCurl => &[DynamicJoint::ElbowR, DynamicJoint::ElbowL],
            ExerciseKind::OverheadPress => &DynamicJoint::ALL,
            ExerciseKind::Unknown => &[],
        }
    }

    /// Whether the shoulder counts as a static joint for this exercise
    pub fn shoulder_is_static(&self) -> bool {
        *self == ExerciseKind::HammerCurl
    }
}

/// Selects the per-gender reference block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(name: &str) -> Result<Self, ThresholdError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ThresholdError::UnknownGender(name.to_string())),
        }
    }
}

/// Coarse posture stage of a limb or of the whole body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Up,
    Down,
}

impl Stage {
    pub const ALL: [Stage; 2] = [Stage::Up, Stage::Down];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Up => "up",
            Stage::Down => "down",
        }
    }
}

/// Which limb segment a dynamic joint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    Elbow,
    Shoulder,
}

/// Joints expected to cycle through the movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DynamicJoint {
    ElbowR,
    ElbowL,
    ShoulderR,
    ShoulderL,
}

impl DynamicJoint {
    /// Fixed input order: right elbow, left elbow, right shoulder, left shoulder
    pub const ALL: [DynamicJoint; 4] = [
        DynamicJoint::ElbowR,
        DynamicJoint::ElbowL,
        DynamicJoint::ShoulderR,
        DynamicJoint::ShoulderL,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DynamicJoint::ElbowR => "elbow_r",
            DynamicJoint::ElbowL => "elbow_l",
            DynamicJoint::ShoulderR => "shoulder_r",
            DynamicJoint::ShoulderL => "shoulder_l",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DynamicJoint::ElbowR => "Right Elbow",
            DynamicJoint::ElbowL => "Left Elbow",
            DynamicJoint::ShoulderR => "Right Shoulder",
            DynamicJoint::ShoulderL => "Left Shoulder",
        }
    }

    pub fn kind(&self) -> JointKind {
        match self {
            DynamicJoint::ElbowR | DynamicJoint::ElbowL => JointKind::Elbow,
            DynamicJoint::ShoulderR | DynamicJoint::ShoulderL => JointKind::Shoulder,
        }
    }

    /// Score key for one stage of this joint, e.g. `elbow_r_up`
    pub fn score_key(&self, stage: Stage) -> String {
        format!("{}_{}", self.as_str(), stage.as_str())
    }
}

/// Joints expected to hold a fixed angle during the exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticJoint {
    KneeR,
    KneeL,
    HipR,
    HipL,
    ShoulderR,
    ShoulderL,
}

impl StaticJoint {
    pub const COUNT: usize = 6;

    pub const ALL: [StaticJoint; Self::COUNT] = [
        StaticJoint::KneeR,
        StaticJoint::KneeL,
        StaticJoint::HipR,
        StaticJoint::HipL,
        StaticJoint::ShoulderR,
        StaticJoint::ShoulderL,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StaticJoint::KneeR => "knee_r",
            StaticJoint::KneeL => "knee_l",
            StaticJoint::HipR => "hip_r",
            StaticJoint::HipL => "hip_l",
            StaticJoint::ShoulderR => "shoulder_r",
            StaticJoint::ShoulderL => "shoulder_l",
        }
    }

    pub fn is_shoulder(&self) -> bool {
        matches!(self, StaticJoint::ShoulderR | StaticJoint::ShoulderL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("male").unwrap(), Gender::Male);
        assert_eq!(Gender::parse(" Female ").unwrap(), Gender::Female);
        assert!(Gender::parse("other").is_err());
    }

    #[test]
    fn test_score_key() {
        assert_eq!(DynamicJoint::ElbowR.score_key(Stage::Up), "elbow_r_up");
        assert_eq!(DynamicJoint::ShoulderL.score_key(Stage::Down), "shoulder_l_down");
    }

    #[test]
    fn test_static_joint_index_matches_order() {
        for (i, joint) in StaticJoint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
    }

    #[test]
    fn test_exercise_serde_names() {
        let kind: ExerciseKind = serde_json::from_str("\"overhead_press\"").unwrap();
        assert_eq!(kind, ExerciseKind::OverheadPress);
        assert_eq!(kind.as_str(), "overhead_press");
    }
}
