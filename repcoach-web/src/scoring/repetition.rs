//! Form score for one completed repetition
//!
//! Four categories, each 0-100:
//! - Hull: silhouette area stayed inside the up/down bands
//! - Dynamic angles: range of motion per joint and stage
//! - Static angles: knees, hips (and shoulders for curls) held still
//! - Wrist distance: hands kept at the reference spacing

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::counter::RepetitionAccumulator;
use crate::thresholds::{
    DynamicAngleThresholds, ExerciseKind, GenderThresholds, GlobalConfig, Range, Stage, StaticJoint,
};

use super::containment::{containment_score, dynamic_angle_score, samples_containment};

/// Scores of one repetition, in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepetitionScore {
    pub hull_score: f32,
    /// Keyed `<joint>_<stage>`, e.g. `elbow_r_up`
    pub dynamic_angle_scores: BTreeMap<String, f32>,
    pub static_angle_scores: BTreeMap<StaticJoint, f32>,
    pub wrist_distance_score: f32,
}

impl RepetitionScore {
    pub const HULL: &'static str = "Hull Score";
    pub const DYNAMIC: &'static str = "Dynamic Angle Score";
    pub const STATIC: &'static str = "Static Angle Score";
    pub const WRIST: &'static str = "Wrist Distance Score";

    /// Mean of the per-joint dynamic scores, `None` if none were scored
    pub fn dynamic_average(&self) -> Option<f32> {
        mean(self.dynamic_angle_scores.values().copied())
    }

    /// Mean of the per-joint static scores, `None` if none were scored
    pub fn static_average(&self) -> Option<f32> {
        mean(self.static_angle_scores.values().copied())
    }
}

fn mean(values: impl Iterator<Item = f32>) -> Option<f32> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f32)
}

/// Score a completed repetition against the reference data
///
/// Categories without reference data or without samples score 0 (scalars)
/// or are left out (per-joint maps).
pub fn score_repetition(
    rep: &RepetitionAccumulator,
    reference: &GenderThresholds,
    dynamic: &DynamicAngleThresholds,
    exercise: ExerciseKind,
    config: &GlobalConfig,
) -> RepetitionScore {
    RepetitionScore {
        hull_score: hull_score(rep, reference) * 100.0,
        dynamic_angle_scores: dynamic_scores(rep, dynamic, exercise, config.dynamic_angle_buffer),
        static_angle_scores: static_scores(rep, reference, config.static_angle_tolerance),
        wrist_distance_score: samples_containment(rep.wrist_distance(), reference.wrist_distance) * 100.0,
    }
}

/// Mean containment over the stages that have both samples and a band
fn hull_score(rep: &RepetitionAccumulator, reference: &GenderThresholds) -> f32 {
    let scores: Vec<f32> = Stage::ALL
        .iter()
        .filter_map(|&stage| {
            let observed = Range::spanning(rep.hull_area().get(stage))?;
            let band = reference.convex_hull.for_stage(stage)?;
            Some(containment_score(observed, band))
        })
        .collect();
    mean(scores.into_iter()).unwrap_or(0.0)
}

fn dynamic_scores(
    rep: &RepetitionAccumulator,
    dynamic: &DynamicAngleThresholds,
    exercise: ExerciseKind,
    buffer: f32,
) -> BTreeMap<String, f32> {
    let mut scores = BTreeMap::new();
    for &joint in exercise.scored_joints() {
        for stage in Stage::ALL {
            if let Some(observed) = Range::spanning(rep.dynamic(joint).get(stage)) {
                let score = dynamic_angle_score(observed, dynamic.band(joint, stage), buffer);
                scores.insert(joint.score_key(stage), score * 100.0);
            }
        }
    }
    scores
}

/// Static joints are scored against the band `[ref, ref + tolerance]`
fn static_scores(
    rep: &RepetitionAccumulator,
    reference: &GenderThresholds,
    tolerance: f32,
) -> BTreeMap<StaticJoint, f32> {
    reference
        .static_angles
        .iter()
        .filter_map(|(&joint, &ref_angle)| {
            let observed = Range::spanning(rep.static_angles(joint))?;
            let band = Range::new(ref_angle, ref_angle + tolerance);
            Some((joint, containment_score(observed, band) * 100.0))
        })
        .collect()
}
