//! Live per-frame feedback
//!
//! Human-readable lines with a pass/fail flag (rendered green/red by the
//! UI), plus the landmark indices worth highlighting on the skeleton.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::geometry::{
    DynamicAngles, FrameMeasurements, StaticAngles, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER,
    RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER,
};
use crate::thresholds::{
    DynamicAngleThresholds, DynamicJoint, ExerciseKind, GenderThresholds, Range, StaticJoint,
};

/// Markers that always render a line as failing
const FAIL_MARKERS: [&str; 2] = ["ADJUST", "REMAIN"];

/// Wrist band assumed when the reference block has none
const DEFAULT_WRIST_RANGE: Range = Range::new(0.0, 1.0);

/// One feedback line and whether it passes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackLine {
    pub text: String,
    pub ok: bool,
}

impl FeedbackLine {
    /// Line whose status is derived from its wording
    pub fn from_text(text: String) -> Self {
        let ok = !is_problem_text(&text);
        Self { text, ok }
    }

    /// Line with an explicit status; problem wording still forces a fail
    pub fn with_status(text: String, ok: bool) -> Self {
        let ok = ok && !is_problem_text(&text);
        Self { text, ok }
    }
}

/// Whether a line reports a problem
pub fn is_problem_text(text: &str) -> bool {
    FAIL_MARKERS.iter().any(|marker| text.contains(marker)) || text.to_lowercase().contains("outside")
}

/// Result of checking one static joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCheck {
    pub joint: StaticJoint,
    pub ok: bool,
    pub current: f32,
    pub reference: f32,
}

/// Check measured static joints against their reference angle
///
/// A joint passes inside `[ref, ref + tolerance]`, the same interval the
/// repetition score uses. Joints without a measurement are skipped.
pub fn check_static_angles(
    current: &StaticAngles,
    reference: &BTreeMap<StaticJoint, f32>,
    tolerance: f32,
) -> Vec<StaticCheck> {
    reference
        .iter()
        .filter_map(|(&joint, &ref_angle)| {
            let cur = current.get(joint)?;
            Some(StaticCheck {
                joint,
                ok: ref_angle <= cur && cur <= ref_angle + tolerance,
                current: cur,
                reference: ref_angle,
            })
        })
        .collect()
}

/// Posture feedback: static joints, wrist spacing, silhouette area
pub fn generate_feedback(
    exercise: ExerciseKind,
    reference: Option<&GenderThresholds>,
    frame: &FrameMeasurements,
    tolerance: f32,
) -> Vec<FeedbackLine> {
    let mut lines = Vec::new();

    if let Some(reference) = reference {
        for check in check_static_angles(&frame.statics, &reference.static_angles, tolerance) {
            lines.push(FeedbackLine::from_text(format!(
                "{}: {:.1}deg (ref: {:.1}) {}",
                check.joint.as_str(),
                check.current,
                check.reference,
                if check.ok { "OK" } else { "REMAIN STATIONARY" }
            )));
        }

        if exercise.is_tracked() {
            let band = reference.wrist_distance.unwrap_or(DEFAULT_WRIST_RANGE);
            let ok = band.contains(frame.wrist_distance);
            lines.push(FeedbackLine::from_text(format!(
                "Wrist Distance: {:.3} in range {}",
                frame.wrist_distance,
                if ok { "OK" } else { "ADJUST WRIST" }
            )));
        }
    }

    lines.push(hull_feedback(reference, frame.hull_area));
    lines
}

/// Compare the hull area with whichever band centre is nearer
fn hull_feedback(reference: Option<&GenderThresholds>, area: f32) -> FeedbackLine {
    let Some(reference) = reference.filter(|r| !r.convex_hull.is_empty()) else {
        return FeedbackLine::with_status(format!("Convex Hull: {:.6} - No thresholds set", area), false);
    };

    let (Some(up), Some(down)) = (reference.convex_hull.up, reference.convex_hull.down) else {
        return FeedbackLine::with_status(format!("Convex Hull: {:.6} - Thresholds missing", area), false);
    };

    let (label, band) = if (area - up.center()).abs() < (area - down.center()).abs() {
        ("up", up)
    } else {
        ("down", down)
    };
    let ok = band.contains(area);
    FeedbackLine::with_status(
        format!(
            "Convex Hull (~{}): {:.6} in range [{}, {}] {}",
            label,
            area,
            band.low,
            band.high,
            if ok { "OK" } else { "ADJUST DISTANCE" }
        ),
        ok,
    )
}

/// `"up"` or `"down"`, whichever band centre is nearer
pub fn classify_stage_by_proximity(angle: f32, up: Range, down: Range) -> &'static str {
    if (angle - up.center()).abs() < (angle - down.center()).abs() {
        "up"
    } else {
        "down"
    }
}

/// One line per scored dynamic joint, e.g. `Right Elbow: 45.0deg ~ UP`
///
/// The line passes when the angle sits in either the up or the down band.
pub fn dynamic_feedback_lines(
    exercise: ExerciseKind,
    angles: &DynamicAngles,
    dynamic: Option<&DynamicAngleThresholds>,
) -> Vec<FeedbackLine> {
    let Some(dynamic) = dynamic else {
        return Vec::new();
    };

    exercise
        .scored_joints()
        .iter()
        .map(|&joint| {
            let angle = angles.get(joint);
            let (up, down) = dynamic.bands(joint.kind());
            let approx = classify_stage_by_proximity(angle, up, down);
            FeedbackLine::with_status(
                format!("{}: {:.1}deg ~ {}", joint.label(), angle, approx.to_uppercase()),
                up.contains(angle) || down.contains(angle),
            )
        })
        .collect()
}

fn dynamic_landmark(joint: DynamicJoint) -> usize {
    match joint {
        DynamicJoint::ElbowR => RIGHT_ELBOW,
        DynamicJoint::ElbowL => LEFT_ELBOW,
        DynamicJoint::ShoulderR => RIGHT_SHOULDER,
        DynamicJoint::ShoulderL => LEFT_SHOULDER,
    }
}

fn static_landmark(joint: StaticJoint) -> usize {
    match joint {
        StaticJoint::KneeR => RIGHT_KNEE,
        StaticJoint::KneeL => LEFT_KNEE,
        StaticJoint::HipR => RIGHT_HIP,
        StaticJoint::HipL => LEFT_HIP,
        StaticJoint::ShoulderR => RIGHT_SHOULDER,
        StaticJoint::ShoulderL => LEFT_SHOULDER,
    }
}

/// Landmarks of elbows/shoulders whose angle is in neither band
pub fn dynamic_angle_violations(
    exercise: ExerciseKind,
    angles: &DynamicAngles,
    dynamic: Option<&DynamicAngleThresholds>,
) -> Vec<usize> {
    let Some(dynamic) = dynamic.filter(|_| exercise.is_tracked()) else {
        return Vec::new();
    };

    DynamicJoint::ALL
        .iter()
        .filter(|&&joint| {
            let angle = angles.get(joint);
            let (up, down) = dynamic.bands(joint.kind());
            !up.contains(angle) && !down.contains(angle)
        })
        .map(|&joint| dynamic_landmark(joint))
        .collect()
}

/// Landmarks of static joints failing their check
///
/// Shoulders are only highlighted for exercises that hold them still.
pub fn problem_landmarks(exercise: ExerciseKind, checks: &[StaticCheck]) -> Vec<usize> {
    if !exercise.is_tracked() {
        return Vec::new();
    }

    let mut indices: Vec<usize> = checks
        .iter()
        .filter(|check| !check.ok)
        .filter(|check| !check.joint.is_shoulder() || exercise.shoulder_is_static())
        .map(|check| static_landmark(check.joint))
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}
