//! Stage detection, debouncing and phase machines
//!
//! A repetition is the phase walk `idle → down_prep → up → done`. Each side
//! runs its own walk; the counter completes a repetition when both sides
//! reach `done`.

use crate::thresholds::{ExerciseKind, HullThresholds, Range, Stage};

/// Progress of one side through a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    DownPrep,
    Up,
    Done,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::DownPrep => "down_prep",
            Phase::Up => "up",
            Phase::Done => "done",
        }
    }

    /// Stage that moves this phase forward, `None` once done
    pub fn expected_stage(&self) -> Option<Stage> {
        match self {
            Phase::Idle => Some(Stage::Down),
            Phase::DownPrep => Some(Stage::Up),
            Phase::Up => Some(Stage::Down),
            Phase::Done => None,
        }
    }

    fn next(&self) -> Phase {
        match self {
            Phase::Idle => Phase::DownPrep,
            Phase::DownPrep => Phase::Up,
            Phase::Up | Phase::Done => Phase::Done,
        }
    }

    /// Advance when `stage` is the expected one; anything else is a no-op
    pub fn advance(self, stage: Option<Stage>) -> Phase {
        match self.expected_stage() {
            Some(expected) if stage == Some(expected) => self.next(),
            _ => self,
        }
    }

    /// Advance only when the hull phase agrees with the limb stage
    pub fn advance_with_hull(self, stage: Option<Stage>, hull: HullPhase) -> Phase {
        match self.expected_stage() {
            Some(expected) if stage == Some(expected) && hull.matches(expected) => self.next(),
            _ => self,
        }
    }
}

/// Open/closed posture latch driven by convex-hull area
///
/// Shared by both sides. Never returns to idle once it has seen `down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HullPhase {
    #[default]
    Idle,
    Down,
    Up,
}

impl HullPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            HullPhase::Idle => "idle",
            HullPhase::Down => "down",
            HullPhase::Up => "up",
        }
    }

    /// Latch `down` on any area in the down band; `up` only straight after
    /// `down`. A missing up band accepts any area.
    pub fn update(self, area: f32, bands: Option<&HullThresholds>) -> HullPhase {
        let Some(bands) = bands.filter(|b| !b.is_empty()) else {
            return self;
        };

        if bands.down.map_or(false, |down| down.contains(area)) {
            HullPhase::Down
        } else if self == HullPhase::Down && bands.up.map_or(true, |up| up.contains(area)) {
            HullPhase::Up
        } else {
            self
        }
    }

    pub fn matches(&self, stage: Stage) -> bool {
        matches!(
            (self, stage),
            (HullPhase::Down, Stage::Down) | (HullPhase::Up, Stage::Up)
        )
    }
}

/// Classify one angle; `down` wins when both bands contain it
pub fn detect_stage(angle: f32, up: Range, down: Range) -> Option<Stage> {
    if down.contains(angle) {
        Some(Stage::Down)
    } else if up.contains(angle) {
        Some(Stage::Up)
    } else {
        None
    }
}

/// Combine elbow and shoulder stages into the side's stage
///
/// Hammer curl: `up` if either joint is up, `down` only if both are down.
/// Overhead press: both joints must agree.
pub fn combine_side(exercise: ExerciseKind, elbow: Option<Stage>, shoulder: Option<Stage>) -> Option<Stage> {
    match exercise {
        ExerciseKind::HammerCurl => {
            if elbow == Some(Stage::Up) || shoulder == Some(Stage::Up) {
                Some(Stage::Up)
            } else if elbow == Some(Stage::Down) && shoulder == Some(Stage::Down) {
                Some(Stage::Down)
            } else {
                None
            }
        }
        ExerciseKind::OverheadPress => {
            if elbow == shoulder {
                elbow
            } else {
                None
            }
        }
        ExerciseKind::Unknown => None,
    }
}

/// Per-side committed stage with bad-frame debouncing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SideTracker {
    committed: Option<Stage>,
    bad_frames: u32,
}

impl SideTracker {
    pub fn committed(&self) -> Option<Stage> {
        self.committed
    }

    /// Commit a concrete stage, or hold the previous one for up to
    /// `tolerance - 1` unclassifiable frames
    pub fn update(&mut self, observed: Option<Stage>, tolerance: u32) {
        match observed {
            Some(stage) => {
                self.committed = Some(stage);
                self.bad_frames = 0;
            }
            None => {
                self.bad_frames = self.bad_frames.saturating_add(1);
                if self.bad_frames >= tolerance {
                    self.committed = None;
                }
            }
        }
    }
}
