//! Counter module - repetition state machine and per-rep sample buffer
//!
//! Re-exports only. All logic in submodules.

mod accumulator;
mod machine;
mod stage;

pub use accumulator::{RepetitionAccumulator, StageSamples};
pub use machine::{FrameOutcome, RepSummary, RepetitionCounter};
pub use stage::{combine_side, detect_stage, HullPhase, Phase, SideTracker};
