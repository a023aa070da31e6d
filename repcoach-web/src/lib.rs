//! RepCoach Web - Exercise Repetition Evaluator
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

mod bridge;
pub mod classifier;
pub mod coach;
pub mod counter;
pub mod geometry;
pub mod scoring;
pub mod session;
pub mod thresholds;

use wasm_bindgen::prelude::*;

// Re-export the JS-facing API
pub use bridge::WebCoach;
pub use coach::{FrameReport, RepCoach};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    bridge::init_logging();
    log::info!("RepCoach WASM module loaded");
}
