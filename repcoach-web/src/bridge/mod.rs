//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod console;
mod landmarks;
mod web_coach;

pub use console::init_logging;
pub use web_coach::WebCoach;
