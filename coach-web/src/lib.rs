//! Rep Coach Web - browser exercise coaching from pose landmarks
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! The coaching core (`pose`, `exercise`, `coach`) has no browser
//! dependencies and runs natively, which is how it is tested.

mod bridge;
pub mod coach;
pub mod config;
pub mod error;
pub mod exercise;
pub mod pose;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    init_coach,
    start_session,
    stop_session,
    set_exercise,
    process_landmarks,
    set_speech_enabled,
    get_status,
    get_status_code,
    get_feedback,
    get_rep_count,
    get_phase,
    get_angle,
    is_analyzing,
};

pub use coach::CoachSession;
pub use config::CoachConfig;
pub use error::{CoachError, Result};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_hooks() {
    console_error_panic_hook::set_once();
    bridge::init_logging();
    log::info!("rep coach loaded");
}
