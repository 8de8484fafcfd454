//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod console;
mod canvas;
mod speech;
mod timer;
mod session;

pub use console::init_logging;

pub use session::{
    // WASM entry points
    init_coach,
    start_session,
    stop_session,
    set_exercise,
    process_landmarks,
    set_speech_enabled,
    // Polled by the UI
    get_status,
    get_status_code,
    get_feedback,
    get_rep_count,
    get_phase,
    get_angle,
    is_analyzing,
};
