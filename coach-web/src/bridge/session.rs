//! Session storage and JS bridge
//!
//! Holds the coaching session for the page. JavaScript pushes landmarks
//! every frame and polls status, feedback and rep count for display.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::coach::{analyze_within, analyzer_for, AnalysisJob, Analyzer, CoachSession};
use crate::error::{CoachError, Result};
use crate::exercise::ExerciseKind;
use crate::pose::landmarks_from_flat;
use super::canvas::CanvasFrameSource;
use super::speech;
use super::timer::sleep_ms;

/// Everything `init_coach` sets up
struct CoachRuntime {
    session: CoachSession,
    frames: CanvasFrameSource,
    analyzer: Rc<dyn Analyzer>,
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static RUNTIME: RefCell<Option<CoachRuntime>> = RefCell::new(None);
}

fn with_runtime<T>(f: impl FnOnce(&mut CoachRuntime) -> T) -> Result<T> {
    RUNTIME.with(|cell| {
        let mut runtime = cell.borrow_mut();
        runtime.as_mut().map(f).ok_or(CoachError::NotInitialized)
    })
}

/// Read from the session, falling back to `default` before init
fn read_session<T>(default: T, f: impl FnOnce(&CoachSession) -> T) -> T {
    RUNTIME.with(|cell| cell.borrow().as_ref().map(|rt| f(&rt.session)).unwrap_or(default))
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Create the session from a JSON config (empty string for defaults)
#[wasm_bindgen]
pub fn init_coach(config_json: &str) -> std::result::Result<(), JsValue> {
    let session = CoachSession::from_json(config_json)?;
    let config = session.config();
    let frames = CanvasFrameSource::new(config.capture_canvas_id.clone(), config.jpeg_quality);
    let analyzer: Rc<dyn Analyzer> = Rc::from(analyzer_for(config));
    match &config.analysis_endpoint {
        Some(endpoint) => log::info!("coach ready, analysis via {}", endpoint),
        None => log::info!("coach ready, local rule analysis"),
    }

    RUNTIME.with(|cell| {
        *cell.borrow_mut() = Some(CoachRuntime {
            session,
            frames,
            analyzer,
        });
    });
    Ok(())
}

#[wasm_bindgen]
pub fn start_session() -> std::result::Result<(), JsValue> {
    with_runtime(|rt| rt.session.start(js_sys::Date::now()))?;
    Ok(())
}

/// Stop the session and return its summary as JSON
#[wasm_bindgen]
pub fn stop_session() -> std::result::Result<String, JsValue> {
    let summary = with_runtime(|rt| rt.session.stop(js_sys::Date::now()))?;
    let json = serde_json::to_string(&summary).map_err(CoachError::Summary)?;
    Ok(json)
}

/// Select the exercise: "squat", "shoulder_press" or "plank"
#[wasm_bindgen]
pub fn set_exercise(exercise: &str) -> std::result::Result<(), JsValue> {
    let kind: ExerciseKind = exercise.parse()?;
    with_runtime(|rt| rt.session.set_exercise(kind))?;
    Ok(())
}

/// Called from JavaScript with a flat Float32Array per detector result:
/// 132 values (33 landmarks × x, y, z, visibility), 99 values (no
/// visibility), or empty when no person was detected.
#[wasm_bindgen]
pub fn process_landmarks(data: &[f32]) -> std::result::Result<(), JsValue> {
    let pose = landmarks_from_flat(data)?;
    let now = js_sys::Date::now();

    let pending = with_runtime(|rt| {
        let outcome = rt.session.process_frame(now, pose.as_deref(), &mut rt.frames);
        let timeout_ms = rt.session.config().analysis_timeout_ms;
        outcome.job.map(|job| (job, Rc::clone(&rt.analyzer), timeout_ms))
    })?;

    // Runtime borrow released before the analysis starts
    if let Some((job, analyzer, timeout_ms)) = pending {
        wasm_bindgen_futures::spawn_local(run_analysis(job, analyzer, timeout_ms));
    }
    Ok(())
}

#[wasm_bindgen]
pub fn set_speech_enabled(enabled: bool) -> std::result::Result<(), JsValue> {
    with_runtime(|rt| rt.session.set_speech_enabled(enabled))?;
    Ok(())
}

#[wasm_bindgen]
pub fn get_status() -> String {
    read_session(String::new(), |s| s.status().to_string())
}

/// Stable status identifier for styling
#[wasm_bindgen]
pub fn get_status_code() -> String {
    read_session(String::new(), |s| s.status().code().to_string())
}

/// Latest feedback line, empty when none yet
#[wasm_bindgen]
pub fn get_feedback() -> String {
    read_session(String::new(), |s| s.feedback().unwrap_or_default().to_string())
}

#[wasm_bindgen]
pub fn get_rep_count() -> u32 {
    read_session(0, |s| s.rep_count())
}

#[wasm_bindgen]
pub fn get_phase() -> String {
    read_session(String::new(), |s| s.phase_label().to_string())
}

/// Last measured joint angle in degrees, NaN when none
#[wasm_bindgen]
pub fn get_angle() -> f32 {
    read_session(f32::NAN, |s| s.last_angle().unwrap_or(f32::NAN))
}

#[wasm_bindgen]
pub fn is_analyzing() -> bool {
    read_session(false, |s| s.is_analyzing())
}

// ============================================================================
// ANALYSIS TASK
// ============================================================================

async fn run_analysis(job: AnalysisJob, analyzer: Rc<dyn Analyzer>, timeout_ms: u32) {
    let result = analyze_within(&*analyzer, &job, sleep_ms(timeout_ms), timeout_ms).await;

    let delivery = with_runtime(|rt| {
        let lang = rt.session.config().speech_lang.clone();
        rt.session
            .finish_analysis(job.ticket, result, js_sys::Date::now(), speech::is_speaking())
            .map(|delivery| (delivery, lang))
    });

    match delivery {
        Ok(Some((delivery, lang))) if delivery.speak => {
            if let Err(err) = speech::speak(&delivery.text, &lang) {
                log::warn!("could not speak feedback: {}", err);
            }
        }
        Ok(_) => {}
        Err(err) => log::warn!("analysis for rep {} settled without a session: {}", job.rep(), err),
    }
}
