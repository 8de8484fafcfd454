//! Exercise module - per-exercise profiles and the motion trackers they drive
//!
//! Re-exports only. All logic in submodules.

mod profile;
mod cycle;
mod hold;
mod trace;

pub use profile::{
    ExerciseKind, ExerciseProfile, JointMeasure, Motion, Bound,
    CycleThresholds, HoldThresholds, PhaseLabels,
    SQUAT, SHOULDER_PRESS, PLANK,
    SQUAT_STANDING_THRESHOLD, SQUAT_DEPTH_THRESHOLD,
    PRESS_LOADED_THRESHOLD, PRESS_EXTENDED_THRESHOLD, PRESS_LOWERED_THRESHOLD,
    PLANK_LINE_ENTER, PLANK_LINE_EXIT,
};
pub use cycle::{RepCycle, CyclePhase, CycleStep, CycleOutcome};
pub use hold::{HoldTimer, HoldStep, MAX_FRAME_GAP_MS};
pub use trace::{CycleTrace, CycleSample, CycleMetrics, rule_feedback, TRACE_CAPACITY, MIN_TRACE_SAMPLES};
