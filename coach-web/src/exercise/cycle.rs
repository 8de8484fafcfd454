//! Rep cycle state machine
//!
//! One algorithm for every rep exercise, driven by `CycleThresholds`:
//!
//! - Rest → Working when the angle crosses `enter`
//! - Working tracks the extremum (running min or max). The first time it
//!   passes `depth` a capture is requested. Once the depth is reached and the
//!   angle has retreated by `rebound`, the cycle turns to Returning. Crossing
//!   `abort` before reaching depth discards the rep.
//! - Returning → completion when the angle crosses `finish`
//!
//! Entry and exit thresholds differ by 10-20°, so detector jitter near one
//! boundary cannot flap the state.

use super::profile::{Bound, CycleThresholds};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CyclePhase {
    /// Standing / ready
    #[default]
    Rest,
    /// Descending / down, heading for the extremum
    Working,
    /// Rising / up, heading back
    Returning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// One full repetition
    Completed,
    /// Went back to rest without reaching depth
    Aborted,
}

/// What one frame did to the cycle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CycleStep {
    pub transition: Option<(CyclePhase, CyclePhase)>,
    /// Capture the current frame now
    pub capture: bool,
    pub outcome: Option<CycleOutcome>,
}

/// Per-session cycle tracker for one exercise
pub struct RepCycle {
    thresholds: CycleThresholds,
    phase: CyclePhase,
    /// Running min (or max) angle of the current working phase
    extremum: f32,
    /// A capture was already requested this cycle
    captured: bool,
}

impl RepCycle {
    pub fn new(thresholds: CycleThresholds) -> Self {
        Self {
            thresholds,
            phase: CyclePhase::Rest,
            extremum: neutral_extremum(thresholds.depth),
            captured: false,
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn extremum(&self) -> f32 {
        self.extremum
    }

    pub fn depth_reached(&self) -> bool {
        self.thresholds.depth.crossed(self.extremum)
    }

    /// Advance the cycle with one frame's angle
    pub fn step(&mut self, angle: f32) -> CycleStep {
        let t = self.thresholds;
        let mut step = CycleStep::default();

        match self.phase {
            CyclePhase::Rest => {
                if t.enter.crossed(angle) {
                    self.begin_working(angle);
                    step.transition = Some((CyclePhase::Rest, CyclePhase::Working));
                }
            }
            CyclePhase::Working => {
                self.track(angle);

                if !self.captured && self.depth_reached() {
                    self.captured = true;
                    step.capture = true;
                }

                if self.depth_reached() {
                    if self.rebounded(angle) {
                        self.phase = CyclePhase::Returning;
                        step.transition = Some((CyclePhase::Working, CyclePhase::Returning));
                    }
                } else if t.abort.is_some_and(|abort| abort.crossed(angle)) {
                    self.reset();
                    step.transition = Some((CyclePhase::Working, CyclePhase::Rest));
                    step.outcome = Some(CycleOutcome::Aborted);
                }
            }
            CyclePhase::Returning => {
                if t.finish.crossed(angle) {
                    match t.after_completion {
                        CyclePhase::Working => self.begin_working(angle),
                        _ => self.reset(),
                    }
                    step.transition = Some((CyclePhase::Returning, self.phase));
                    step.outcome = Some(CycleOutcome::Completed);
                }
            }
        }

        step
    }

    /// Back to rest, dropping extremum and capture bookkeeping
    pub fn reset(&mut self) {
        self.phase = CyclePhase::Rest;
        self.extremum = neutral_extremum(self.thresholds.depth);
        self.captured = false;
    }

    fn begin_working(&mut self, angle: f32) {
        self.phase = CyclePhase::Working;
        self.extremum = angle;
        self.captured = false;
    }

    fn track(&mut self, angle: f32) {
        self.extremum = match self.thresholds.depth {
            Bound::Below(_) => self.extremum.min(angle),
            Bound::Above(_) => self.extremum.max(angle),
        };
    }

    fn rebounded(&self, angle: f32) -> bool {
        let Some(rebound) = self.thresholds.rebound else {
            return true;
        };
        let retreat = match self.thresholds.depth {
            Bound::Below(_) => angle - self.extremum,
            Bound::Above(_) => self.extremum - angle,
        };
        retreat > rebound
    }
}

/// Extremum value before any working frame: fully extended for a min
/// tracker, fully flexed for a max tracker
fn neutral_extremum(depth: Bound) -> f32 {
    match depth {
        Bound::Below(_) => 180.0,
        Bound::Above(_) => 0.0,
    }
}
