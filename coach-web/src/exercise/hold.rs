//! Hold timer - timed static exercises (plank)
//!
//! Time only accumulates while the body line is held, and each hold is
//! timed on its own: breaking the line restarts the clock and the
//! checkpoint schedule. Enter and exit
//! thresholds differ, so a line hovering near one value does not toggle the
//! hold every frame.

use super::profile::HoldThresholds;

/// Longest gap between two processed frames that still counts as held time
pub const MAX_FRAME_GAP_MS: f64 = 250.0;

/// What one frame did to the hold
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoldStep {
    pub started: bool,
    /// Whole seconds the hold lasted, on the frame it broke
    pub broken: Option<u32>,
    /// Whole seconds held when a checkpoint interval was crossed
    pub checkpoint: Option<u32>,
}

pub struct HoldTimer {
    thresholds: HoldThresholds,
    checkpoint_interval_ms: f64,
    holding: bool,
    held_ms: f64,
    last_frame_ms: Option<f64>,
    next_checkpoint_ms: f64,
}

impl HoldTimer {
    pub fn new(thresholds: HoldThresholds, checkpoint_secs: u32) -> Self {
        let interval = f64::from(checkpoint_secs.max(1)) * 1000.0;
        Self {
            thresholds,
            checkpoint_interval_ms: interval,
            holding: false,
            held_ms: 0.0,
            last_frame_ms: None,
            next_checkpoint_ms: interval,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    /// Held time of the current hold in whole seconds
    pub fn held_secs(&self) -> u32 {
        (self.held_ms / 1000.0).floor() as u32
    }

    /// Advance with one frame's timestamp and body-line angle
    pub fn update(&mut self, now_ms: f64, angle: f32) -> HoldStep {
        let delta = match self.last_frame_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_GAP_MS),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        let mut step = HoldStep::default();
        if self.holding {
            if angle < self.thresholds.exit {
                step.broken = Some(self.held_secs());
                self.holding = false;
                self.held_ms = 0.0;
                self.next_checkpoint_ms = self.checkpoint_interval_ms;
            } else {
                self.held_ms += delta;
                if self.held_ms >= self.next_checkpoint_ms {
                    step.checkpoint = Some(self.held_secs());
                    while self.next_checkpoint_ms <= self.held_ms {
                        self.next_checkpoint_ms += self.checkpoint_interval_ms;
                    }
                }
            }
        } else if angle >= self.thresholds.enter {
            self.holding = true;
            step.started = true;
        }
        step
    }

    pub fn reset(&mut self) {
        self.holding = false;
        self.held_ms = 0.0;
        self.last_frame_ms = None;
        self.next_checkpoint_ms = self.checkpoint_interval_ms;
    }
}
