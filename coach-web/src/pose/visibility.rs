//! Visibility gate - is the body part an exercise needs actually in view?
//!
//! When the gate fails the frame is skipped for rep counting: the cycle is
//! not advanced and nothing is captured.

use super::landmarks::Landmark;

/// Default minimum detector confidence
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.7;

/// Visibility check over a set of required landmark indices
#[derive(Clone, Copy, Debug)]
pub struct VisibilityGate {
    /// Minimum confidence to accept a landmark
    threshold: f32,
}

impl VisibilityGate {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// True when every required landmark is present, inside the frame and
    /// confident enough. Absent visibility counts as fully visible.
    pub fn is_body_visible(&self, landmarks: &[Landmark], required: &[usize]) -> bool {
        required.iter().all(|&idx| match landmarks.get(idx) {
            Some(lm) => self.accepts(lm),
            None => false,
        })
    }

    fn accepts(&self, lm: &Landmark) -> bool {
        if !(0.0..=1.0).contains(&lm.x) || !(0.0..=1.0).contains(&lm.y) {
            return false;
        }
        match lm.visibility {
            Some(v) => v >= self.threshold,
            None => true,
        }
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}
