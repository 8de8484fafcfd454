//! Landmark smoothing - exponential moving average over detector output
//!
//! Fast-responding: the newest sample carries weight `alpha` (0.7 by
//! default), so this trims jitter without adding noticeable lag.

use super::landmarks::Landmark;

/// Default weight of the newest sample
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.7;

/// Per-session EMA buffer over a full pose
pub struct LandmarkSmoother {
    alpha: f32,
    /// Smoothed pose, allocated on the first observation
    smoothed: Option<Vec<Landmark>>,
}

impl LandmarkSmoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            smoothed: None,
        }
    }

    /// Blend `current` into the buffer and return the smoothed pose.
    ///
    /// The first frame passes through unchanged. Visibility is never blended:
    /// each smoothed landmark carries the raw visibility of `current`.
    /// A change in landmark count re-seeds the buffer.
    pub fn smooth(&mut self, current: &[Landmark]) -> &[Landmark] {
        let alpha = self.alpha;
        match &mut self.smoothed {
            Some(prev) if prev.len() == current.len() => {
                for (p, c) in prev.iter_mut().zip(current) {
                    p.x = p.x * (1.0 - alpha) + c.x * alpha;
                    p.y = p.y * (1.0 - alpha) + c.y * alpha;
                    p.z = p.z * (1.0 - alpha) + c.z * alpha;
                    p.visibility = c.visibility;
                }
            }
            slot => *slot = Some(current.to_vec()),
        }
        self.smoothed.as_deref().unwrap_or_default()
    }

    /// Drop the buffer (tracking stopped or camera restarted)
    pub fn reset(&mut self) {
        self.smoothed = None;
    }

    pub fn is_primed(&self) -> bool {
        self.smoothed.is_some()
    }
}

impl Default for LandmarkSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(x: f32, y: f32, z: f32) -> Vec<Landmark> {
        vec![Landmark::new(x, y, z); 33]
    }

    #[test]
    fn test_first_frame_passthrough() {
        let mut s = LandmarkSmoother::default();
        let input = pose(0.2, 0.4, -0.1);
        assert_eq!(s.smooth(&input), input.as_slice());
    }

    #[test]
    fn test_blend_weights_new_sample() {
        let mut s = LandmarkSmoother::default();
        s.smooth(&pose(0.0, 0.0, 0.0));
        let out = s.smooth(&pose(1.0, 1.0, 1.0));
        assert!((out[0].x - 0.7).abs() < 1e-6);
        assert!((out[32].z - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_converges_on_constant_input() {
        let mut s = LandmarkSmoother::default();
        s.smooth(&pose(0.0, 0.0, 0.0));
        let target = pose(0.5, 0.25, -0.3);
        for _ in 0..15 {
            s.smooth(&target);
        }
        let out = s.smooth(&target);
        for (o, t) in out.iter().zip(&target) {
            assert!((o.x - t.x).abs() < 1e-6);
            assert!((o.y - t.y).abs() < 1e-6);
            assert!((o.z - t.z).abs() < 1e-6);
        }
    }

    #[test]
    fn test_visibility_taken_from_current_frame() {
        let mut s = LandmarkSmoother::default();
        s.smooth(&vec![Landmark::new(0.5, 0.5, 0.0).with_visibility(0.99); 33]);
        let out = s.smooth(&vec![Landmark::new(0.5, 0.5, 0.0).with_visibility(0.2); 33]);
        assert_eq!(out[10].visibility, Some(0.2));
    }

    #[test]
    fn test_reset() {
        let mut s = LandmarkSmoother::default();
        s.smooth(&pose(0.0, 0.0, 0.0));
        s.reset();
        assert!(!s.is_primed());
        let input = pose(1.0, 1.0, 1.0);
        assert_eq!(s.smooth(&input), input.as_slice());
    }
}
