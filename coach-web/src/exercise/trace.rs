//! Cycle trace - per-frame angle samples of the rep in progress
//!
//! Reduced to `CycleMetrics` when the rep completes, which feeds the local
//! rule-based feedback.

use std::collections::VecDeque;

use serde::Serialize;

use super::profile::{ExerciseKind, PLANK_LINE_ENTER, SQUAT_DEPTH_THRESHOLD};

/// Most samples kept for one cycle (~20 s at 30 fps); older ones roll off
pub const TRACE_CAPACITY: usize = 600;

/// Fewer samples than this is not enough to judge a rep
pub const MIN_TRACE_SAMPLES: usize = 5;

/// Elbow angle a press should reach at lockout
const PRESS_LOCKOUT_ANGLE: f32 = 160.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleSample {
    pub t_ms: f64,
    /// Counting angle (knee, elbow or body line)
    pub angle: f32,
    /// Shoulder-hip-knee angle, when available
    pub torso: Option<f32>,
}

/// Summary of one cycle
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CycleMetrics {
    pub frame_count: usize,
    pub duration_secs: f64,
    pub angle_min: f32,
    pub angle_max: f32,
    pub torso_avg: Option<f32>,
    pub torso_range: Option<f32>,
    /// Frames up to and including the lowest angle
    pub descent_frames: usize,
    /// Frames from the lowest angle to the end
    pub ascent_frames: usize,
}

/// Rolling sample buffer for the current cycle
pub struct CycleTrace {
    samples: VecDeque<CycleSample>,
}

impl CycleTrace {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(TRACE_CAPACITY),
        }
    }

    pub fn push(&mut self, sample: CycleSample) {
        if self.samples.len() == TRACE_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Reduce the trace. `None` when empty.
    pub fn metrics(&self) -> Option<CycleMetrics> {
        let first = self.samples.front()?;
        let last = self.samples.back()?;

        let mut angle_min = f32::INFINITY;
        let mut angle_max = f32::NEG_INFINITY;
        let mut lowest_idx = 0;
        for (i, s) in self.samples.iter().enumerate() {
            if s.angle < angle_min {
                angle_min = s.angle;
                lowest_idx = i;
            }
            angle_max = angle_max.max(s.angle);
        }

        let torsos: Vec<f32> = self.samples.iter().filter_map(|s| s.torso).collect();
        let (torso_avg, torso_range) = if torsos.is_empty() {
            (None, None)
        } else {
            let min = torsos.iter().copied().fold(f32::INFINITY, f32::min);
            let max = torsos.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let avg = torsos.iter().sum::<f32>() / torsos.len() as f32;
            (Some(avg), Some(max - min))
        };

        Some(CycleMetrics {
            frame_count: self.samples.len(),
            duration_secs: (last.t_ms - first.t_ms) / 1000.0,
            angle_min,
            angle_max,
            torso_avg,
            torso_range,
            descent_frames: if lowest_idx > 0 { lowest_idx + 1 } else { 1 },
            ascent_frames: self.samples.len() - lowest_idx,
        })
    }
}

impl Default for CycleTrace {
    fn default() -> Self {
        Self::new()
    }
}

/// Local feedback from cycle metrics. Only the most important problem is
/// reported.
pub fn rule_feedback(kind: ExerciseKind, metrics: Option<&CycleMetrics>) -> &'static str {
    let Some(m) = metrics.filter(|m| m.frame_count >= MIN_TRACE_SAMPLES) else {
        return "Not enough data";
    };

    match kind {
        ExerciseKind::Squat => {
            if m.angle_min > SQUAT_DEPTH_THRESHOLD {
                return "Sit deeper";
            }
            if let Some(torso) = m.torso_avg {
                if torso < 60.0 {
                    return "Keep your chest up";
                }
                if torso > 110.0 {
                    return "Lean forward slightly";
                }
            }
            let ratio = m.descent_frames as f32 / m.ascent_frames.max(1) as f32;
            if ratio < 0.3 {
                return "Lower more slowly";
            }
            if ratio > 3.0 {
                return "Rise more slowly";
            }
            "Good squat!"
        }
        ExerciseKind::ShoulderPress => {
            if m.angle_max < PRESS_LOCKOUT_ANGLE {
                return "Extend your arms fully";
            }
            "Good press!"
        }
        ExerciseKind::Plank => {
            if m.angle_min < PLANK_LINE_ENTER {
                return "Keep your hips in line";
            }
            "Good plank!"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_of(angles: &[f32], torso: Option<f32>) -> CycleTrace {
        let mut trace = CycleTrace::new();
        for (i, &angle) in angles.iter().enumerate() {
            trace.push(CycleSample {
                t_ms: i as f64 * 100.0,
                angle,
                torso,
            });
        }
        trace
    }

    #[test]
    fn test_metrics() {
        let trace = trace_of(&[140.0, 120.0, 95.0, 120.0, 140.0, 165.0], Some(80.0));
        let m = trace.metrics().unwrap();
        assert_eq!(m.frame_count, 6);
        assert_eq!(m.angle_min, 95.0);
        assert_eq!(m.angle_max, 165.0);
        assert_eq!(m.descent_frames, 3);
        assert_eq!(m.ascent_frames, 4);
        assert_eq!(m.torso_avg, Some(80.0));
        assert_eq!(m.torso_range, Some(0.0));
        assert!((m.duration_secs - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_trace_has_no_metrics() {
        assert!(CycleTrace::new().metrics().is_none());
    }

    #[test]
    fn test_capacity_rolls_oldest() {
        let mut trace = CycleTrace::new();
        for i in 0..TRACE_CAPACITY + 10 {
            trace.push(CycleSample {
                t_ms: i as f64,
                angle: 120.0,
                torso: None,
            });
        }
        assert_eq!(trace.len(), TRACE_CAPACITY);
        assert_eq!(trace.samples.front().unwrap().t_ms, 10.0);
    }

    #[test]
    fn test_good_squat() {
        let trace = trace_of(&[140.0, 120.0, 95.0, 120.0, 140.0, 165.0], Some(80.0));
        assert_eq!(rule_feedback(ExerciseKind::Squat, trace.metrics().as_ref()), "Good squat!");
    }

    #[test]
    fn test_squat_depth_rule_first() {
        let trace = trace_of(&[140.0, 125.0, 115.0, 125.0, 165.0], Some(40.0));
        assert_eq!(rule_feedback(ExerciseKind::Squat, trace.metrics().as_ref()), "Sit deeper");
    }

    #[test]
    fn test_squat_torso_rule() {
        let trace = trace_of(&[140.0, 120.0, 95.0, 120.0, 165.0], Some(45.0));
        assert_eq!(
            rule_feedback(ExerciseKind::Squat, trace.metrics().as_ref()),
            "Keep your chest up"
        );
    }

    #[test]
    fn test_squat_tempo_rule() {
        // Drops to the bottom on the first frame, then a long rise
        let mut angles = vec![95.0];
        angles.extend((0..12).map(|i| 100.0 + i as f32 * 5.0));
        let trace = trace_of(&angles, Some(80.0));
        assert_eq!(
            rule_feedback(ExerciseKind::Squat, trace.metrics().as_ref()),
            "Lower more slowly"
        );
    }

    #[test]
    fn test_press_lockout_rule() {
        let trace = trace_of(&[95.0, 120.0, 152.0, 130.0, 105.0], None);
        assert_eq!(
            rule_feedback(ExerciseKind::ShoulderPress, trace.metrics().as_ref()),
            "Extend your arms fully"
        );
    }

    #[test]
    fn test_plank_line_rule() {
        let steady = trace_of(&[172.0, 170.0, 171.0, 169.0, 170.0], None);
        assert_eq!(rule_feedback(ExerciseKind::Plank, steady.metrics().as_ref()), "Good plank!");
        let sagging = trace_of(&[172.0, 165.0, 155.0, 158.0, 166.0], None);
        assert_eq!(
            rule_feedback(ExerciseKind::Plank, sagging.metrics().as_ref()),
            "Keep your hips in line"
        );
    }

    #[test]
    fn test_short_trace() {
        let trace = trace_of(&[140.0, 95.0], None);
        assert_eq!(rule_feedback(ExerciseKind::Squat, trace.metrics().as_ref()), "Not enough data");
        assert_eq!(rule_feedback(ExerciseKind::Plank, None), "Not enough data");
    }
}
