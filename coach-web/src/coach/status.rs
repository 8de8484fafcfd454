//! User-facing coaching status

use std::fmt;

use crate::exercise::{CyclePhase, ExerciseKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoachStatus {
    /// Session not running
    Idle,
    Ready,
    /// No pose, or required landmarks out of view
    Reposition,
    GoingDown,
    /// Bottom of the squat captured
    Captured,
    ComingUp,
    /// Came back up without reaching depth
    GoDeeper,
    PressUp,
    LowerAgain,
    HoldLine,
    Holding { secs: u32 },
    Analyzing { rep: u32 },
    RepComplete { rep: u32 },
}

impl CoachStatus {
    /// Status for entering a cycle phase
    pub fn for_phase(kind: ExerciseKind, phase: CyclePhase) -> Self {
        match (kind, phase) {
            (_, CyclePhase::Rest) => CoachStatus::Ready,
            (ExerciseKind::ShoulderPress, CyclePhase::Working) => CoachStatus::PressUp,
            (ExerciseKind::ShoulderPress, CyclePhase::Returning) => CoachStatus::LowerAgain,
            (ExerciseKind::Plank, _) => CoachStatus::HoldLine,
            (_, CyclePhase::Working) => CoachStatus::GoingDown,
            (_, CyclePhase::Returning) => CoachStatus::ComingUp,
        }
    }

    /// Stable identifier for styling on the JS side
    pub fn code(&self) -> &'static str {
        match self {
            CoachStatus::Idle => "idle",
            CoachStatus::Ready => "ready",
            CoachStatus::Reposition => "reposition",
            CoachStatus::GoingDown | CoachStatus::PressUp => "working",
            CoachStatus::Captured => "capturing",
            CoachStatus::ComingUp | CoachStatus::LowerAgain => "returning",
            CoachStatus::GoDeeper => "incomplete",
            CoachStatus::HoldLine | CoachStatus::Holding { .. } => "holding",
            CoachStatus::Analyzing { .. } => "analyzing",
            CoachStatus::RepComplete { .. } => "rep_complete",
        }
    }
}

impl fmt::Display for CoachStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoachStatus::Idle => f.write_str("Waiting"),
            CoachStatus::Ready => f.write_str("Ready"),
            CoachStatus::Reposition => {
                f.write_str("Please step back so your whole body is visible")
            }
            CoachStatus::GoingDown => f.write_str("Going down"),
            CoachStatus::Captured => f.write_str("Captured bottom position"),
            CoachStatus::ComingUp => f.write_str("Coming up"),
            CoachStatus::GoDeeper => f.write_str("Go deeper"),
            CoachStatus::PressUp => f.write_str("Press up"),
            CoachStatus::LowerAgain => f.write_str("Lower again"),
            CoachStatus::HoldLine => f.write_str("Hold the line"),
            CoachStatus::Holding { secs } => write!(f, "Holding {}s", secs),
            CoachStatus::Analyzing { rep } => write!(f, "Analyzing rep {}", rep),
            CoachStatus::RepComplete { rep } => write!(f, "Rep {} complete", rep),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_status_per_exercise() {
        assert_eq!(
            CoachStatus::for_phase(ExerciseKind::Squat, CyclePhase::Working),
            CoachStatus::GoingDown
        );
        assert_eq!(
            CoachStatus::for_phase(ExerciseKind::ShoulderPress, CyclePhase::Returning),
            CoachStatus::LowerAgain
        );
        assert_eq!(
            CoachStatus::for_phase(ExerciseKind::ShoulderPress, CyclePhase::Rest),
            CoachStatus::Ready
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CoachStatus::RepComplete { rep: 3 }.to_string(), "Rep 3 complete");
        assert_eq!(CoachStatus::Analyzing { rep: 1 }.to_string(), "Analyzing rep 1");
        assert_eq!(CoachStatus::Holding { secs: 12 }.code(), "holding");
    }
}
