//! Exercise profiles - static per-exercise configuration
//!
//! A profile says which landmarks must be visible, which joint angle drives
//! counting, and the thresholds of the motion. The cycle machine and hold
//! timer are generic over these values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoachError;
use crate::pose::*;
use super::cycle::CyclePhase;

// ============================================================================
// THRESHOLDS (degrees)
// ============================================================================

/// Knee angle above which the user is standing
pub const SQUAT_STANDING_THRESHOLD: f32 = 160.0;
/// Knee angle the descent must pass for the rep to count
pub const SQUAT_DEPTH_THRESHOLD: f32 = 110.0;
/// Margin below standing that starts a descent
const SQUAT_DESCENT_MARGIN: f32 = 10.0;
/// Rise above the lowest point that starts the ascent
const SQUAT_REBOUND: f32 = 20.0;

/// Average elbow angle below which the bar is racked at the shoulders
pub const PRESS_LOADED_THRESHOLD: f32 = 100.0;
/// Average elbow angle above which the arms are locked out overhead
pub const PRESS_EXTENDED_THRESHOLD: f32 = 150.0;
/// Average elbow angle below which the press has come back down
pub const PRESS_LOWERED_THRESHOLD: f32 = 110.0;

/// Shoulder-hip-ankle angle at which a plank hold starts
pub const PLANK_LINE_ENTER: f32 = 160.0;
/// Shoulder-hip-ankle angle below which a plank hold breaks
pub const PLANK_LINE_EXIT: f32 = 150.0;

// ============================================================================
// EXERCISE KIND
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Squat,
    ShoulderPress,
    Plank,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 3] = [
        ExerciseKind::Squat,
        ExerciseKind::ShoulderPress,
        ExerciseKind::Plank,
    ];

    /// Identifier used in analysis requests and exercise selection
    pub fn slug(&self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::ShoulderPress => "shoulder_press",
            ExerciseKind::Plank => "plank",
        }
    }

    pub fn profile(&self) -> &'static ExerciseProfile {
        match self {
            ExerciseKind::Squat => &SQUAT,
            ExerciseKind::ShoulderPress => &SHOULDER_PRESS,
            ExerciseKind::Plank => &PLANK,
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ExerciseKind {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExerciseKind::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoachError::UnknownExercise(s.to_string()))
    }
}

// ============================================================================
// PROFILE BUILDING BLOCKS
// ============================================================================

/// Which joint angle an exercise is counted on
#[derive(Clone, Copy, Debug)]
pub enum JointMeasure {
    /// Each point of the triple taken from the side nearer the camera
    NearerSide { left: [usize; 3], right: [usize; 3] },
    /// Mean of the left and right angles
    MeanOfSides { left: [usize; 3], right: [usize; 3] },
}

impl JointMeasure {
    pub fn measure(&self, landmarks: &[Landmark]) -> Option<f32> {
        match *self {
            JointMeasure::NearerSide { left, right } => nearer_side_angle(landmarks, left, right),
            JointMeasure::MeanOfSides { left, right } => mean_side_angle(landmarks, left, right),
        }
    }
}

/// One-sided angle bound
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    Below(f32),
    Above(f32),
}

impl Bound {
    pub fn crossed(&self, angle: f32) -> bool {
        match *self {
            Bound::Below(limit) => angle < limit,
            Bound::Above(limit) => angle > limit,
        }
    }
}

/// Thresholds of a repetition cycle (rest → working → returning)
#[derive(Clone, Copy, Debug)]
pub struct CycleThresholds {
    /// Rest → Working
    pub enter: Bound,
    /// Bound the working extremum must pass for the rep to count; also the
    /// capture point. `Below` tracks a running minimum, `Above` a maximum.
    pub depth: Bound,
    /// Retreat from the extremum needed before Working → Returning.
    /// `None` turns as soon as the depth is reached.
    pub rebound: Option<f32>,
    /// Crossing this in Working before the depth was reached discards the rep
    pub abort: Option<Bound>,
    /// Returning → completion
    pub finish: Bound,
    /// Phase re-entered after a completion
    pub after_completion: CyclePhase,
}

/// Thresholds of a timed hold
#[derive(Clone, Copy, Debug)]
pub struct HoldThresholds {
    pub enter: f32,
    pub exit: f32,
}

#[derive(Clone, Copy, Debug)]
pub enum Motion {
    Cycle(CycleThresholds),
    Hold(HoldThresholds),
}

/// User-facing names for the cycle phases
#[derive(Clone, Copy, Debug)]
pub struct PhaseLabels {
    pub rest: &'static str,
    pub working: &'static str,
    pub returning: &'static str,
}

impl PhaseLabels {
    pub fn label(&self, phase: CyclePhase) -> &'static str {
        match phase {
            CyclePhase::Rest => self.rest,
            CyclePhase::Working => self.working,
            CyclePhase::Returning => self.returning,
        }
    }
}

// ============================================================================
// PROFILES
// ============================================================================

#[derive(Debug)]
pub struct ExerciseProfile {
    pub kind: ExerciseKind,
    /// Landmarks that must pass the visibility gate
    pub required: &'static [usize],
    pub measure: JointMeasure,
    pub motion: Motion,
    pub labels: PhaseLabels,
}

/// Foot position matters for depth, so the whole lower body must be in frame
pub static SQUAT: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::Squat,
    required: &[LEFT_HIP, RIGHT_HIP, LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE],
    measure: JointMeasure::NearerSide {
        left: [LEFT_HIP, LEFT_KNEE, LEFT_ANKLE],
        right: [RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE],
    },
    motion: Motion::Cycle(CycleThresholds {
        enter: Bound::Below(SQUAT_STANDING_THRESHOLD - SQUAT_DESCENT_MARGIN),
        depth: Bound::Below(SQUAT_DEPTH_THRESHOLD),
        rebound: Some(SQUAT_REBOUND),
        abort: Some(Bound::Above(SQUAT_STANDING_THRESHOLD)),
        finish: Bound::Above(SQUAT_STANDING_THRESHOLD),
        after_completion: CyclePhase::Rest,
    }),
    labels: PhaseLabels {
        rest: "standing",
        working: "squatting",
        returning: "rising",
    },
};

/// Upper body only; both arms press together so their angles are averaged
pub static SHOULDER_PRESS: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::ShoulderPress,
    required: &[LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_ELBOW, RIGHT_ELBOW, LEFT_WRIST, RIGHT_WRIST],
    measure: JointMeasure::MeanOfSides {
        left: [LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST],
        right: [RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST],
    },
    motion: Motion::Cycle(CycleThresholds {
        enter: Bound::Below(PRESS_LOADED_THRESHOLD),
        depth: Bound::Above(PRESS_EXTENDED_THRESHOLD),
        rebound: None,
        abort: None,
        finish: Bound::Below(PRESS_LOWERED_THRESHOLD),
        after_completion: CyclePhase::Working,
    }),
    labels: PhaseLabels {
        rest: "ready",
        working: "down",
        returning: "up",
    },
};

/// Shoulder-hip-ankle line held straight
pub static PLANK: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::Plank,
    required: &[LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP, LEFT_ANKLE, RIGHT_ANKLE],
    measure: JointMeasure::NearerSide {
        left: [LEFT_SHOULDER, LEFT_HIP, LEFT_ANKLE],
        right: [RIGHT_SHOULDER, RIGHT_HIP, RIGHT_ANKLE],
    },
    motion: Motion::Hold(HoldThresholds {
        enter: PLANK_LINE_ENTER,
        exit: PLANK_LINE_EXIT,
    }),
    labels: PhaseLabels {
        rest: "resting",
        working: "holding",
        returning: "holding",
    },
};
