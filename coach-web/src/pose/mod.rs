//! Pose module - landmark ingestion, smoothing, visibility and joint angles
//!
//! Re-exports only. All logic in submodules.

mod landmarks;
mod smoothing;
mod visibility;
mod angles;

pub use landmarks::{
    Landmark, landmarks_from_flat,
    POSE_LANDMARK_COUNT, MIN_POSE_LANDMARKS,
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
};
pub use smoothing::{LandmarkSmoother, DEFAULT_SMOOTHING_FACTOR};
pub use visibility::{VisibilityGate, DEFAULT_VISIBILITY_THRESHOLD};
pub use angles::{joint_angle, nearer, nearer_side_angle, mean_side_angle};
