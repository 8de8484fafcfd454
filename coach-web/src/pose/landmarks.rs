//! Pose landmarks and the MediaPipe Pose index scheme
//!
//! Landmarks arrive from JavaScript once per frame. Indices are fixed
//! process-wide and never remapped.

use serde::{Deserialize, Serialize};

use crate::error::{CoachError, Result};

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const POSE_LANDMARK_COUNT: usize = 33;

/// Fewest landmarks a pose must carry (up to and including the ankles)
pub const MIN_POSE_LANDMARKS: usize = 29;

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Values per landmark in a flat buffer with visibility (x, y, z, visibility)
const STRIDE_WITH_VISIBILITY: usize = 4;
/// Values per landmark in a flat buffer without visibility (x, y, z)
const STRIDE_POSITION_ONLY: usize = 3;

// ============================================================================
// LANDMARK DATA STRUCTURE
// ============================================================================

/// A single pose keypoint
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,  // 0-1 normalized to frame width
    pub y: f32,  // 0-1 normalized to frame height
    pub z: f32,  // Relative depth, more negative = nearer the camera
    /// Detector confidence. `None` counts as fully visible.
    #[serde(default)]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, visibility: None }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Decode the flat `Float32Array` sent from JavaScript.
///
/// Accepts 33 x 4 values (visibility as NaN when absent), 33 x 3 values
/// (no visibility), or an empty buffer meaning no pose was detected.
pub fn landmarks_from_flat(data: &[f32]) -> Result<Option<Vec<Landmark>>> {
    let stride = match data.len() {
        0 => return Ok(None),
        n if n == POSE_LANDMARK_COUNT * STRIDE_WITH_VISIBILITY => STRIDE_WITH_VISIBILITY,
        n if n == POSE_LANDMARK_COUNT * STRIDE_POSITION_ONLY => STRIDE_POSITION_ONLY,
        n => return Err(CoachError::LandmarkBuffer(n)),
    };

    let landmarks = data
        .chunks_exact(stride)
        .map(|chunk| {
            let visibility = if stride == STRIDE_WITH_VISIBILITY && !chunk[3].is_nan() {
                Some(chunk[3])
            } else {
                None
            };
            Landmark {
                x: chunk[0],
                y: chunk[1],
                z: chunk[2],
                visibility,
            }
        })
        .collect();

    Ok(Some(landmarks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_is_no_pose() {
        assert!(landmarks_from_flat(&[]).unwrap().is_none());
    }

    #[test]
    fn test_flat_with_visibility() {
        let mut data = vec![0.0f32; POSE_LANDMARK_COUNT * 4];
        data[LEFT_KNEE * 4] = 0.4;
        data[LEFT_KNEE * 4 + 1] = 0.6;
        data[LEFT_KNEE * 4 + 2] = -0.1;
        data[LEFT_KNEE * 4 + 3] = 0.9;
        data[RIGHT_KNEE * 4 + 3] = f32::NAN;

        let landmarks = landmarks_from_flat(&data).unwrap().unwrap();
        assert_eq!(landmarks.len(), POSE_LANDMARK_COUNT);
        assert_eq!(landmarks[LEFT_KNEE], Landmark::new(0.4, 0.6, -0.1).with_visibility(0.9));
        assert_eq!(landmarks[RIGHT_KNEE].visibility, None);
    }

    #[test]
    fn test_flat_without_visibility() {
        let data = vec![0.5f32; POSE_LANDMARK_COUNT * 3];
        let landmarks = landmarks_from_flat(&data).unwrap().unwrap();
        assert!(landmarks.iter().all(|lm| lm.visibility.is_none()));
    }

    #[test]
    fn test_rejects_odd_length() {
        let err = landmarks_from_flat(&[0.0; 10]).unwrap_err();
        assert!(matches!(err, CoachError::LandmarkBuffer(10)));
    }
}
