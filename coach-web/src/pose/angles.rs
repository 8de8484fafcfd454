//! Joint angle calculation using dot product
//!
//! Angles are measured at the middle landmark of a triple in the 2D image
//! plane. Depth (z) is too noisy for angles; it is only used to pick the
//! side nearer the camera for bilateral joints.

use nalgebra::Vector2;

use super::landmarks::Landmark;

/// Vectors shorter than this count as zero length
const DEGENERATE_LENGTH: f32 = 1e-6;

/// Angle at `b` between `b→a` and `b→c`, in degrees [0, 180].
///
/// - 90° = right angle (e.g. knee at parallel)
/// - 180° = straight line, also returned when either vector has zero length
pub fn joint_angle(a: &Landmark, b: &Landmark, c: &Landmark) -> f32 {
    let v1 = Vector2::new(a.x - b.x, a.y - b.y);
    let v2 = Vector2::new(c.x - b.x, c.y - b.y);

    let mag1 = v1.norm();
    let mag2 = v2.norm();
    if mag1 < DEGENERATE_LENGTH || mag2 < DEGENERATE_LENGTH {
        return 180.0;
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    // f32 rounding can land a hair past 180 at full extension
    cos_angle.acos().to_degrees().min(180.0)
}

/// Of a left/right pair, the landmark nearer the camera (ties go right)
pub fn nearer<'a>(left: &'a Landmark, right: &'a Landmark) -> &'a Landmark {
    if left.z < right.z {
        left
    } else {
        right
    }
}

/// Angle over a (a, b, c) triple where each point is picked independently
/// from its left/right pair by camera proximity.
pub fn nearer_side_angle(landmarks: &[Landmark], left: [usize; 3], right: [usize; 3]) -> Option<f32> {
    let a = nearer(landmarks.get(left[0])?, landmarks.get(right[0])?);
    let b = nearer(landmarks.get(left[1])?, landmarks.get(right[1])?);
    let c = nearer(landmarks.get(left[2])?, landmarks.get(right[2])?);
    Some(joint_angle(a, b, c))
}

/// Mean of the left and right angles, for joints that move symmetrically
pub fn mean_side_angle(landmarks: &[Landmark], left: [usize; 3], right: [usize; 3]) -> Option<f32> {
    let side = |t: [usize; 3]| -> Option<f32> {
        Some(joint_angle(landmarks.get(t[0])?, landmarks.get(t[1])?, landmarks.get(t[2])?))
    };
    Some((side(left)? + side(right)?) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::landmarks::*;

    fn lm(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y, 0.0)
    }

    #[test]
    fn test_straight_joint() {
        let angle = joint_angle(&lm(0.0, 0.0), &lm(0.5, 0.0), &lm(1.0, 0.0));
        assert!((angle - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle(&lm(0.0, 0.0), &lm(0.5, 0.0), &lm(0.5, 0.5));
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_length_vector_is_straight() {
        let a = lm(0.3, 0.3);
        let c = lm(0.8, 0.1);
        assert_eq!(joint_angle(&a, &a, &c), 180.0);
        assert_eq!(joint_angle(&a, &c, &c), 180.0);
        assert_eq!(joint_angle(&a, &a, &a), 180.0);
    }

    #[test]
    fn test_depth_ignored() {
        let flat = joint_angle(&lm(0.0, 0.0), &lm(0.5, 0.0), &lm(0.5, 0.5));
        let deep = joint_angle(
            &Landmark::new(0.0, 0.0, -2.0),
            &Landmark::new(0.5, 0.0, 1.0),
            &Landmark::new(0.5, 0.5, 3.0),
        );
        assert_eq!(flat, deep);
    }

    #[test]
    fn test_range_over_grid() {
        let points: Vec<Landmark> = (0..5)
            .flat_map(|i| (0..5).map(move |j| lm(i as f32 * 0.25, j as f32 * 0.25)))
            .collect();
        for a in &points {
            for b in &points {
                for c in &points {
                    let angle = joint_angle(a, b, c);
                    assert!((0.0..=180.0).contains(&angle), "angle {} out of range", angle);
                }
            }
        }
    }

    #[test]
    fn test_nearer_prefers_negative_z() {
        let left = Landmark::new(0.1, 0.1, -0.3);
        let right = Landmark::new(0.9, 0.9, 0.2);
        assert_eq!(nearer(&left, &right), &left);
        assert_eq!(nearer(&right, &left), &left);
    }

    #[test]
    fn test_mean_side_angle() {
        let mut pose = vec![lm(0.5, 0.5); POSE_LANDMARK_COUNT];
        // Left arm straight (180), right arm bent (90)
        pose[LEFT_SHOULDER] = lm(0.0, 0.0);
        pose[LEFT_ELBOW] = lm(0.2, 0.0);
        pose[LEFT_WRIST] = lm(0.4, 0.0);
        pose[RIGHT_SHOULDER] = lm(0.6, 0.0);
        pose[RIGHT_ELBOW] = lm(0.8, 0.0);
        pose[RIGHT_WRIST] = lm(0.8, 0.2);
        let angle = mean_side_angle(
            &pose,
            [LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST],
            [RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST],
        )
        .unwrap();
        assert!((angle - 135.0).abs() < 0.05);
    }

    #[test]
    fn test_missing_landmarks_give_none() {
        let pose = vec![lm(0.5, 0.5); 20];
        assert!(nearer_side_angle(
            &pose,
            [LEFT_HIP, LEFT_KNEE, LEFT_ANKLE],
            [RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE],
        )
        .is_none());
    }
}
