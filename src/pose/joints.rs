//! Named joint angles over a full pose.

use super::geometry::{midpoint, try_angle};
use super::landmark::{Landmark, LandmarkIndex, Pose};

/// Left / right pair of joint angles; `None` for a degenerate side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bilateral {
    pub left: Option<f32>,
    pub right: Option<f32>,
}

impl Bilateral {
    /// Mean of the available sides
    pub fn mean(&self) -> Option<f32> {
        match (self.left, self.right) {
            (Some(l), Some(r)) => Some((l + r) / 2.0),
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        }
    }

    /// Smaller (more flexed) of the available sides
    pub fn min(&self) -> Option<f32> {
        match (self.left, self.right) {
            (Some(l), Some(r)) => Some(l.min(r)),
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        }
    }

    /// Absolute left/right difference, only when both sides are measurable
    pub fn difference(&self) -> Option<f32> {
        Some((self.left? - self.right?).abs())
    }
}

impl Pose {
    fn joint(&self, a: LandmarkIndex, b: LandmarkIndex, c: LandmarkIndex) -> Option<f32> {
        try_angle(self.get(a), self.get(b), self.get(c))
    }

    /// Shoulder-elbow-wrist
    pub fn elbow_angles(&self) -> Bilateral {
        use LandmarkIndex::*;
        Bilateral {
            left: self.joint(LeftShoulder, LeftElbow, LeftWrist),
            right: self.joint(RightShoulder, RightElbow, RightWrist),
        }
    }

    /// Hip-knee-ankle
    pub fn knee_angles(&self) -> Bilateral {
        use LandmarkIndex::*;
        Bilateral {
            left: self.joint(LeftHip, LeftKnee, LeftAnkle),
            right: self.joint(RightHip, RightKnee, RightAnkle),
        }
    }

    pub fn shoulder_center(&self) -> Landmark {
        midpoint(
            self.get(LandmarkIndex::LeftShoulder),
            self.get(LandmarkIndex::RightShoulder),
        )
    }

    pub fn hip_center(&self) -> Landmark {
        midpoint(self.get(LandmarkIndex::LeftHip), self.get(LandmarkIndex::RightHip))
    }

    pub fn knee_center(&self) -> Landmark {
        midpoint(self.get(LandmarkIndex::LeftKnee), self.get(LandmarkIndex::RightKnee))
    }

    pub fn ankle_center(&self) -> Landmark {
        midpoint(
            self.get(LandmarkIndex::LeftAnkle),
            self.get(LandmarkIndex::RightAnkle),
        )
    }

    /// Shoulder-hip-knee fold at the hip (sit-up trunk angle)
    pub fn trunk_angle(&self) -> Option<f32> {
        try_angle(&self.shoulder_center(), &self.hip_center(), &self.knee_center())
    }

    /// Shoulder-hip-ankle line; 180 when the body is a straight plank
    pub fn body_line_angle(&self) -> Option<f32> {
        try_angle(&self.shoulder_center(), &self.hip_center(), &self.ankle_center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq_f32(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    fn set(pose: &mut Pose, index: LandmarkIndex, x: f32, y: f32) {
        pose.landmarks[index as usize] = Landmark::new(x, y, 1.0);
    }

    #[test]
    fn test_bilateral_reductions() {
        let b = Bilateral { left: Some(90.0), right: Some(110.0) };
        assert_eq!(b.mean(), Some(100.0));
        assert_eq!(b.min(), Some(90.0));
        assert_eq!(b.difference(), Some(20.0));

        let one = Bilateral { left: None, right: Some(120.0) };
        assert_eq!(one.mean(), Some(120.0));
        assert_eq!(one.min(), Some(120.0));
        assert_eq!(one.difference(), None);

        let none = Bilateral { left: None, right: None };
        assert_eq!(none.mean(), None);
    }

    #[test]
    fn test_knee_angles() {
        use LandmarkIndex::*;
        let mut pose = Pose::default();
        // left leg straight, right leg bent 90
        set(&mut pose, LeftHip, 0.4, 0.5);
        set(&mut pose, LeftKnee, 0.4, 0.7);
        set(&mut pose, LeftAnkle, 0.4, 0.9);
        set(&mut pose, RightHip, 0.4, 0.7);
        set(&mut pose, RightKnee, 0.6, 0.7);
        set(&mut pose, RightAnkle, 0.6, 0.9);

        let knees = pose.knee_angles();
        assert!(approx_eq_f32(knees.left.unwrap(), 180.0, 1e-3));
        assert!(approx_eq_f32(knees.right.unwrap(), 90.0, 1e-3));
    }

    #[test]
    fn test_degenerate_side() {
        // all landmarks at the origin
        let pose = Pose::default();
        assert_eq!(pose.elbow_angles().mean(), None);
        assert_eq!(pose.trunk_angle(), None);
    }

    #[test]
    fn test_body_line_straight_plank() {
        use LandmarkIndex::*;
        let mut pose = Pose::default();
        set(&mut pose, LeftShoulder, 0.2, 0.5);
        set(&mut pose, RightShoulder, 0.2, 0.5);
        set(&mut pose, LeftHip, 0.5, 0.55);
        set(&mut pose, RightHip, 0.5, 0.55);
        set(&mut pose, LeftAnkle, 0.8, 0.6);
        set(&mut pose, RightAnkle, 0.8, 0.6);
        assert!(approx_eq_f32(pose.body_line_angle().unwrap(), 180.0, 1e-2));
    }
}
