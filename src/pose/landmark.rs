use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// BlazePose / MediaPipe Pose landmark indices (33 slots)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Single landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X (0.0..1.0, left to right)
    pub x: f32,
    /// Normalized Y (0.0..1.0, top to bottom)
    pub y: f32,
    /// Relative depth, 0.0 when the estimator gives none
    #[serde(default)]
    pub z: f32,
    /// Visibility / confidence (0.0..1.0); fully visible when omitted
    #[serde(default = "default_visibility")]
    pub visibility: f32,
}

fn default_visibility() -> f32 { 1.0 }

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, z: 0.0, visibility }
    }

    pub fn with_depth(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// Whether visibility clears the threshold
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility >= threshold
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            visibility: 0.0,
        }
    }
}

/// Full 33-landmark pose for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub landmarks: [Landmark; LandmarkIndex::COUNT],
}

impl Pose {
    pub fn new(landmarks: [Landmark; LandmarkIndex::COUNT]) -> Self {
        Self { landmarks }
    }

    /// Builds a pose from a wire slice. Missing trailing slots become
    /// invisible landmarks; extra slots are rejected.
    pub fn from_slice(landmarks: &[Landmark]) -> Result<Self, PoseError> {
        if landmarks.len() > LandmarkIndex::COUNT {
            return Err(PoseError::TooManyLandmarks {
                got: landmarks.len(),
                expected: LandmarkIndex::COUNT,
            });
        }
        let mut pose = Self::default();
        pose.landmarks[..landmarks.len()].copy_from_slice(landmarks);
        Ok(pose)
    }

    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.landmarks[index as usize]
    }

    /// Landmark by raw slot number
    pub fn get_index(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Mean visibility across all slots
    pub fn average_visibility(&self) -> f32 {
        let sum: f32 = self.landmarks.iter().map(|l| l.visibility).sum();
        sum / LandmarkIndex::COUNT as f32
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            landmarks: [Landmark::default(); LandmarkIndex::COUNT],
        }
    }
}

/// One line of pose input as produced by the external estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseRecord {
    /// Milliseconds since the start of the stream
    pub timestamp_ms: u64,
    pub landmarks: Vec<Landmark>,
}

impl TryFrom<&PoseRecord> for Pose {
    type Error = PoseError;

    fn try_from(record: &PoseRecord) -> Result<Self, Self::Error> {
        Pose::from_slice(&record.landmarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_index_count() {
        assert_eq!(LandmarkIndex::COUNT, 33);
        assert_eq!(LandmarkIndex::RightFootIndex as usize, 32);
    }

    #[test]
    fn test_landmark_is_visible() {
        let lm = Landmark::new(0.5, 0.5, 0.7);
        assert!(lm.is_visible(0.5));
        assert!(lm.is_visible(0.7));
        assert!(!lm.is_visible(0.8));
    }

    #[test]
    fn test_pose_from_short_slice_pads_invisible() {
        let pose = Pose::from_slice(&[Landmark::new(0.1, 0.2, 0.9)]).unwrap();
        assert_eq!(pose.get(LandmarkIndex::Nose).x, 0.1);
        assert_eq!(pose.get(LandmarkIndex::LeftAnkle).visibility, 0.0);
    }

    #[test]
    fn test_pose_from_long_slice_rejected() {
        let landmarks = vec![Landmark::default(); 34];
        assert!(matches!(
            Pose::from_slice(&landmarks),
            Err(PoseError::TooManyLandmarks { got: 34, .. })
        ));
    }

    #[test]
    fn test_pose_average_visibility() {
        let pose = Pose::new([Landmark::new(0.0, 0.0, 0.5); LandmarkIndex::COUNT]);
        assert!((pose.average_visibility() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_record_deserialize_defaults() {
        let json = r#"{"timestamp_ms": 40, "landmarks": [{"x": 0.5, "y": 0.25}]}"#;
        let record: PoseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp_ms, 40);
        assert_eq!(record.landmarks[0].z, 0.0);
        assert_eq!(record.landmarks[0].visibility, 1.0);
        let pose = Pose::try_from(&record).unwrap();
        assert_eq!(pose.get(LandmarkIndex::Nose).y, 0.25);
        // padded slots stay invisible
        assert_eq!(pose.get(LandmarkIndex::LeftHip).visibility, 0.0);
    }
}
