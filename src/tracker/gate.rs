use crate::pose::Pose;

/// True iff every required slot is present with visibility >= threshold
pub fn is_usable(pose: &Pose, required: &[usize], threshold: f32) -> bool {
    required.iter().all(|&i| {
        pose.get_index(i)
            .map(|lm| lm.is_visible(threshold))
            .unwrap_or(false)
    })
}

/// Per-exercise visibility filter
#[derive(Debug, Clone)]
pub struct LandmarkGate {
    required: Vec<usize>,
    threshold: f32,
}

impl LandmarkGate {
    pub fn new(required: Vec<usize>, threshold: f32) -> Self {
        Self { required, threshold }
    }

    pub fn is_usable(&self, pose: &Pose) -> bool {
        is_usable(pose, &self.required, self.threshold)
    }

    /// Required slots that fail the threshold, in configured order
    pub fn missing(&self, pose: &Pose) -> Vec<usize> {
        self.required
            .iter()
            .copied()
            .filter(|&i| {
                !pose
                    .get_index(i)
                    .map(|lm| lm.is_visible(self.threshold))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn required(&self) -> &[usize] {
        &self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Landmark, LandmarkIndex};

    fn pose_with(index: LandmarkIndex, visibility: f32) -> Pose {
        let mut pose = Pose::new([Landmark::new(0.5, 0.5, 1.0); LandmarkIndex::COUNT]);
        pose.landmarks[index as usize].visibility = visibility;
        pose
    }

    #[test]
    fn test_all_visible() {
        let pose = pose_with(LandmarkIndex::LeftKnee, 0.9);
        assert!(is_usable(&pose, &[23, 24, 25, 26], 0.5));
    }

    #[test]
    fn test_low_visibility_fails() {
        let pose = pose_with(LandmarkIndex::LeftKnee, 0.3);
        assert!(!is_usable(&pose, &[23, 24, 25, 26], 0.5));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let pose = pose_with(LandmarkIndex::LeftKnee, 0.5);
        assert!(is_usable(&pose, &[25], 0.5));
    }

    #[test]
    fn test_unrequired_slot_ignored() {
        let pose = pose_with(LandmarkIndex::Nose, 0.0);
        assert!(is_usable(&pose, &[11, 12], 0.7));
    }

    #[test]
    fn test_out_of_schema_index_fails() {
        let pose = pose_with(LandmarkIndex::Nose, 1.0);
        assert!(!is_usable(&pose, &[40], 0.5));
    }

    #[test]
    fn test_missing_lists_failed_slots() {
        let mut pose = pose_with(LandmarkIndex::LeftHip, 0.1);
        pose.landmarks[LandmarkIndex::RightAnkle as usize].visibility = 0.2;
        let gate = LandmarkGate::new(vec![23, 24, 27, 28], 0.5);
        assert!(!gate.is_usable(&pose));
        assert_eq!(gate.missing(&pose), vec![23, 28]);
    }
}
