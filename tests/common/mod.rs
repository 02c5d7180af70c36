#![allow(dead_code)]

use rep_tracker::config::ExerciseConfig;
use rep_tracker::pose::{Landmark, LandmarkIndex, Pose};
use rep_tracker::tracker::{Exercise, RepCounter};

const SHIN: f32 = 0.2;
const THIGH: f32 = 0.2;
const TORSO: f32 = 0.3;

/// Front-facing squat with both knees bent to `knee` degrees, knees over the
/// ankles, torso vertical and heels flat.
pub fn squat_pose(knee: f32) -> Pose {
    use LandmarkIndex::*;
    let mut pose = Pose::new([Landmark::new(0.5, 0.5, 1.0); LandmarkIndex::COUNT]);
    let bend = (180.0 - knee).to_radians();
    let dx = THIGH * bend.sin();
    let hip_y = 0.9 - SHIN - THIGH * bend.cos();

    for (hip, knee_idx, ankle, shoulder, x) in [
        (LeftHip, LeftKnee, LeftAnkle, LeftShoulder, 0.58),
        (RightHip, RightKnee, RightAnkle, RightShoulder, 0.42),
    ] {
        pose.landmarks[ankle as usize] = Landmark::new(x, 0.9, 1.0);
        pose.landmarks[knee_idx as usize] = Landmark::new(x, 0.9 - SHIN, 1.0);
        pose.landmarks[hip as usize] = Landmark::new(x + dx, hip_y, 1.0);
        pose.landmarks[shoulder as usize] = Landmark::new(x + dx, hip_y - TORSO, 1.0);
    }
    pose.landmarks[Nose as usize] = Landmark::new(0.5 + dx, hip_y - TORSO - 0.1, 1.0);
    pose
}

/// Side-on sit-up with the trunk folded to `fold` degrees at the hip
/// (shoulder-hip-knee), knees bent and head in line with the back.
pub fn sit_up_pose(fold: f32) -> Pose {
    use LandmarkIndex::*;
    let mut pose = Pose::new([Landmark::new(0.5, 0.5, 1.0); LandmarkIndex::COUNT]);
    let rad = fold.to_radians();
    let (hip_x, hip_y) = (0.5, 0.8);
    let (dx, dy) = (rad.cos(), -rad.sin());

    for (hip, knee, shoulder) in [
        (LeftHip, LeftKnee, LeftShoulder),
        (RightHip, RightKnee, RightShoulder),
    ] {
        pose.landmarks[hip as usize] = Landmark::new(hip_x, hip_y, 1.0);
        pose.landmarks[knee as usize] = Landmark::new(hip_x + THIGH, hip_y, 1.0);
        pose.landmarks[shoulder as usize] =
            Landmark::new(hip_x + TORSO * dx, hip_y + TORSO * dy, 1.0);
    }
    pose.landmarks[Nose as usize] =
        Landmark::new(hip_x + (TORSO + 0.1) * dx, hip_y + (TORSO + 0.1) * dy, 1.0);
    pose
}

/// Sit-up counter with the built-in tuning and no smoothing
pub fn sit_up_counter() -> RepCounter {
    let mut config = ExerciseConfig::for_exercise(Exercise::SitUp);
    config.smoothing_window = 1;
    RepCounter::new(Exercise::SitUp, config).expect("valid sit-up config")
}

/// Squat counter with the 160/100/10 thresholds and the given window
pub fn squat_counter(window: usize) -> RepCounter {
    let mut config = ExerciseConfig::for_exercise(Exercise::Squat);
    config.top_min_angle = 160.0;
    config.bottom_max_angle = 100.0;
    config.hysteresis_buffer = 10.0;
    config.smoothing_window = window;
    RepCounter::new(Exercise::Squat, config).expect("valid squat config")
}
