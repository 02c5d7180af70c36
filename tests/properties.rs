mod common;

use std::time::Duration;

use common::{squat_counter, squat_pose};
use rep_tracker::pose::{angle, Landmark, LandmarkIndex};
use rep_tracker::tracker::{
    AngleSmoother, DetectionStatus, FrameOutput, Phase, QualityGrade, RepCounter,
};

fn approx_eq_f32(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

fn run_angles(counter: &mut RepCounter, angles: &[f32]) -> Vec<FrameOutput> {
    angles
        .iter()
        .enumerate()
        .map(|(i, &a)| counter.process_frame(&squat_pose(a), Duration::from_millis(i as u64 * 100)))
        .collect()
}

#[test]
fn test_angle_reference_values() {
    let a = Landmark::new(0.0, 0.0, 1.0);
    let b = Landmark::new(1.0, 0.0, 1.0);
    let c = Landmark::new(2.0, 0.0, 1.0);
    assert!(approx_eq_f32(angle(&a, &b, &c), 180.0, 1e-3));

    let up = Landmark::new(1.0, 1.0, 1.0);
    assert!(approx_eq_f32(angle(&a, &b, &up), 90.0, 1e-3));
}

#[test]
fn test_smoothing_converges_exactly() {
    let mut smoother = AngleSmoother::new(5);
    for v in [10.0, 170.0, 30.0, 90.0] {
        smoother.push(v);
    }
    let mut last = 0.0;
    for _ in 0..5 {
        last = smoother.push(120.0);
    }
    assert_eq!(last, 120.0);
}

#[test]
fn test_full_cycle_counts_one_rep() {
    let mut counter = squat_counter(1);
    let outputs = run_angles(&mut counter, &[170.0, 170.0, 90.0, 90.0, 170.0, 170.0]);
    assert_eq!(outputs.last().unwrap().count, 1);
    assert_eq!(outputs.iter().filter(|o| o.rep.is_some()).count(), 1);
}

#[test]
fn test_shallow_dip_changes_nothing() {
    let mut counter = squat_counter(1);
    let outputs = run_angles(&mut counter, &[170.0, 150.0, 170.0]);
    assert!(outputs.iter().all(|o| o.count == 0 && o.phase == Phase::Top));
    assert!(counter.session().score_history().is_empty());
}

#[test]
fn test_threshold_oscillation_stays_top() {
    let mut counter = squat_counter(1);
    let mut angles = vec![161.0];
    for _ in 0..30 {
        angles.extend([159.0, 161.0]);
    }
    let outputs = run_angles(&mut counter, &angles);
    assert!(outputs.iter().all(|o| o.phase == Phase::Top));
    assert_eq!(counter.session().count(), 0);
}

#[test]
fn test_low_visibility_frame_is_ignored() {
    let mut counter = squat_counter(5);
    run_angles(&mut counter, &[170.0, 170.0, 130.0]);
    let phase = counter.phase();
    let window = counter.angle_window();

    let mut pose = squat_pose(95.0);
    pose.landmarks[LandmarkIndex::LeftKnee as usize].visibility = 0.3;
    let out = counter.process_frame(&pose, Duration::from_millis(300));

    assert_eq!(out.status, DetectionStatus::PartialDetection);
    assert_eq!(counter.phase(), phase);
    assert_eq!(counter.angle_window(), window);
    assert_eq!(out.count, 0);
    assert_eq!(
        out.feedback,
        "Cannot detect full lower body. Please adjust position."
    );
}

#[test]
fn test_clean_squat_is_excellent() {
    let mut counter = squat_counter(1);
    let outputs = run_angles(&mut counter, &[165.0, 165.0, 95.0, 95.0, 95.0, 165.0, 165.0]);
    let last = outputs.last().unwrap();

    assert_eq!(last.count, 1);
    assert_eq!(last.quality, Some(QualityGrade::Excellent));
    assert_eq!(last.score, Some(100));
    assert_eq!(last.feedback, "Excellent form! Perfect squat.");
    assert_eq!(counter.session().score_history().len(), 1);

    let json = serde_json::to_value(last).unwrap();
    assert_eq!(json["quality"], "excellent");
}

#[test]
fn test_reset_is_idempotent() {
    let mut counter = squat_counter(5);
    run_angles(&mut counter, &[170.0, 170.0, 90.0, 90.0, 90.0, 170.0, 170.0, 170.0]);

    counter.reset();
    let once = (counter.output(), counter.angle_window(), counter.phase());
    counter.reset();
    let twice = (counter.output(), counter.angle_window(), counter.phase());

    assert_eq!(once, twice);
    assert_eq!(once.0.count, 0);
    assert_eq!(once.0.quality, None);
    assert!(once.1.is_empty());
    assert_eq!(once.2, Phase::Unknown);
}
