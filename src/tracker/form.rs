//! Per-rep form checks, accumulated over Descending/Ascending and reduced to a
//! 0-100 score and a grade when the rep completes.

use serde::{Deserialize, Serialize, Serializer};

use super::phase::Phase;
use crate::pose::{angle_from_vertical, try_angle, LandmarkIndex, Pose};

/// Shoulder-hip-ankle may deviate this far from a straight line
pub const BODY_LINE_TOLERANCE: f32 = 15.0;
/// Horizontal wrist-to-shoulder offset (normalized)
pub const WRIST_OFFSET_MAX: f32 = 0.1;
pub const ELBOW_SYMMETRY_MAX: f32 = 20.0;
/// How far a knee may drift inward past its ankle (normalized)
pub const KNEE_CAVE_TOLERANCE: f32 = 0.05;
/// ankle.z - knee.z above this suggests lifted heels
pub const HEEL_LIFT_MAX: f32 = 0.1;
pub const KNEE_SYMMETRY_MAX: f32 = 15.0;
pub const TORSO_LEAN_MAX: f32 = 30.0;
/// Nose-shoulder-hip must stay above this
pub const BACK_STRAIGHT_MIN: f32 = 150.0;
/// Vertical shoulder offset (normalized)
pub const SHOULDER_LEVEL_MAX: f32 = 0.05;

/// Grouping used for feedback precedence; earlier variants win
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    Alignment,
    Depth,
    Symmetry,
    Lean,
}

/// Single structural rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormCheck {
    /// Shoulder, hip and ankle on one line (push-up)
    BodyLine,
    WristsUnderShoulders,
    ElbowSymmetry,
    /// Knees track over the feet instead of caving in (squat)
    KneeAlignment,
    HeelsDown,
    KneeSymmetry,
    TorsoLean,
    /// Head, shoulders and hips in line (sit-up)
    BackStraight,
    ShouldersLevel,
    /// Deepest angle of the attempt reached the depth target. Evaluated once
    /// per rep, not per frame.
    Depth,
}

impl FormCheck {
    pub fn category(self) -> CheckCategory {
        match self {
            FormCheck::BodyLine
            | FormCheck::WristsUnderShoulders
            | FormCheck::KneeAlignment
            | FormCheck::HeelsDown
            | FormCheck::BackStraight => CheckCategory::Alignment,
            FormCheck::Depth => CheckCategory::Depth,
            FormCheck::ElbowSymmetry | FormCheck::KneeSymmetry | FormCheck::ShouldersLevel => {
                CheckCategory::Symmetry
            }
            FormCheck::TorsoLean => CheckCategory::Lean,
        }
    }

    pub fn is_rep_level(self) -> bool {
        matches!(self, FormCheck::Depth)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormCheck::BodyLine => "body_line",
            FormCheck::WristsUnderShoulders => "wrists_under_shoulders",
            FormCheck::ElbowSymmetry => "elbow_symmetry",
            FormCheck::KneeAlignment => "knee_alignment",
            FormCheck::HeelsDown => "heels_down",
            FormCheck::KneeSymmetry => "knee_symmetry",
            FormCheck::TorsoLean => "torso_lean",
            FormCheck::BackStraight => "back_straight",
            FormCheck::ShouldersLevel => "shoulders_level",
            FormCheck::Depth => "depth",
        }
    }

    /// Landmarks a frame-level rule reads
    pub fn inputs(self) -> &'static [LandmarkIndex] {
        use LandmarkIndex::*;
        match self {
            FormCheck::BodyLine => &[LeftShoulder, RightShoulder, LeftHip, RightHip, LeftAnkle, RightAnkle],
            FormCheck::WristsUnderShoulders => &[LeftShoulder, RightShoulder, LeftWrist, RightWrist],
            FormCheck::ElbowSymmetry => &[
                LeftShoulder, RightShoulder, LeftElbow, RightElbow, LeftWrist, RightWrist,
            ],
            FormCheck::KneeAlignment | FormCheck::HeelsDown => {
                &[LeftKnee, RightKnee, LeftAnkle, RightAnkle]
            }
            FormCheck::KneeSymmetry => &[LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle],
            FormCheck::TorsoLean => &[LeftShoulder, RightShoulder, LeftHip, RightHip],
            FormCheck::BackStraight => &[Nose, LeftShoulder, RightShoulder, LeftHip, RightHip],
            FormCheck::ShouldersLevel => &[LeftShoulder, RightShoulder],
            FormCheck::Depth => &[],
        }
    }

    /// Evaluate a frame-level rule. Unmeasurable geometry, including any input
    /// below `visibility_threshold`, passes; rep-level rules always pass here.
    pub fn passes(self, pose: &Pose, visibility_threshold: f32) -> bool {
        use LandmarkIndex::*;
        if !self
            .inputs()
            .iter()
            .all(|&i| pose.get(i).is_visible(visibility_threshold))
        {
            return true;
        }
        match self {
            FormCheck::BodyLine => pose
                .body_line_angle()
                .map_or(true, |a| (180.0 - a).abs() < BODY_LINE_TOLERANCE),
            FormCheck::WristsUnderShoulders => {
                (pose.get(LeftShoulder).x - pose.get(LeftWrist).x).abs() < WRIST_OFFSET_MAX
                    && (pose.get(RightShoulder).x - pose.get(RightWrist).x).abs()
                        < WRIST_OFFSET_MAX
            }
            FormCheck::ElbowSymmetry => pose
                .elbow_angles()
                .difference()
                .map_or(true, |d| d <= ELBOW_SYMMETRY_MAX),
            FormCheck::KneeAlignment => {
                // subject faces the camera: left side of the body is on image right
                pose.get(LeftKnee).x >= pose.get(LeftAnkle).x - KNEE_CAVE_TOLERANCE
                    && pose.get(RightKnee).x <= pose.get(RightAnkle).x + KNEE_CAVE_TOLERANCE
            }
            FormCheck::HeelsDown => {
                pose.get(LeftAnkle).z - pose.get(LeftKnee).z < HEEL_LIFT_MAX
                    && pose.get(RightAnkle).z - pose.get(RightKnee).z < HEEL_LIFT_MAX
            }
            FormCheck::KneeSymmetry => pose
                .knee_angles()
                .difference()
                .map_or(true, |d| d <= KNEE_SYMMETRY_MAX),
            FormCheck::TorsoLean => angle_from_vertical(&pose.hip_center(), &pose.shoulder_center())
                .map_or(true, |a| a <= TORSO_LEAN_MAX),
            FormCheck::BackStraight => {
                try_angle(pose.get(Nose), &pose.shoulder_center(), &pose.hip_center())
                    .map_or(true, |a| a > BACK_STRAIGHT_MIN)
            }
            FormCheck::ShouldersLevel => {
                (pose.get(LeftShoulder).y - pose.get(RightShoulder).y).abs() < SHOULDER_LEVEL_MAX
            }
            FormCheck::Depth => true,
        }
    }
}

/// Discrete bucket of the rep score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityGrade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => QualityGrade::Excellent,
            75..=89 => QualityGrade::Good,
            50..=74 => QualityGrade::Fair,
            _ => QualityGrade::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityGrade::Excellent => "excellent",
            QualityGrade::Good => "good",
            QualityGrade::Fair => "fair",
            QualityGrade::Poor => "poor",
        }
    }
}

/// Serializes a missing grade as the empty string
pub fn serialize_grade<S: Serializer>(grade: &Option<QualityGrade>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(grade.map_or("", |g| g.as_str()))
}

/// Tallies for one rep attempt
#[derive(Debug, Clone, Default)]
pub struct FormAccumulator {
    /// Frames evaluated
    pub total: u32,
    /// Passed count per configured check, same order as the check list
    pub passed: Vec<u32>,
    /// Smallest raw joint angle seen during the attempt
    pub deepest: Option<f32>,
}

impl FormAccumulator {
    fn new(check_count: usize) -> Self {
        Self {
            total: 0,
            passed: vec![0; check_count],
            deepest: None,
        }
    }

    fn observe_angle(&mut self, angle: f32) {
        self.deepest = Some(self.deepest.map_or(angle, |d| d.min(angle)));
    }
}

/// Pass rate of one check over a finished rep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckRate {
    pub check: FormCheck,
    pub rate: u8,
}

/// Finalized quality of one rep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormReport {
    pub score: u8,
    pub grade: QualityGrade,
    pub rates: Vec<CheckRate>,
    pub deepest_angle: Option<f32>,
}

fn percent(passed: u32, total: u32) -> u8 {
    if total == 0 {
        return 100;
    }
    (100.0 * passed as f32 / total as f32).round() as u8
}

/// Runs the exercise's check set while an attempt is open
pub struct FormEvaluator {
    checks: Vec<FormCheck>,
    depth_max_angle: f32,
    visibility_threshold: f32,
    accumulator: Option<FormAccumulator>,
}

impl FormEvaluator {
    pub fn new(checks: Vec<FormCheck>, depth_max_angle: f32, visibility_threshold: f32) -> Self {
        Self {
            checks,
            depth_max_angle,
            visibility_threshold,
            accumulator: None,
        }
    }

    pub fn checks(&self) -> &[FormCheck] {
        &self.checks
    }

    pub fn is_open(&self) -> bool {
        self.accumulator.is_some()
    }

    pub fn accumulator(&self) -> Option<&FormAccumulator> {
        self.accumulator.as_ref()
    }

    /// Start a fresh attempt unless one is already open
    pub fn open(&mut self) {
        if self.accumulator.is_none() {
            self.accumulator = Some(FormAccumulator::new(self.checks.len()));
        }
    }

    /// Open seeded with earlier samples, for attempts that begin at Bottom
    pub fn open_from(&mut self, recent: impl IntoIterator<Item = f32>) {
        self.open();
        for angle in recent {
            self.observe_angle(angle);
        }
    }

    pub fn discard(&mut self) {
        self.accumulator = None;
    }

    pub fn observe_angle(&mut self, angle: f32) {
        if let Some(acc) = self.accumulator.as_mut() {
            acc.observe_angle(angle);
        }
    }

    fn depth_reached(&self, deepest: Option<f32>) -> bool {
        deepest.map_or(false, |d| d.round() <= self.depth_max_angle)
    }

    /// Run every frame-level check on `pose`. Returns the failing check with
    /// the highest precedence, for live feedback.
    pub fn check_frame(&mut self, pose: &Pose, phase: Phase) -> Option<FormCheck> {
        let acc = self.accumulator.as_mut()?;
        acc.total += 1;

        let mut failing: Option<FormCheck> = None;
        for (i, &check) in self.checks.iter().enumerate() {
            let ok = if check.is_rep_level() {
                // depth can only be judged once the subject is on the way back
                phase != Phase::Ascending
                    || acc.deepest.map_or(false, |d| d.round() <= self.depth_max_angle)
            } else {
                let ok = check.passes(pose, self.visibility_threshold);
                if ok {
                    acc.passed[i] += 1;
                }
                ok
            };
            if !ok && failing.map_or(true, |f| check.category() < f.category()) {
                failing = Some(check);
            }
        }
        failing
    }

    /// Close the attempt and score it
    pub fn finalize(&mut self) -> FormReport {
        let acc = self
            .accumulator
            .take()
            .unwrap_or_else(|| FormAccumulator::new(self.checks.len()));

        let rates: Vec<CheckRate> = self
            .checks
            .iter()
            .enumerate()
            .map(|(i, &check)| {
                let rate = if check.is_rep_level() {
                    if self.depth_reached(acc.deepest) { 100 } else { 0 }
                } else {
                    percent(acc.passed[i], acc.total)
                };
                CheckRate { check, rate }
            })
            .collect();

        let score = if rates.is_empty() {
            100
        } else {
            let sum: u32 = rates.iter().map(|r| r.rate as u32).sum();
            (sum as f32 / rates.len() as f32).round() as u8
        };

        FormReport {
            score,
            grade: QualityGrade::from_score(score),
            rates,
            deepest_angle: acc.deepest,
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = None;
    }
}
