use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::form::{FormCheck, QualityGrade};
use super::phase::{Phase, PhaseEvent, Transition};
use crate::error::ConfigError;
use crate::pose::Pose;

/// Supported bodyweight exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    PushUp,
    Squat,
    SitUp,
}

impl Exercise {
    pub const ALL: [Exercise; 3] = [Exercise::PushUp, Exercise::Squat, Exercise::SitUp];

    /// Config key
    pub fn key(&self) -> &'static str {
        match self {
            Exercise::PushUp => "pushup",
            Exercise::Squat => "squat",
            Exercise::SitUp => "situp",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Exercise::PushUp => "push-ups",
            Exercise::Squat => "squats",
            Exercise::SitUp => "sit-ups",
        }
    }

    /// Joint angle driving the phase machine, before smoothing.
    ///
    /// Push-up: mean elbow angle. Squat: the more flexed knee. Sit-up: the
    /// shoulder-hip-knee fold.
    pub fn joint_angle(&self, pose: &Pose) -> Option<f32> {
        match self {
            Exercise::PushUp => pose.elbow_angles().mean(),
            Exercise::Squat => pose.knee_angles().min(),
            Exercise::SitUp => pose.trunk_angle(),
        }
    }

    pub fn default_checks(&self) -> Vec<FormCheck> {
        match self {
            Exercise::PushUp => vec![
                FormCheck::BodyLine,
                FormCheck::WristsUnderShoulders,
                FormCheck::ElbowSymmetry,
                FormCheck::Depth,
            ],
            Exercise::Squat => vec![
                FormCheck::KneeAlignment,
                FormCheck::HeelsDown,
                FormCheck::KneeSymmetry,
                FormCheck::TorsoLean,
                FormCheck::Depth,
            ],
            Exercise::SitUp => vec![
                FormCheck::BackStraight,
                FormCheck::ShouldersLevel,
                FormCheck::Depth,
            ],
        }
    }

    pub fn phase_label(&self, phase: Phase) -> &'static str {
        match (self, phase) {
            (_, Phase::Unknown) => "unknown",
            (Exercise::PushUp, Phase::Top) => "up",
            (Exercise::PushUp, Phase::Descending) => "going down",
            (Exercise::PushUp, Phase::Bottom) => "down",
            (Exercise::PushUp, Phase::Ascending) => "coming up",
            (Exercise::Squat, Phase::Top) => "standing",
            (Exercise::Squat, Phase::Descending) => "squatting down",
            (Exercise::Squat, Phase::Bottom) => "deep squat",
            (Exercise::Squat, Phase::Ascending) => "standing up",
            (Exercise::SitUp, Phase::Top) => "lying back",
            (Exercise::SitUp, Phase::Descending) => "curling up",
            (Exercise::SitUp, Phase::Bottom) => "sitting up",
            (Exercise::SitUp, Phase::Ascending) => "lowering",
        }
    }

    pub fn start_prompt(&self) -> &'static str {
        match self {
            Exercise::PushUp => "Position yourself in a plank position to start",
            Exercise::Squat => "Position yourself so your full lower body is visible",
            Exercise::SitUp => "Position yourself so your full upper body is visible",
        }
    }

    pub fn partial_detection_message(&self) -> &'static str {
        match self {
            Exercise::Squat => "Cannot detect full lower body. Please adjust position.",
            Exercise::PushUp | Exercise::SitUp => "Cannot detect full body. Please adjust position.",
        }
    }

    pub fn degenerate_message(&self) -> &'static str {
        "Joints overlap in view. Please adjust position."
    }

    /// Shown while the angle sits between the thresholds before the first
    /// classification
    pub fn unknown_prompt(&self) -> &'static str {
        match self {
            Exercise::Squat => "Move to either standing or squat position to start.",
            Exercise::PushUp | Exercise::SitUp => "Move to either up or down position to start.",
        }
    }

    pub fn good_form_message(&self) -> &'static str {
        match self {
            Exercise::Squat => "Great form! Keep it up.",
            Exercise::PushUp | Exercise::SitUp => "Good form! Keep your core engaged",
        }
    }

    /// Message for a transition; `None` for completion, which is graded instead
    pub fn transition_message(&self, transition: &Transition) -> Option<&'static str> {
        use Exercise::*;
        let msg = match (self, transition.event, transition.to) {
            (_, PhaseEvent::Completed, _) => return None,
            (PushUp, PhaseEvent::Entered, Phase::Top) => "Starting position good. Begin your pushup.",
            (PushUp, PhaseEvent::Entered, _) => "Starting in down position. Push up to begin.",
            (Squat, PhaseEvent::Entered, Phase::Top) => "Standing position detected. Begin your squat.",
            (Squat, PhaseEvent::Entered, _) => "Starting in squat position. Stand up to begin.",
            (SitUp, PhaseEvent::Entered, Phase::Top) => "Starting position good. Begin your sit-up.",
            (SitUp, PhaseEvent::Entered, _) => "Starting in up position. Lower back down to begin.",
            (PushUp, PhaseEvent::AttemptStarted, _) => "Going down - keep your body straight!",
            (Squat, PhaseEvent::AttemptStarted, _) => "Going down - keep heels on ground!",
            (SitUp, PhaseEvent::AttemptStarted, _) => "Curling up - keep your back straight!",
            (PushUp, PhaseEvent::ReachedBottom, _) => "Good depth! Now push back up smoothly.",
            (Squat, PhaseEvent::ReachedBottom, _) => "Good depth! Now push back up.",
            (SitUp, PhaseEvent::ReachedBottom, _) => "Good crunch! Now lower back down with control.",
            (PushUp, PhaseEvent::Rising, _) => "Coming up - keep your core engaged!",
            (Squat, PhaseEvent::Rising, _) => "Coming up - keep chest up!",
            (SitUp, PhaseEvent::Rising, _) => "Lowering - engage your core!",
            (SitUp, PhaseEvent::Abandoned, Phase::Top) => "Incomplete rep - curl all the way up.",
            (_, PhaseEvent::Abandoned, Phase::Top) => "Incomplete rep - try to go lower.",
            (PushUp, PhaseEvent::Abandoned, _) => "Try again - push all the way up.",
            (Squat, PhaseEvent::Abandoned, _) => "Try again - stand all the way up.",
            (SitUp, PhaseEvent::Abandoned, _) => "Try again - lower all the way down.",
        };
        Some(msg)
    }

    pub fn check_feedback(&self, check: FormCheck) -> &'static str {
        match check {
            FormCheck::BodyLine => "Try to keep your body in a straight line",
            FormCheck::WristsUnderShoulders => "Position your wrists directly under your shoulders",
            FormCheck::ElbowSymmetry => "Bend both arms evenly",
            FormCheck::KneeAlignment => "Keep knees aligned with feet, don't let them cave in",
            FormCheck::HeelsDown => "Keep your heels down on the ground",
            FormCheck::KneeSymmetry => "Keep your weight even on both legs",
            FormCheck::TorsoLean => "Try to keep your back more upright",
            FormCheck::BackStraight => "Try to keep your back straighter",
            FormCheck::ShouldersLevel => "Avoid twisting - keep shoulders level",
            FormCheck::Depth => match self {
                Exercise::PushUp => "Try to go lower, aim for 90° at the elbow",
                Exercise::Squat => "Go deeper! Aim for parallel thighs to ground.",
                Exercise::SitUp => "Curl up further toward your knees",
            },
        }
    }

    pub fn grade_message(&self, grade: QualityGrade) -> &'static str {
        match (self, grade) {
            (Exercise::PushUp, QualityGrade::Excellent) => "Excellent form! Perfect pushup.",
            (Exercise::PushUp, QualityGrade::Good) => "Good form! Try to maintain body alignment.",
            (Exercise::PushUp, QualityGrade::Fair) => {
                "Decent pushup. Focus on keeping your body straight."
            }
            (Exercise::Squat, QualityGrade::Excellent) => "Excellent form! Perfect squat.",
            (Exercise::Squat, QualityGrade::Good) => "Good form! Try to maintain consistent depth.",
            (Exercise::Squat, QualityGrade::Fair) => {
                "Decent squat. Focus on keeping knees aligned with feet."
            }
            (Exercise::SitUp, QualityGrade::Excellent) => "Excellent form! Perfect sit-up.",
            (Exercise::SitUp, QualityGrade::Good) => "Good form! Try to maintain consistent motion.",
            (Exercise::SitUp, QualityGrade::Fair) => {
                "Decent sit-up. Focus on keeping your back straight."
            }
            (_, QualityGrade::Poor) => "Try to maintain better form throughout the movement.",
        }
    }

    pub fn milestone_message(&self, count: u32) -> String {
        format!("{} {} completed! Keep going!", count, self.plural())
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Exercise {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        match normalized.trim_end_matches('s') {
            "pushup" => Ok(Exercise::PushUp),
            "squat" => Ok(Exercise::Squat),
            "situp" => Ok(Exercise::SitUp),
            _ => Err(ConfigError::UnknownExercise(s.to_string())),
        }
    }
}
