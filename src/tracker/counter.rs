//! Per-frame rep counting engine: gate -> angle -> smoother -> phase machine ->
//! form evaluator -> session.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use super::exercise::Exercise;
use super::form::{serialize_grade, FormEvaluator, QualityGrade};
use super::gate::LandmarkGate;
use super::phase::{Phase, PhaseEvent, PhaseMachine, Thresholds, Transition};
use super::session::{RepRecord, Session};
use super::smooth::AngleSmoother;
use crate::config::ExerciseConfig;
use crate::error::ConfigError;
use crate::pose::Pose;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    Tracking,
    /// A required landmark fell below the visibility threshold
    PartialDetection,
    /// Joint angle undefined (coincident landmarks)
    DegenerateGeometry,
}

/// Snapshot handed to the renderer after every frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    pub count: u32,
    pub phase: Phase,
    pub phase_label: &'static str,
    /// Smoothed joint angle, degrees
    pub current_angle: Option<f32>,
    #[serde(serialize_with = "serialize_grade")]
    pub quality: Option<QualityGrade>,
    pub score: Option<u8>,
    pub feedback: String,
    pub status: DetectionStatus,
    pub last_rep_duration_secs: Option<f32>,
    pub rest_secs: Option<f32>,
    pub calories: f32,
    pub milestone: Option<String>,
    /// Set only on the frame that completed a rep
    pub rep: Option<RepRecord>,
}

pub struct RepCounter {
    exercise: Exercise,
    config: ExerciseConfig,
    gate: LandmarkGate,
    smoother: AngleSmoother,
    machine: PhaseMachine,
    form: FormEvaluator,
    session: Session,
    current_angle: Option<f32>,
    /// Last tracking-frame message; masked while the gate fails
    feedback: String,
    status: DetectionStatus,
}

impl RepCounter {
    pub fn new(exercise: Exercise, config: ExerciseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            exercise,
            gate: LandmarkGate::new(config.required_landmarks.clone(), config.visibility_threshold),
            smoother: AngleSmoother::new(config.smoothing_window),
            machine: PhaseMachine::new(thresholds(&config)),
            form: FormEvaluator::new(
                config.form_checks.clone(),
                config.depth_max_angle,
                config.visibility_threshold,
            ),
            session: Session::new(exercise),
            current_angle: None,
            feedback: exercise.start_prompt().to_string(),
            status: DetectionStatus::Tracking,
            config,
        })
    }

    /// Counter with the built-in tuning for `exercise`
    pub fn with_defaults(exercise: Exercise) -> Result<Self, ConfigError> {
        Self::new(exercise, ExerciseConfig::for_exercise(exercise))
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Raw samples currently in the smoothing window, oldest first
    pub fn angle_window(&self) -> Vec<f32> {
        self.smoother.samples().collect()
    }

    /// Replace the tuning. Validation failure leaves the counter untouched;
    /// success restarts the session.
    pub fn configure(&mut self, config: ExerciseConfig) -> Result<(), ConfigError> {
        *self = Self::new(self.exercise, config)?;
        Ok(())
    }

    /// Back to the initial state. Idempotent.
    pub fn reset(&mut self) {
        self.smoother.clear();
        self.machine.reset();
        self.form.reset();
        self.session.reset();
        self.current_angle = None;
        self.feedback = self.exercise.start_prompt().to_string();
        self.status = DetectionStatus::Tracking;
    }

    /// Current state without a completion event
    pub fn output(&self) -> FrameOutput {
        let phase = self.machine.phase();
        FrameOutput {
            count: self.session.count(),
            phase,
            phase_label: self.exercise.phase_label(phase),
            current_angle: self.current_angle,
            quality: self.session.quality(),
            score: self.session.last_score(),
            feedback: match self.status {
                DetectionStatus::Tracking => self.feedback.clone(),
                DetectionStatus::PartialDetection => {
                    self.exercise.partial_detection_message().to_string()
                }
                DetectionStatus::DegenerateGeometry => self.exercise.degenerate_message().to_string(),
            },
            status: self.status,
            last_rep_duration_secs: self.session.last_rep_duration().map(|d| d.as_secs_f32()),
            rest_secs: self.session.rest().map(|d| d.as_secs_f32()),
            calories: self.session.calories(),
            milestone: self.session.milestone().map(str::to_string),
            rep: None,
        }
    }

    /// Feed one pose captured at `timestamp` (since stream start)
    pub fn process_frame(&mut self, pose: &Pose, timestamp: Duration) -> FrameOutput {
        self.session.observe_frame(timestamp);

        if !self.gate.is_usable(pose) {
            debug!(
                missing = ?self.gate.missing(pose),
                avg_visibility = pose.average_visibility(),
                "required landmarks not visible"
            );
            self.status = DetectionStatus::PartialDetection;
            return self.output();
        }

        let raw = match self.exercise.joint_angle(pose) {
            Some(angle) => angle,
            None => {
                debug!("degenerate joint geometry, frame skipped");
                self.status = DetectionStatus::DegenerateGeometry;
                return self.output();
            }
        };

        self.status = DetectionStatus::Tracking;
        let smoothed = self.smoother.push(raw);
        self.current_angle = Some(smoothed);

        let transition = self.machine.update(smoothed);
        let mut rep = None;
        if let Some(t) = transition {
            debug!(
                from = t.from.as_str(),
                to = t.to.as_str(),
                angle = smoothed,
                "phase change"
            );
            rep = self.apply_transition(t, timestamp);
        }
        self.form.observe_angle(raw);

        let phase = self.machine.phase();
        if phase == Phase::Top {
            self.session.update_rest(timestamp);
        }

        let failing = if phase.is_transition() {
            self.form.check_frame(pose, phase)
        } else {
            None
        };

        self.feedback = match (failing, transition, &rep) {
            (Some(check), _, _) => self.exercise.check_feedback(check).to_string(),
            (None, _, Some(rep)) => self.exercise.grade_message(rep.grade).to_string(),
            (None, Some(t), None) => self
                .exercise
                .transition_message(&t)
                .unwrap_or_else(|| self.exercise.good_form_message())
                .to_string(),
            (None, None, None) if phase.is_transition() => {
                self.exercise.good_form_message().to_string()
            }
            (None, None, None) if phase == Phase::Unknown => {
                self.exercise.unknown_prompt().to_string()
            }
            (None, None, None) => std::mem::take(&mut self.feedback),
        };

        let mut output = self.output();
        output.rep = rep;
        output
    }

    fn apply_transition(&mut self, t: Transition, at: Duration) -> Option<RepRecord> {
        match t.event {
            PhaseEvent::AttemptStarted => {
                self.form.discard();
                self.form.open();
                self.session.start_attempt(at);
            }
            PhaseEvent::Rising => {
                // attempt that began at Bottom: nothing was opened on the way down
                if !self.form.is_open() {
                    self.form.open_from(self.smoother.samples());
                    self.session.start_attempt(at);
                }
            }
            PhaseEvent::Abandoned => {
                self.form.discard();
                self.session.abandon_attempt();
            }
            PhaseEvent::Completed => {
                let report = self.form.finalize();
                let rep = self
                    .session
                    .complete_rep(report, at, self.config.calories_per_rep)
                    .clone();
                info!(
                    exercise = %self.exercise,
                    count = rep.number,
                    score = rep.score,
                    grade = rep.grade.as_str(),
                    "rep completed"
                );
                return Some(rep);
            }
            PhaseEvent::ReachedBottom | PhaseEvent::Entered => {}
        }
        None
    }
}

fn thresholds(config: &ExerciseConfig) -> Thresholds {
    Thresholds {
        top_min: config.top_min_angle,
        bottom_max: config.bottom_max_angle,
        buffer: config.hysteresis_buffer,
    }
}
