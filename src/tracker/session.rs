//! Running totals for one workout session.

use std::time::Duration;

use serde::Serialize;

use super::exercise::Exercise;
use super::form::{serialize_grade, CheckRate, FormReport, QualityGrade};

/// A milestone message is raised every this many reps
pub const MILESTONE_INTERVAL: u32 = 5;
/// Reps faster than this are flagged as rushed
pub const FAST_REP: Duration = Duration::from_secs(1);
/// Reps slower than this are flagged as slow
pub const SLOW_REP: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepPace {
    TooFast,
    Steady,
    Slow,
}

impl RepPace {
    pub fn classify(duration: Duration) -> Self {
        if duration < FAST_REP {
            RepPace::TooFast
        } else if duration > SLOW_REP {
            RepPace::Slow
        } else {
            RepPace::Steady
        }
    }
}

/// One completed repetition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepRecord {
    /// 1-based
    pub number: u32,
    pub score: u8,
    pub grade: QualityGrade,
    pub duration_secs: Option<f32>,
    pub pace: Option<RepPace>,
    pub deepest_angle: Option<f32>,
    pub completed_at_secs: f32,
    pub rates: Vec<CheckRate>,
}

/// End-of-stream report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub exercise: Exercise,
    pub count: u32,
    #[serde(serialize_with = "serialize_grade")]
    pub quality: Option<QualityGrade>,
    pub average_score: Option<f32>,
    pub best_score: Option<u8>,
    pub abandoned_attempts: u32,
    pub calories: f32,
    pub elapsed_secs: f32,
    pub reps: Vec<RepRecord>,
}

pub struct Session {
    exercise: Exercise,
    count: u32,
    score_history: Vec<u8>,
    reps: Vec<RepRecord>,
    quality: Option<QualityGrade>,
    calories: f32,
    milestone: Option<String>,
    abandoned: u32,
    first_frame_at: Option<Duration>,
    last_frame_at: Option<Duration>,
    attempt_started_at: Option<Duration>,
    last_completed_at: Option<Duration>,
    last_rep_duration: Option<Duration>,
    rest: Option<Duration>,
}

impl Session {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            exercise,
            count: 0,
            score_history: Vec::new(),
            reps: Vec::new(),
            quality: None,
            calories: 0.0,
            milestone: None,
            abandoned: 0,
            first_frame_at: None,
            last_frame_at: None,
            attempt_started_at: None,
            last_completed_at: None,
            last_rep_duration: None,
            rest: None,
        }
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn score_history(&self) -> &[u8] {
        &self.score_history
    }

    pub fn reps(&self) -> &[RepRecord] {
        &self.reps
    }

    pub fn quality(&self) -> Option<QualityGrade> {
        self.quality
    }

    pub fn last_score(&self) -> Option<u8> {
        self.score_history.last().copied()
    }

    pub fn calories(&self) -> f32 {
        self.calories
    }

    pub fn milestone(&self) -> Option<&str> {
        self.milestone.as_deref()
    }

    pub fn abandoned_attempts(&self) -> u32 {
        self.abandoned
    }

    pub fn last_rep_duration(&self) -> Option<Duration> {
        self.last_rep_duration
    }

    pub fn rest(&self) -> Option<Duration> {
        self.rest
    }

    pub fn is_attempt_started(&self) -> bool {
        self.attempt_started_at.is_some()
    }

    /// Time between the first and latest frame seen
    pub fn elapsed(&self) -> Duration {
        match (self.first_frame_at, self.last_frame_at) {
            (Some(first), Some(last)) => last.saturating_sub(first),
            _ => Duration::ZERO,
        }
    }

    pub fn average_score(&self) -> Option<f32> {
        if self.score_history.is_empty() {
            return None;
        }
        let sum: u32 = self.score_history.iter().map(|&s| s as u32).sum();
        Some(sum as f32 / self.score_history.len() as f32)
    }

    /// Record frame arrival time
    pub fn observe_frame(&mut self, at: Duration) {
        self.first_frame_at.get_or_insert(at);
        self.last_frame_at = Some(at);
    }

    pub fn start_attempt(&mut self, at: Duration) {
        self.attempt_started_at = Some(at);
        self.milestone = None;
    }

    pub fn abandon_attempt(&mut self) {
        if self.attempt_started_at.take().is_some() {
            self.abandoned += 1;
        }
    }

    /// Refresh the rest timer; only meaningful while resting at Top
    pub fn update_rest(&mut self, now: Duration) {
        if let Some(done) = self.last_completed_at {
            self.rest = Some(now.saturating_sub(done));
        }
    }

    pub fn complete_rep(&mut self, report: FormReport, at: Duration, calories_per_rep: f32) -> &RepRecord {
        let duration = self
            .attempt_started_at
            .take()
            .map(|start| at.saturating_sub(start));

        self.count += 1;
        self.score_history.push(report.score);
        self.quality = Some(report.grade);
        self.calories += calories_per_rep;
        self.last_rep_duration = duration;
        self.last_completed_at = Some(at);
        self.rest = Some(Duration::ZERO);
        self.milestone = if self.count % MILESTONE_INTERVAL == 0 {
            Some(self.exercise.milestone_message(self.count))
        } else {
            None
        };

        let completed_at = at.saturating_sub(self.first_frame_at.unwrap_or(at));
        self.reps.push(RepRecord {
            number: self.count,
            score: report.score,
            grade: report.grade,
            duration_secs: duration.map(|d| d.as_secs_f32()),
            pace: duration.map(RepPace::classify),
            deepest_angle: report.deepest_angle,
            completed_at_secs: completed_at.as_secs_f32(),
            rates: report.rates,
        });
        &self.reps[self.reps.len() - 1]
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            exercise: self.exercise,
            count: self.count,
            quality: self.quality,
            average_score: self.average_score(),
            best_score: self.score_history.iter().copied().max(),
            abandoned_attempts: self.abandoned,
            calories: self.calories,
            elapsed_secs: self.elapsed().as_secs_f32(),
            reps: self.reps.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.exercise);
    }
}
