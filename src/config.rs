use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::ConfigError;
use crate::pose::LandmarkIndex;
use crate::tracker::{Exercise, FormCheck, MAX_SMOOTHING_WINDOW};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub pushup: ExerciseOverrides,
    #[serde(default)]
    pub squat: ExerciseOverrides,
    #[serde(default)]
    pub situp: ExerciseOverrides,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SessionConfig {
    /// pushup / squat / situp
    #[serde(default = "default_exercise")]
    pub exercise: String,
}

fn default_exercise() -> String { "squat".to_string() }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            exercise: default_exercise(),
        }
    }
}

/// Per-exercise TOML table; unset keys fall back to the built-in values
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ExerciseOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_min_angle: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_max_angle: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hysteresis_buffer: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_landmarks: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_threshold: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothing_window: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_checks: Option<Vec<FormCheck>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_max_angle: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_per_rep: Option<f32>,
}

impl ExerciseOverrides {
    fn apply(&self, base: ExerciseConfig) -> ExerciseConfig {
        ExerciseConfig {
            top_min_angle: self.top_min_angle.unwrap_or(base.top_min_angle),
            bottom_max_angle: self.bottom_max_angle.unwrap_or(base.bottom_max_angle),
            hysteresis_buffer: self.hysteresis_buffer.unwrap_or(base.hysteresis_buffer),
            required_landmarks: self
                .required_landmarks
                .clone()
                .unwrap_or(base.required_landmarks),
            visibility_threshold: self.visibility_threshold.unwrap_or(base.visibility_threshold),
            smoothing_window: self.smoothing_window.unwrap_or(base.smoothing_window),
            form_checks: self.form_checks.clone().unwrap_or(base.form_checks),
            depth_max_angle: self.depth_max_angle.unwrap_or(base.depth_max_angle),
            calories_per_rep: self.calories_per_rep.unwrap_or(base.calories_per_rep),
        }
    }

    fn from_config(config: &ExerciseConfig) -> Self {
        Self {
            top_min_angle: Some(config.top_min_angle),
            bottom_max_angle: Some(config.bottom_max_angle),
            hysteresis_buffer: Some(config.hysteresis_buffer),
            required_landmarks: Some(config.required_landmarks.clone()),
            visibility_threshold: Some(config.visibility_threshold),
            smoothing_window: Some(config.smoothing_window),
            form_checks: Some(config.form_checks.clone()),
            depth_max_angle: Some(config.depth_max_angle),
            calories_per_rep: Some(config.calories_per_rep),
        }
    }
}

/// Resolved tuning for one exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseConfig {
    /// At/above: Top (degrees)
    pub top_min_angle: f32,
    /// At/below: Bottom (degrees)
    pub bottom_max_angle: f32,
    /// Extra margin to leave Top or Bottom
    pub hysteresis_buffer: f32,
    /// BlazePose slot indices that must be visible
    pub required_landmarks: Vec<usize>,
    pub visibility_threshold: f32,
    /// Moving-average length in frames
    pub smoothing_window: usize,
    pub form_checks: Vec<FormCheck>,
    /// Deepest angle must round to this or below for the depth check
    pub depth_max_angle: f32,
    pub calories_per_rep: f32,
}

impl ExerciseConfig {
    pub fn for_exercise(exercise: Exercise) -> Self {
        use LandmarkIndex::*;
        let (top, bottom, buffer, depth, window, visibility, calories, required) = match exercise {
            Exercise::PushUp => (
                150.0,
                100.0,
                10.0,
                90.0,
                10,
                0.5,
                0.6,
                vec![
                    LeftShoulder, RightShoulder, LeftElbow, RightElbow, LeftWrist, RightWrist,
                    LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle,
                ],
            ),
            Exercise::Squat => (
                160.0,
                100.0,
                10.0,
                95.0,
                5,
                0.5,
                0.45,
                vec![LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle],
            ),
            Exercise::SitUp => (
                80.0,
                40.0,
                5.0,
                35.0,
                5,
                0.7,
                0.3,
                vec![LeftShoulder, RightShoulder, LeftHip, RightHip, LeftKnee, RightKnee],
            ),
        };

        Self {
            top_min_angle: top,
            bottom_max_angle: bottom,
            hysteresis_buffer: buffer,
            required_landmarks: required.into_iter().map(|i| i.index()).collect(),
            visibility_threshold: visibility,
            smoothing_window: window,
            form_checks: exercise.default_checks(),
            depth_max_angle: depth,
            calories_per_rep: calories,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("top_min_angle", self.top_min_angle),
            ("bottom_max_angle", self.bottom_max_angle),
            ("depth_max_angle", self.depth_max_angle),
        ] {
            if !(0.0..=180.0).contains(&value) {
                return Err(ConfigError::AngleOutOfRange { name, value });
            }
        }
        if self.bottom_max_angle >= self.top_min_angle {
            return Err(ConfigError::InvertedThresholds {
                top: self.top_min_angle,
                bottom: self.bottom_max_angle,
            });
        }
        if !self.hysteresis_buffer.is_finite() || self.hysteresis_buffer < 0.0 {
            return Err(ConfigError::InvalidBuffer(self.hysteresis_buffer));
        }
        if !(1..=MAX_SMOOTHING_WINDOW).contains(&self.smoothing_window) {
            return Err(ConfigError::InvalidWindow(self.smoothing_window));
        }
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(ConfigError::InvalidVisibility(self.visibility_threshold));
        }
        if self.required_landmarks.is_empty() {
            return Err(ConfigError::EmptyLandmarks);
        }
        if let Some(&i) = self
            .required_landmarks
            .iter()
            .find(|&&i| i >= LandmarkIndex::COUNT)
        {
            return Err(ConfigError::LandmarkOutOfRange(i));
        }
        if !self.calories_per_rep.is_finite() || self.calories_per_rep < 0.0 {
            return Err(ConfigError::InvalidCalories(self.calories_per_rep));
        }
        Ok(())
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Missing or unreadable file falls back to the built-in defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn exercise(&self) -> Result<Exercise, ConfigError> {
        self.session.exercise.parse()
    }

    fn overrides(&self, exercise: Exercise) -> &ExerciseOverrides {
        match exercise {
            Exercise::PushUp => &self.pushup,
            Exercise::Squat => &self.squat,
            Exercise::SitUp => &self.situp,
        }
    }

    /// Built-in values with this file's overrides applied, validated
    pub fn exercise_config(&self, exercise: Exercise) -> Result<ExerciseConfig, ConfigError> {
        let config = self
            .overrides(exercise)
            .apply(ExerciseConfig::for_exercise(exercise));
        config.validate()?;
        Ok(config)
    }

    /// Every key spelled out, for `--print-config`
    pub fn with_defaults() -> Self {
        Self {
            session: SessionConfig::default(),
            pushup: ExerciseOverrides::from_config(&ExerciseConfig::for_exercise(Exercise::PushUp)),
            squat: ExerciseOverrides::from_config(&ExerciseConfig::for_exercise(Exercise::Squat)),
            situp: ExerciseOverrides::from_config(&ExerciseConfig::for_exercise(Exercise::SitUp)),
        }
    }

    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Self::with_defaults()).context("failed to serialize default config")
    }
}
