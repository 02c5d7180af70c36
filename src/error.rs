use thiserror::Error;

/// Rejected exercise configuration. Raised only at session construction or
/// reconfiguration, never per frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown exercise type: {0:?} (expected pushup, squat or situp)")]
    UnknownExercise(String),

    #[error("bottom_max_angle ({bottom}) must be below top_min_angle ({top})")]
    InvertedThresholds { top: f32, bottom: f32 },

    #[error("{name} = {value} is outside 0..=180 degrees")]
    AngleOutOfRange { name: &'static str, value: f32 },

    #[error("hysteresis_buffer = {0} must be finite and non-negative")]
    InvalidBuffer(f32),

    #[error("smoothing_window = {0} must be between 1 and {max}", max = crate::tracker::MAX_SMOOTHING_WINDOW)]
    InvalidWindow(usize),

    #[error("visibility_threshold = {0} is outside 0..=1")]
    InvalidVisibility(f32),

    #[error("required landmark index {0} is outside the 33-slot pose schema")]
    LandmarkOutOfRange(usize),

    #[error("required_landmarks must not be empty")]
    EmptyLandmarks,

    #[error("calories_per_rep = {0} must be finite and non-negative")]
    InvalidCalories(f32),
}

/// Malformed pose input record
#[derive(Debug, Error)]
pub enum PoseError {
    #[error("pose has {got} landmarks, schema allows at most {expected}")]
    TooManyLandmarks { got: usize, expected: usize },

    #[error("malformed pose record: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pose provider is not ready")]
    NotReady,
}
