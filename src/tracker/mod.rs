pub mod counter;
pub mod exercise;
pub mod form;
pub mod gate;
pub mod phase;
pub mod session;
pub mod smooth;

/// Upper bound on `smoothing_window`
pub const MAX_SMOOTHING_WINDOW: usize = 64;

pub use counter::{DetectionStatus, FrameOutput, RepCounter};
pub use exercise::Exercise;
pub use form::{CheckCategory, CheckRate, FormCheck, FormEvaluator, FormReport, QualityGrade};
pub use gate::{is_usable, LandmarkGate};
pub use phase::{Phase, PhaseEvent, PhaseMachine, Thresholds, Transition};
pub use session::{RepPace, RepRecord, Session, SessionSummary};
pub use smooth::AngleSmoother;
