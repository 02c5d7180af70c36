use serde::Serialize;

/// Position within one repetition cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Unknown,
    /// Extended / standing / up
    Top,
    Descending,
    /// Flexed / down
    Bottom,
    Ascending,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Unknown => "unknown",
            Phase::Top => "top",
            Phase::Descending => "descending",
            Phase::Bottom => "bottom",
            Phase::Ascending => "ascending",
        }
    }

    /// Phases during which form checks are accumulated
    pub fn is_transition(&self) -> bool {
        matches!(self, Phase::Descending | Phase::Ascending)
    }
}

/// Side effect of a single transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Left Top: a rep attempt begins
    AttemptStarted,
    /// Left Bottom toward Top
    Rising,
    /// Reached Bottom from Descending
    ReachedBottom,
    /// Returned to Top from Ascending: one full rep
    Completed,
    /// Turned back before finishing the excursion
    Abandoned,
    /// First classification out of Unknown
    Entered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub event: PhaseEvent,
}

/// Hysteresis thresholds, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// At/above: fully extended
    pub top_min: f32,
    /// At/below: fully flexed
    pub bottom_max: f32,
    /// Extra margin required to leave Top or Bottom
    pub buffer: f32,
}

/// Angle-driven rep cycle: Unknown -> Top -> Descending -> Bottom -> Ascending -> Top.
///
/// At most one transition per sample. Entering Top/Bottom is immediate; leaving
/// either requires clearing the threshold plus the buffer.
pub struct PhaseMachine {
    thresholds: Thresholds,
    phase: Phase,
}

impl PhaseMachine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            phase: Phase::Unknown,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Feed one smoothed angle; returns the transition taken, if any
    pub fn update(&mut self, angle: f32) -> Option<Transition> {
        let Thresholds {
            top_min,
            bottom_max,
            buffer,
        } = self.thresholds;

        let (to, event) = match self.phase {
            Phase::Unknown if angle >= top_min => (Phase::Top, PhaseEvent::Entered),
            Phase::Unknown if angle <= bottom_max => (Phase::Bottom, PhaseEvent::Entered),
            Phase::Top if angle < top_min - buffer => {
                (Phase::Descending, PhaseEvent::AttemptStarted)
            }
            Phase::Descending if angle <= bottom_max => {
                (Phase::Bottom, PhaseEvent::ReachedBottom)
            }
            Phase::Descending if angle >= top_min => (Phase::Top, PhaseEvent::Abandoned),
            Phase::Bottom if angle > bottom_max + buffer => (Phase::Ascending, PhaseEvent::Rising),
            Phase::Ascending if angle >= top_min => (Phase::Top, PhaseEvent::Completed),
            Phase::Ascending if angle <= bottom_max => (Phase::Bottom, PhaseEvent::Abandoned),
            _ => return None,
        };

        let transition = Transition {
            from: self.phase,
            to,
            event,
        };
        self.phase = to;
        Some(transition)
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Unknown;
    }
}
