pub mod console;
pub mod json;

use anyhow::Result;

use crate::pose::Pose;
use crate::tracker::{FrameOutput, SessionSummary};

pub use console::ConsoleRenderer;
pub use json::JsonRenderer;

/// Consumer of per-frame engine output
pub trait Renderer {
    fn draw(&mut self, pose: &Pose, overlay: &FrameOutput) -> Result<()>;

    /// Called once after the stream ends
    fn finish(&mut self, _summary: &SessionSummary) -> Result<()> {
        Ok(())
    }
}
