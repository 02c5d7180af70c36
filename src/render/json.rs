use anyhow::Result;
use serde::Serialize;
use std::io::{self, Stdout, Write};

use super::Renderer;
use crate::pose::Pose;
use crate::tracker::{FrameOutput, SessionSummary};

/// One JSON object per frame, then the summary as the final line
pub struct JsonRenderer<W: Write = Stdout> {
    out: W,
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: &'a SessionSummary,
}

impl JsonRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn draw(&mut self, _pose: &Pose, overlay: &FrameOutput) -> Result<()> {
        serde_json::to_writer(&mut self.out, overlay)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self, summary: &SessionSummary) -> Result<()> {
        serde_json::to_writer(&mut self.out, &SummaryLine { summary })?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{Exercise, RepCounter};

    #[test]
    fn test_frame_fields() {
        let counter = RepCounter::with_defaults(Exercise::Squat).unwrap();
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.draw(&Pose::default(), &counter.output()).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["count"], 0);
        assert_eq!(value["phase"], "unknown");
        assert_eq!(value["quality"], "");
        assert_eq!(value["status"], "tracking");
        assert!(value["rep"].is_null());
    }

    #[test]
    fn test_summary_line() {
        let counter = RepCounter::with_defaults(Exercise::SitUp).unwrap();
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.finish(&counter.session().summary()).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["summary"]["exercise"], "situp");
        assert_eq!(value["summary"]["count"], 0);
    }
}
