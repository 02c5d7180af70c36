use anyhow::Result;
use std::io::{self, Stdout, Write};

use super::Renderer;
use crate::pose::Pose;
use crate::tracker::{DetectionStatus, FrameOutput, SessionSummary};

/// Human-readable status line, printed only when something visible changes
pub struct ConsoleRenderer<W: Write = Stdout> {
    out: W,
    last: Option<(u32, &'static str, String, DetectionStatus)>,
}

impl ConsoleRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn format_angle(angle: Option<f32>) -> String {
    angle.map_or_else(|| "  -".to_string(), |a| format!("{:>3.0}", a))
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn draw(&mut self, _pose: &Pose, overlay: &FrameOutput) -> Result<()> {
        let key = (
            overlay.count,
            overlay.phase_label,
            overlay.feedback.clone(),
            overlay.status,
        );
        if self.last.as_ref() == Some(&key) {
            return Ok(());
        }
        self.last = Some(key);

        write!(
            self.out,
            "reps {:>3} | {:<14} | {}° | {}",
            overlay.count,
            overlay.phase_label,
            format_angle(overlay.current_angle),
            overlay.feedback
        )?;
        if let Some(rep) = &overlay.rep {
            write!(self.out, " [score {} {}]", rep.score, rep.grade.as_str())?;
        }
        writeln!(self.out)?;
        if let (Some(milestone), Some(_)) = (&overlay.milestone, &overlay.rep) {
            writeln!(self.out, "*** {} ***", milestone)?;
        }
        Ok(())
    }

    fn finish(&mut self, summary: &SessionSummary) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "=== {} session ===", summary.exercise)?;
        writeln!(self.out, "reps:      {}", summary.count)?;
        if let Some(avg) = summary.average_score {
            writeln!(self.out, "avg score: {:.0}", avg)?;
        }
        if let Some(quality) = summary.quality {
            writeln!(self.out, "last rep:  {}", quality.as_str())?;
        }
        writeln!(self.out, "abandoned: {}", summary.abandoned_attempts)?;
        writeln!(self.out, "calories:  {:.1} kcal", summary.calories)?;
        writeln!(self.out, "elapsed:   {:.1}s", summary.elapsed_secs)?;
        self.out.flush()?;
        Ok(())
    }
}
