//! Pose sources. The estimator itself is external; these read its output.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::error::PoseError;
use crate::pose::{Pose, PoseRecord};

/// Pose plus capture time since the start of the stream
#[derive(Debug, Clone, PartialEq)]
pub struct TimedPose {
    pub pose: Pose,
    pub timestamp: Duration,
}

impl TryFrom<&PoseRecord> for TimedPose {
    type Error = PoseError;

    fn try_from(record: &PoseRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            pose: Pose::try_from(record)?,
            timestamp: Duration::from_millis(record.timestamp_ms),
        })
    }
}

pub trait PoseProvider {
    /// False until the underlying model/source can produce poses
    fn is_ready(&self) -> bool {
        true
    }

    /// Next pose in stream order, `None` at end of stream
    fn next_pose(&mut self) -> Result<Option<TimedPose>>;
}

/// One JSON `PoseRecord` per line. Blank lines are ignored; malformed lines
/// are logged and skipped.
pub struct JsonLinesProvider<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
    skipped: usize,
}

impl JsonLinesProvider<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open pose input {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesProvider<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Lines rejected so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn parse(line: &str) -> Result<TimedPose, PoseError> {
        let record: PoseRecord = serde_json::from_str(line)?;
        TimedPose::try_from(&record)
    }
}

impl<R: BufRead> PoseProvider for JsonLinesProvider<R> {
    fn next_pose(&mut self) -> Result<Option<TimedPose>> {
        loop {
            self.buf.clear();
            let n = self
                .reader
                .read_line(&mut self.buf)
                .with_context(|| format!("failed to read pose input line {}", self.line_no + 1))?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            match Self::parse(line) {
                Ok(pose) => return Ok(Some(pose)),
                Err(e) => {
                    warn!(line = self.line_no, "skipping pose record: {}", e);
                    self.skipped += 1;
                }
            }
        }
    }
}

/// In-memory pose sequence
pub struct ReplayProvider {
    frames: VecDeque<TimedPose>,
    ready: bool,
}

impl ReplayProvider {
    pub fn new(frames: impl IntoIterator<Item = TimedPose>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            ready: true,
        }
    }

    /// Evenly spaced frames at `fps`
    pub fn at_fps(poses: impl IntoIterator<Item = Pose>, fps: u32) -> Self {
        let step = Duration::from_secs(1) / fps.max(1);
        Self::new(poses.into_iter().enumerate().map(|(i, pose)| TimedPose {
            pose,
            timestamp: step * i as u32,
        }))
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }
}

impl PoseProvider for ReplayProvider {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn next_pose(&mut self) -> Result<Option<TimedPose>> {
        Ok(self.frames.pop_front())
    }
}
