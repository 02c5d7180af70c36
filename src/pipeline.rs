use anyhow::Result;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::provider::PoseProvider;
use crate::render::Renderer;
use crate::tracker::{RepCounter, SessionSummary};

/// Drain `provider` through `counter`, drawing every frame, and return the
/// session summary. Fails with `PipelineError::NotReady` if the provider
/// cannot produce poses yet.
pub fn run<P, R>(provider: &mut P, renderer: &mut R, counter: &mut RepCounter) -> Result<SessionSummary>
where
    P: PoseProvider + ?Sized,
    R: Renderer + ?Sized,
{
    if !provider.is_ready() {
        return Err(PipelineError::NotReady.into());
    }

    let mut frames = 0usize;
    while let Some(frame) = provider.next_pose()? {
        let output = counter.process_frame(&frame.pose, frame.timestamp);
        renderer.draw(&frame.pose, &output)?;
        frames += 1;
    }
    debug!(frames, "pose stream ended");

    let summary = counter.session().summary();
    info!(
        exercise = %summary.exercise,
        reps = summary.count,
        elapsed = summary.elapsed_secs,
        "session finished"
    );
    renderer.finish(&summary)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Pose;
    use crate::provider::ReplayProvider;
    use crate::render::JsonRenderer;
    use crate::tracker::Exercise;

    #[test]
    fn test_not_ready_provider() {
        let mut provider = ReplayProvider::new(Vec::new());
        provider.set_ready(false);
        let mut renderer = JsonRenderer::new(Vec::new());
        let mut counter = RepCounter::with_defaults(Exercise::Squat).unwrap();

        let err = run(&mut provider, &mut renderer, &mut counter).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::NotReady)
        ));
        assert!(renderer.into_inner().is_empty());
    }

    #[test]
    fn test_every_frame_is_drawn() {
        let mut provider = ReplayProvider::at_fps(vec![Pose::default(); 4], 30);
        let mut renderer = JsonRenderer::new(Vec::new());
        let mut counter = RepCounter::with_defaults(Exercise::Squat).unwrap();

        let summary = run(&mut provider, &mut renderer, &mut counter).unwrap();
        assert_eq!(summary.count, 0);
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        // four frames plus the summary line
        assert_eq!(text.lines().count(), 5);
    }
}
