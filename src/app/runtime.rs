use super::types::{LoopState, StopReason};
use super::MotionLoop;
use std::ops::ControlFlow;
use std::time::Instant;
use tracing::{debug, info};

impl MotionLoop {
    /// Run ticks until the loop stops, pacing to the configured frame rate
    pub async fn run(&mut self) -> StopReason {
        let description = self.source.describe();
        info!("motion-vision loop running on {}", description);
        self.report.started(&description);

        let reason = loop {
            let started = Instant::now();

            match self.tick().await {
                ControlFlow::Break(reason) => break reason,
                ControlFlow::Continue(outcome) => debug!(
                    "Tick {} done: processed={} motion={} analysis={:?}",
                    outcome.frame_index, outcome.processed, outcome.motion, outcome.analysis
                ),
            }

            let remaining = self.settings.tick_interval.saturating_sub(started.elapsed());
            if !remaining.is_zero() {
                tokio::time::sleep(remaining).await;
            }
        };

        self.stop(&reason);
        reason
    }

    /// Release the source and close the view. Safe to call more than once.
    pub fn stop(&mut self, reason: &StopReason) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.set_state(LoopState::Stopped);

        self.source.release();
        self.view.close();
        self.report.set_line_ending(self.view.line_ending());
        self.report.stopped(&reason.to_string());

        let stats = self.stats;
        info!(
            "Stopped ({}): {} frames seen, {} processed, {} motion events, {} snapshots, {} analyses, {} skipped, {} failed",
            reason,
            stats.frames_seen,
            stats.frames_processed,
            stats.motion_events,
            stats.snapshots_written,
            stats.analyses_performed,
            stats.analyses_skipped,
            stats.analysis_failures
        );
    }
}
