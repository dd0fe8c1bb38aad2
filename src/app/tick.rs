use super::types::{AnalysisOutcome, LoopState, StopReason, TickOutcome};
use super::MotionLoop;
use crate::display::ViewCommand;
use crate::frame::Frame;
use crate::snapshot;
use chrono::Local;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};

impl MotionLoop {
    /// Run one capture/detect/analyze/display cycle.
    ///
    /// Breaks with the stop reason when the source ends, capture fails, the
    /// detector rejects a frame or the view asks to quit.
    pub async fn tick(&mut self) -> ControlFlow<StopReason, TickOutcome> {
        self.set_state(LoopState::Capturing);
        let frame = match self.source.next_frame().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("Frame source reached end of stream");
                return ControlFlow::Break(StopReason::EndOfStream);
            }
            Err(e) => {
                error!("Frame capture failed: {}", e);
                return ControlFlow::Break(StopReason::CaptureFailure(e.to_string()));
            }
        };
        self.stats.frames_seen += 1;

        // Frame timestamps drive every cooldown decision
        let now = frame.timestamp;
        let (frame_index, sampled) = self.sampler.next_frame();
        let mut outcome = TickOutcome::new(frame.id, frame_index);

        if std::mem::take(&mut self.pending_manual) {
            info!("Manual analysis of frame {}", frame.id);
            outcome.manual = true;
            outcome.analysis = self.analyze_frame(&frame, None, now).await;
        } else if !sampled {
            self.set_state(LoopState::Skip);
        } else if !self.gate.should_check_motion(now) {
            debug!("Frame {}: motion check cooling down", frame.id);
            self.set_state(LoopState::Skip);
        } else {
            self.set_state(LoopState::MotionCheck);
            outcome.processed = true;
            self.stats.frames_processed += 1;

            let report = match self.detector.analyze(&frame) {
                Ok(report) => report,
                Err(e) => {
                    error!("Motion detector rejected frame {}: {}", frame.id, e);
                    return ControlFlow::Break(StopReason::CaptureFailure(e.to_string()));
                }
            };

            if report.motion {
                info!(
                    "Motion detected on frame {} (largest region {} px)",
                    frame.id, report.largest_region
                );
                outcome.motion = true;
                self.stats.motion_events += 1;
                self.gate.record_motion(now);

                let jpeg = self.encode(&frame);
                outcome.snapshot = match &jpeg {
                    Some(bytes) => self.save_snapshot(bytes).await,
                    None => None,
                };
                self.report
                    .motion_detected(report.largest_region, outcome.snapshot.as_deref());

                outcome.analysis = self.analyze_frame(&frame, jpeg, now).await;
            }
        }

        self.set_state(LoopState::Displaying);
        self.view.show(&frame);
        match self.view.poll_command(self.settings.quit_poll).await {
            Some(ViewCommand::Quit) => {
                info!("Quit requested");
                return ControlFlow::Break(StopReason::UserQuit);
            }
            Some(ViewCommand::AnalyzeNow) => {
                debug!("Manual analysis requested for the next frame");
                self.pending_manual = true;
            }
            None => {}
        }

        self.set_state(LoopState::Idle);
        ControlFlow::Continue(outcome)
    }

    /// Call the analysis client unless the API cooldown is active. The call
    /// timestamp is recorded only when a request is actually made.
    async fn analyze_frame(
        &mut self,
        frame: &Frame,
        encoded: Option<Vec<u8>>,
        now: Instant,
    ) -> AnalysisOutcome {
        if !self.gate.should_call_api(now) {
            self.set_state(LoopState::SkipAnalysis);
            let remaining = self.gate.api_cooldown_remaining(now);
            info!(
                "Analysis skipped, cooling down ({:.1}s remaining)",
                remaining.as_secs_f64()
            );
            self.report.analysis_skipped(remaining);
            self.stats.analyses_skipped += 1;
            return AnalysisOutcome::SkippedCoolingDown;
        }

        self.set_state(LoopState::Analyzing);
        let jpeg = match encoded.or_else(|| self.encode(frame)) {
            Some(jpeg) => jpeg,
            None => {
                let reason = "frame could not be encoded".to_string();
                self.report.analysis_failed(&reason);
                self.stats.analysis_failures += 1;
                return AnalysisOutcome::Failed(reason);
            }
        };

        self.gate.record_api_call(now);
        debug!(
            "Sending frame {} ({} bytes) to {}",
            frame.id,
            jpeg.len(),
            self.client.name()
        );

        match self.client.analyze(&jpeg, &self.settings.prompt).await {
            Ok(result) => {
                self.report.analysis_result(&self.settings.prompt, &result);
                self.stats.analyses_performed += 1;
                AnalysisOutcome::Performed
            }
            Err(e) => {
                let reason = e.reason();
                warn!("Analysis via {} failed: {}", self.client.name(), e);
                self.report.analysis_failed(&reason);
                self.stats.analysis_failures += 1;
                AnalysisOutcome::Failed(reason)
            }
        }
    }

    fn encode(&self, frame: &Frame) -> Option<Vec<u8>> {
        match frame.encode_jpeg(self.settings.jpeg_quality) {
            Ok(jpeg) => Some(jpeg),
            Err(e) => {
                warn!("Failed to encode frame {}: {}", frame.id, e);
                None
            }
        }
    }

    async fn save_snapshot(&mut self, jpeg: &[u8]) -> Option<PathBuf> {
        match snapshot::write_snapshot(&self.settings.snapshot_dir, jpeg, Local::now()).await {
            Ok(path) => {
                self.stats.snapshots_written += 1;
                Some(path)
            }
            Err(e) => {
                warn!(
                    "Failed to write snapshot to {}: {}",
                    self.settings.snapshot_dir.display(),
                    e
                );
                None
            }
        }
    }
}
