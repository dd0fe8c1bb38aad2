use super::types::{LoopState, LoopStats};
use crate::analysis::{self, AnalysisClient};
use crate::analyzer::MotionDetector;
use crate::config::MotionVisionConfig;
use crate::display::{self, LiveView};
use crate::error::Result;
use crate::report::ConsoleReport;
use crate::source::{self, FrameSource};
use crate::timing::{self, FrameSampler, RateGate, TimingState};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, trace};

/// Settings fixed for the lifetime of a loop
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub prompt: String,
    pub jpeg_quality: u8,
    pub snapshot_dir: PathBuf,
    pub tick_interval: Duration,
    pub quit_poll: Duration,
}

impl LoopSettings {
    pub fn from_config(config: &MotionVisionConfig) -> Self {
        Self {
            prompt: config.analysis.prompt.clone(),
            jpeg_quality: config.output.jpeg_quality,
            snapshot_dir: PathBuf::from(&config.output.snapshot_dir),
            tick_interval: config.timing.tick_interval(),
            quit_poll: config.timing.quit_poll(),
        }
    }
}

/// Motion-gated capture loop. Owns the source, detector, gates, analysis
/// client and live view; nothing is shared across tasks.
pub struct MotionLoop {
    pub(super) settings: LoopSettings,
    pub(super) detector: MotionDetector,
    pub(super) gate: RateGate,
    pub(super) sampler: FrameSampler,

    pub(super) source: Box<dyn FrameSource>,
    pub(super) client: Box<dyn AnalysisClient>,
    pub(super) view: Box<dyn LiveView>,
    pub(super) report: ConsoleReport,

    pub(super) state: LoopState,
    pub(super) pending_manual: bool,
    pub(super) stats: LoopStats,
}

impl MotionLoop {
    /// Assemble a loop around already-opened collaborators
    pub fn new(
        config: &MotionVisionConfig,
        source: Box<dyn FrameSource>,
        client: Box<dyn AnalysisClient>,
        view: Box<dyn LiveView>,
    ) -> Result<Self> {
        let sampler = FrameSampler::new(config.timing.sample_rate)?;
        let mut report = ConsoleReport::stdout();
        report.set_line_ending(view.line_ending());

        Ok(Self {
            settings: LoopSettings::from_config(config),
            detector: MotionDetector::from_config(&config.detector),
            gate: RateGate::from_config(&config.timing),
            sampler,
            source,
            client,
            view,
            report,
            state: LoopState::Idle,
            pending_manual: false,
            stats: LoopStats::default(),
        })
    }

    /// Open the configured source, analysis client and view. Any failure here
    /// is fatal to startup.
    pub async fn from_config(config: &MotionVisionConfig) -> Result<Self> {
        info!("Initializing motion-vision loop");

        let source = source::open_source(&config.source).await?;
        let client = analysis::build_client(&config.analysis)?;
        let view = display::open_view(config.display.mode)?;

        Self::new(config, source, client, view)
    }

    /// Replace the console report channel
    pub fn with_report(mut self, mut report: ConsoleReport) -> Self {
        report.set_line_ending(self.view.line_ending());
        self.report = report;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn timing_state(&self) -> TimingState {
        timing::timing_state(&self.gate, &self.sampler)
    }

    pub fn settings(&self) -> &LoopSettings {
        &self.settings
    }

    pub(super) fn set_state(&mut self, state: LoopState) {
        if self.state != state {
            trace!("Loop state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}
