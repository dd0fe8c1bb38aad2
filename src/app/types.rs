use std::fmt;
use std::path::PathBuf;

/// Position of the loop within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Capturing,
    MotionCheck,
    Skip,
    Analyzing,
    SkipAnalysis,
    Displaying,
    Stopped,
}

/// Why the loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    CaptureFailure(String),
    UserQuit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndOfStream => write!(f, "end of stream"),
            StopReason::CaptureFailure(details) => write!(f, "capture failure: {}", details),
            StopReason::UserQuit => write!(f, "quit requested"),
        }
    }
}

/// What happened to the analysis step of a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    NotAttempted,
    Performed,
    SkippedCoolingDown,
    Failed(String),
}

/// Record of one completed tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub frame_id: u64,
    /// 1-based sampler index
    pub frame_index: u64,
    /// Whether the detector ran on this frame
    pub processed: bool,
    pub motion: bool,
    pub snapshot: Option<PathBuf>,
    pub analysis: AnalysisOutcome,
    pub manual: bool,
}

impl TickOutcome {
    pub(super) fn new(frame_id: u64, frame_index: u64) -> Self {
        Self {
            frame_id,
            frame_index,
            processed: false,
            motion: false,
            snapshot: None,
            analysis: AnalysisOutcome::NotAttempted,
            manual: false,
        }
    }
}

/// Counters accumulated over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames_seen: u64,
    pub frames_processed: u64,
    pub motion_events: u64,
    pub snapshots_written: u64,
    pub analyses_performed: u64,
    pub analyses_skipped: u64,
    pub analysis_failures: u64,
}
