pub mod analysis;
pub mod analyzer;
pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod frame;
pub mod report;
pub mod snapshot;
pub mod source;
pub mod timing;

pub use analysis::{AnalysisClient, AnalysisResult, Scored};
pub use analyzer::{DetectionState, MotionDetector, MotionReport};
pub use app::{LoopSettings, LoopState, LoopStats, MotionLoop, StopReason, TickOutcome};
pub use config::MotionVisionConfig;
pub use display::{LiveView, ViewCommand};
pub use error::{AnalysisError, DetectorError, MotionVisionError, Result, SourceError};
pub use frame::{Frame, GrayFrame};
pub use report::ConsoleReport;
pub use source::{FrameSource, SourceId};
pub use timing::{FrameSampler, RateGate, TimingState};
