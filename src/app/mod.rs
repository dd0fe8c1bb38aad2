mod orchestrator;
mod runtime;
mod tick;
mod types;


pub use orchestrator::{LoopSettings, MotionLoop};
pub use types::{AnalysisOutcome, LoopState, LoopStats, StopReason, TickOutcome};
