use super::interface::FrameSource;
use crate::error::SourceError;
use crate::frame::Frame;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// One scripted step of a mock source
#[derive(Debug)]
pub enum ScriptedItem {
    Frame(Frame),
    Failure(String),
}

/// Frame source that replays a fixed script, for testing without hardware
pub struct ScriptedFrameSource {
    script: VecDeque<ScriptedItem>,
    released: Arc<AtomicBool>,
    delivered: Arc<AtomicU64>,
}

impl ScriptedFrameSource {
    pub fn new(script: Vec<ScriptedItem>) -> Self {
        Self {
            script: script.into(),
            released: Arc::new(AtomicBool::new(false)),
            delivered: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Source that yields the given frames then ends
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self::new(frames.into_iter().map(ScriptedItem::Frame).collect())
    }

    /// Handle that reports whether `release` was called
    pub fn released_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }

    /// Handle that counts delivered frames
    pub fn delivered_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.delivered)
    }
}

#[async_trait]
impl FrameSource for ScriptedFrameSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        match self.script.pop_front() {
            Some(ScriptedItem::Frame(frame)) => {
                self.delivered.fetch_add(1, Ordering::Relaxed);
                Ok(Some(frame))
            }
            Some(ScriptedItem::Failure(details)) => Err(SourceError::CaptureFailure { details }),
            None => Ok(None),
        }
    }

    fn release(&mut self) {
        debug!("Mock frame source released");
        self.released.store(true, Ordering::Relaxed);
    }

    fn describe(&self) -> String {
        format!("scripted ({} items left)", self.script.len())
    }
}
