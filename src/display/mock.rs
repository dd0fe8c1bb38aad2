use super::{LiveView, ViewCommand};
use crate::frame::Frame;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Test view that replays one scripted poll result per tick and records
/// which frames were shown
pub struct ScriptedView {
    commands: VecDeque<Option<ViewCommand>>,
    shown: Arc<Mutex<Vec<u64>>>,
    closed: Arc<AtomicBool>,
}

impl ScriptedView {
    pub fn new(commands: Vec<Option<ViewCommand>>) -> Self {
        Self {
            commands: commands.into(),
            shown: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// View that never issues a command
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    pub fn shown_frames(&self) -> Arc<Mutex<Vec<u64>>> {
        Arc::clone(&self.shown)
    }

    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

#[async_trait]
impl LiveView for ScriptedView {
    fn show(&mut self, frame: &Frame) {
        self.shown.lock().push(frame.id);
    }

    async fn poll_command(&mut self, _timeout: Duration) -> Option<ViewCommand> {
        self.commands.pop_front().flatten()
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::Relaxed);
    }
}
