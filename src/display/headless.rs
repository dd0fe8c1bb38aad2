use super::signals::{shutdown_signal, spawn_quit_listener};
use super::{LiveView, ViewCommand};
use crate::frame::Frame;

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// View without a terminal: frames are only traced and Ctrl-C or SIGTERM
/// requests quit
pub struct HeadlessView {
    quit_requested: Arc<AtomicBool>,
    signal_task: Option<tokio::task::JoinHandle<()>>,
}

impl HeadlessView {
    /// Create the view and listen for Ctrl-C and SIGTERM. Must be called
    /// from within a tokio runtime.
    pub fn new() -> Self {
        let quit_requested = Arc::new(AtomicBool::new(false));
        let signal_task =
            spawn_quit_listener(Arc::clone(&quit_requested), shutdown_signal());

        Self {
            quit_requested,
            signal_task: Some(signal_task),
        }
    }

    /// Handle that requests quit when set, as the signal handler does
    pub fn quit_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.quit_requested)
    }
}

#[async_trait]
impl LiveView for HeadlessView {
    fn show(&mut self, frame: &Frame) {
        trace!("Frame {} ({}x{})", frame.id, frame.width(), frame.height());
    }

    async fn poll_command(&mut self, timeout: Duration) -> Option<ViewCommand> {
        if !self.quit_requested.load(Ordering::Relaxed) {
            // Yield so the signal task can run on a current-thread runtime
            tokio::time::sleep(timeout).await;
        }

        if self.quit_requested.load(Ordering::Relaxed) {
            Some(ViewCommand::Quit)
        } else {
            None
        }
    }

    fn close(&mut self) {
        if let Some(task) = self.signal_task.take() {
            task.abort();
        }
    }
}
