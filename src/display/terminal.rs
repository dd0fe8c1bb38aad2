use super::signals::{shutdown_signal, spawn_quit_listener};
use super::{LiveView, ViewCommand};
use crate::error::{MotionVisionError, Result};
use crate::frame::Frame;

use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, SetTitle};
use crossterm::execute;
use std::io::stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Raw-mode terminal view: live status in the window title, single-key
/// commands. SIGTERM also quits since raw mode swallows Ctrl-C as a key.
pub struct TerminalView {
    raw_mode: bool,
    quit_requested: Arc<AtomicBool>,
    signal_task: Option<tokio::task::JoinHandle<()>>,
}

impl TerminalView {
    pub fn open() -> Result<Self> {
        enable_raw_mode().map_err(|e| {
            MotionVisionError::component("terminal_view", format!("Failed to enable raw mode: {}", e))
        })?;

        info!("Terminal view active - press 'q' to quit, 's' to analyze the current frame");

        let quit_requested = Arc::new(AtomicBool::new(false));
        let signal_task = spawn_quit_listener(Arc::clone(&quit_requested), shutdown_signal());

        Ok(Self {
            raw_mode: true,
            quit_requested,
            signal_task: Some(signal_task),
        })
    }
}

#[async_trait]
impl LiveView for TerminalView {
    fn show(&mut self, frame: &Frame) {
        let title = format!(
            "motion-vision | frame {} | {}x{} | luma {:.0}",
            frame.id,
            frame.width(),
            frame.height(),
            frame.mean_brightness()
        );
        if let Err(e) = execute!(stdout(), SetTitle(title)) {
            debug!("Failed to update terminal title: {}", e);
        }
    }

    async fn poll_command(&mut self, timeout: Duration) -> Option<ViewCommand> {
        if self.quit_requested.load(Ordering::Relaxed) {
            return Some(ViewCommand::Quit);
        }

        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key_event)) => map_key(key_event),
                Ok(_) => None,
                Err(e) => {
                    warn!("Error reading keyboard event: {}", e);
                    None
                }
            },
            Ok(false) => None,
            Err(e) => {
                warn!("Error polling for keyboard events: {}", e);
                None
            }
        }
    }

    fn close(&mut self) {
        if let Some(task) = self.signal_task.take() {
            task.abort();
        }
        if !self.raw_mode {
            return;
        }
        self.raw_mode = false;
        if let Err(e) = disable_raw_mode() {
            error!("Failed to disable raw mode: {}", e);
        } else {
            debug!("Raw mode disabled");
        }
    }

    fn line_ending(&self) -> &'static str {
        if self.raw_mode {
            "\r\n"
        } else {
            "\n"
        }
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        self.close();
    }
}

/// Translate a key press into a view command
pub(crate) fn map_key(key_event: KeyEvent) -> Option<ViewCommand> {
    // Only handle key press events (not release)
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    match key_event.code {
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ViewCommand::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(ViewCommand::Quit),
        KeyCode::Char('s') => Some(ViewCommand::AnalyzeNow),
        other => {
            debug!("Key pressed: {:?}", other);
            None
        }
    }
}
