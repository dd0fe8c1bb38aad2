mod headless;
mod mock;
mod signals;
mod terminal;

pub use headless::HeadlessView;
pub use mock::ScriptedView;
pub use terminal::TerminalView;

use crate::config::DisplayMode;
use crate::error::Result;
use crate::frame::Frame;
use async_trait::async_trait;
use std::time::Duration;

/// Runtime command delivered through the live view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    /// Stop the loop and release resources
    Quit,
    /// Analyze the next frame regardless of the motion gate
    AnalyzeNow,
}

/// Live feed presentation plus the non-blocking quit/command poll
#[async_trait]
pub trait LiveView: Send {
    /// Present the current frame
    fn show(&mut self, frame: &Frame);

    /// Wait at most `timeout` for a command
    async fn poll_command(&mut self, timeout: Duration) -> Option<ViewCommand>;

    /// Restore the terminal or window. Safe to call twice.
    fn close(&mut self);

    /// Line terminator the console report must use while the view is open
    fn line_ending(&self) -> &'static str {
        "\n"
    }
}

/// Open the configured live view
pub fn open_view(mode: DisplayMode) -> Result<Box<dyn LiveView>> {
    Ok(match mode {
        DisplayMode::Terminal => Box::new(TerminalView::open()?),
        DisplayMode::Headless => Box::new(HeadlessView::new()),
    })
}
