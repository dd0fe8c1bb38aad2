//! Line-oriented console report: motion events, cooldown notices and
//! analysis results. Diagnostics go through `tracing`; this is the
//! user-facing channel.

use crate::analysis::{AnalysisResult, Scored};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const SEPARATOR_WIDTH: usize = 50;

pub struct ConsoleReport {
    out: Box<dyn Write + Send>,
    line_ending: &'static str,
}

impl ConsoleReport {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            line_ending: "\n",
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Raw-mode terminals need "\r\n" to return the cursor
    pub fn set_line_ending(&mut self, line_ending: &'static str) {
        self.line_ending = line_ending;
    }

    pub fn started(&mut self, source: &str) {
        self.line(&format!("Processing video feed from {}", source));
        self.line("Press 'q' to quit, 's' to analyze the current frame");
    }

    pub fn motion_detected(&mut self, largest_region: u32, snapshot: Option<&Path>) {
        self.line(&format!("Motion detected! (largest region {} px)", largest_region));
        if let Some(path) = snapshot {
            self.line(&format!("Saved snapshot {}", path.display()));
        }
    }

    pub fn analysis_skipped(&mut self, remaining: Duration) {
        self.line(&format!(
            "Analysis skipped, cooling down ({:.1}s remaining)",
            remaining.as_secs_f64()
        ));
    }

    pub fn analysis_failed(&mut self, reason: &str) {
        self.line(&format!("Analysis failed: {}", reason));
    }

    pub fn analysis_result(&mut self, prompt: &str, result: &AnalysisResult) {
        self.line("");
        self.line("Analysis Results:");
        self.line(&format!("Custom Question: {}", prompt));
        if result.is_empty() {
            self.line("");
            self.line("No analysis result");
        } else {
            self.result_body(result);
        }
        self.line("");
        self.line(&"=".repeat(SEPARATOR_WIDTH));
        self.line("");
    }

    pub fn stopped(&mut self, reason: &str) {
        self.line(&format!("Stopped: {}", reason));
    }

    fn result_body(&mut self, result: &AnalysisResult) {
        match result {
            AnalysisResult::Objects(objects) => self.scored_list("Detected Objects:", objects),
            AnalysisResult::Labels(labels) => self.scored_list("Detected Labels:", labels),
            AnalysisResult::Text(Some(text)) => {
                self.line("");
                self.line("Detected Text:");
                for text_line in text.lines() {
                    self.line(text_line);
                }
            }
            AnalysisResult::Text(None) => {}
            AnalysisResult::Description(description) => {
                self.line("");
                self.line("Description:");
                for text_line in description.lines() {
                    self.line(text_line);
                }
            }
            AnalysisResult::RateLimited => {
                self.line("");
                self.line("Rate limited by the analysis client, no result");
            }
            AnalysisResult::Empty => {}
            AnalysisResult::Composite(parts) => {
                for part in parts {
                    self.result_body(part);
                }
            }
        }
    }

    fn scored_list(&mut self, heading: &str, items: &[Scored]) {
        self.line("");
        self.line(heading);
        for item in items {
            self.line(&format!("- {} (confidence: {:.2})", item.name, item.confidence));
        }
    }

    fn line(&mut self, text: &str) {
        let result = write!(self.out, "{}{}", text, self.line_ending).and_then(|_| self.out.flush());
        if let Err(e) = result {
            debug!("Console write failed: {}", e);
        }
    }
}

/// In-memory writer whose contents can be read back, for capturing reports
#[derive(Clone, Default)]
pub struct SharedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
