use super::client::AnalysisClient;
use super::types::AnalysisResult;
use crate::error::AnalysisError;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// A call observed by the recording client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub image_len: usize,
    pub prompt: String,
}

/// Analysis client that records calls and replays scripted responses.
/// Once the script runs out every call returns `Empty`.
pub struct RecordingClient {
    responses: VecDeque<Result<AnalysisResult, AnalysisError>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingClient {
    pub fn new(responses: Vec<Result<AnalysisResult, AnalysisError>>) -> Self {
        Self {
            responses: responses.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the call log
    pub fn calls(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl AnalysisClient for RecordingClient {
    async fn analyze(
        &mut self,
        jpeg: &[u8],
        prompt: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.calls.lock().push(RecordedCall {
            image_len: jpeg.len(),
            prompt: prompt.to_string(),
        });
        self.responses
            .pop_front()
            .unwrap_or(Ok(AnalysisResult::Empty))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
