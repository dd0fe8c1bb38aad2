use super::types::AnalysisResult;
use crate::error::AnalysisError;
use async_trait::async_trait;

/// External vision/LLM service that describes an image
#[async_trait]
pub trait AnalysisClient: Send {
    /// Analyze a JPEG-encoded image. The call is bounded by the client's own
    /// timeout; any non-success response is an `AnalysisError`.
    async fn analyze(
        &mut self,
        jpeg: &[u8],
        prompt: &str,
    ) -> Result<AnalysisResult, AnalysisError>;

    /// Provider name for logs
    fn name(&self) -> &'static str;
}

/// Client used when analysis is turned off; every call yields `Empty`
#[derive(Debug, Default)]
pub struct DisabledClient;

#[async_trait]
impl AnalysisClient for DisabledClient {
    async fn analyze(
        &mut self,
        _jpeg: &[u8],
        _prompt: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        Ok(AnalysisResult::Empty)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
