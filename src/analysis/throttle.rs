use super::client::AnalysisClient;
use super::types::AnalysisResult;
use crate::error::AnalysisError;

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::debug;

/// Wraps a client with its own minimum interval between provider calls.
/// Calls inside the interval return `RateLimited` without reaching the provider.
pub struct ThrottledClient<C> {
    inner: C,
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl<C: AnalysisClient> ThrottledClient<C> {
    pub fn new(inner: C, min_interval: Duration) -> Self {
        Self {
            inner,
            min_interval,
            last_call: None,
        }
    }

    fn permits(&self, now: Instant) -> bool {
        self.last_call
            .map_or(true, |last| now.saturating_duration_since(last) >= self.min_interval)
    }
}

#[async_trait]
impl<C: AnalysisClient> AnalysisClient for ThrottledClient<C> {
    async fn analyze(
        &mut self,
        jpeg: &[u8],
        prompt: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let now = Instant::now();
        if !self.permits(now) {
            debug!(
                "{} client throttled ({:?} minimum interval)",
                self.inner.name(),
                self.min_interval
            );
            return Ok(AnalysisResult::RateLimited);
        }

        self.last_call = Some(now);
        self.inner.analyze(jpeg, prompt).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::mock::RecordingClient;

    #[tokio::test]
    async fn test_second_call_inside_interval_is_rate_limited() {
        let inner = RecordingClient::new(vec![Ok(AnalysisResult::Empty), Ok(AnalysisResult::Empty)]);
        let calls = inner.calls();
        let mut client = ThrottledClient::new(inner, Duration::from_secs(60));

        assert_eq!(
            client.analyze(b"jpeg", "prompt").await.unwrap(),
            AnalysisResult::Empty
        );
        assert_eq!(
            client.analyze(b"jpeg", "prompt").await.unwrap(),
            AnalysisResult::RateLimited
        );
        assert_eq!(calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_interval_passes_everything_through() {
        let inner = RecordingClient::new(vec![]);
        let calls = inner.calls();
        let mut client = ThrottledClient::new(inner, Duration::ZERO);

        for _ in 0..3 {
            client.analyze(b"jpeg", "prompt").await.unwrap();
        }
        assert_eq!(calls.lock().len(), 3);
        assert_eq!(client.name(), "recording");
    }
}
