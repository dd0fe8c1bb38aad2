mod client;
pub mod gemini;
pub mod google_vision;
mod mock;
mod throttle;
mod types;

pub use client::{AnalysisClient, DisabledClient};
pub use gemini::GeminiClient;
pub use google_vision::GoogleVisionClient;
pub use mock::{RecordedCall, RecordingClient};
pub use throttle::ThrottledClient;
pub use types::{AnalysisResult, Scored};

use crate::config::{saturating_seconds, AnalysisConfig, AnalysisProvider};
use crate::error::AnalysisError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

/// Build the configured analysis client, wrapped in its internal throttle when set
pub fn build_client(config: &AnalysisConfig) -> Result<Box<dyn AnalysisClient>, AnalysisError> {
    let timeout = Duration::from_secs(config.timeout_seconds);

    let client: Box<dyn AnalysisClient> = match config.provider {
        AnalysisProvider::GoogleVision => {
            let client =
                GoogleVisionClient::new(config.api_key.clone(), config.endpoint.clone(), timeout)?;
            wrap(client, config.client_min_interval_seconds)
        }
        AnalysisProvider::Gemini => {
            let client = GeminiClient::new(
                config.api_key.clone(),
                config.model.clone(),
                config.endpoint.clone(),
                timeout,
            )?;
            wrap(client, config.client_min_interval_seconds)
        }
        AnalysisProvider::Disabled => Box::new(DisabledClient),
    };

    info!(
        "Analysis client ready: {} (timeout {:?})",
        client.name(),
        timeout
    );
    Ok(client)
}

fn wrap<C: AnalysisClient + 'static>(
    client: C,
    min_interval_seconds: Option<f64>,
) -> Box<dyn AnalysisClient> {
    match min_interval_seconds {
        Some(seconds) if seconds > 0.0 => Box::new(ThrottledClient::new(
            client,
            saturating_seconds(seconds),
        )),
        _ => Box::new(client),
    }
}

pub(crate) fn build_http_client(
    provider: &'static str,
    timeout: Duration,
) -> Result<Client, AnalysisError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| AnalysisError::Request { provider, source })
}

/// POST a JSON payload with the API key header and return the decoded body
pub(crate) async fn post_json(
    client: &Client,
    provider: &'static str,
    url: &str,
    api_key: &str,
    payload: &Value,
) -> Result<Value, AnalysisError> {
    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .json(payload)
        .send()
        .await
        .map_err(|source| AnalysisError::Request { provider, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AnalysisError::Status {
            provider,
            status: status.as_u16(),
            body: truncate(&body, 512),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| AnalysisError::Decode {
            provider,
            details: e.to_string(),
        })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis_config(provider: AnalysisProvider) -> AnalysisConfig {
        let mut config = crate::config::MotionVisionConfig::default().analysis;
        config.provider = provider;
        config.api_key = "key".to_string();
        config
    }

    #[test]
    fn test_build_each_provider() {
        assert_eq!(
            build_client(&analysis_config(AnalysisProvider::GoogleVision))
                .unwrap()
                .name(),
            "google_vision"
        );
        assert_eq!(
            build_client(&analysis_config(AnalysisProvider::Gemini))
                .unwrap()
                .name(),
            "gemini"
        );
        assert_eq!(
            build_client(&analysis_config(AnalysisProvider::Disabled))
                .unwrap()
                .name(),
            "disabled"
        );
    }

    #[test]
    fn test_throttled_client_keeps_provider_name() {
        let mut config = analysis_config(AnalysisProvider::Gemini);
        config.client_min_interval_seconds = Some(2.0);

        assert_eq!(build_client(&config).unwrap().name(), "gemini");
    }

    #[test]
    fn test_huge_throttle_interval_does_not_panic() {
        let mut config = analysis_config(AnalysisProvider::Gemini);
        config.client_min_interval_seconds = Some(1e30);

        assert_eq!(build_client(&config).unwrap().name(), "gemini");
    }

    #[tokio::test]
    async fn test_disabled_client_returns_empty() {
        let mut client = DisabledClient;
        assert_eq!(
            client.analyze(b"jpeg", "prompt").await.unwrap(),
            AnalysisResult::Empty
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
