//! Gemini `generateContent` client: prompt plus inline JPEG, free-text answer.

use super::client::AnalysisClient;
use super::types::AnalysisResult;
use super::{build_http_client, post_json};
use crate::error::AnalysisError;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const PROVIDER: &str = "gemini";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        endpoint: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        Ok(Self {
            client: build_http_client(PROVIDER, timeout)?,
            endpoint: endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            model,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn analyze(
        &mut self,
        jpeg: &[u8],
        prompt: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let payload = build_request(jpeg, prompt);
        debug!(
            "Submitting {} byte image to Gemini model {}",
            jpeg.len(),
            self.model
        );

        let body = post_json(&self.client, PROVIDER, &self.url(), &self.api_key, &payload).await?;
        parse_response(body)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

pub(crate) fn build_request(jpeg: &[u8], prompt: &str) -> Value {
    let data = base64::engine::general_purpose::STANDARD.encode(jpeg);

    json!({
        "contents": [{
            "parts": [
                { "text": prompt },
                { "inline_data": { "mime_type": "image/jpeg", "data": data } }
            ]
        }]
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

pub(crate) fn parse_response(body: Value) -> Result<AnalysisResult, AnalysisError> {
    let response: GenerateResponse =
        serde_json::from_value(body).map_err(|e| AnalysisError::Decode {
            provider: PROVIDER,
            details: e.to_string(),
        })?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AnalysisError::Provider {
            provider: PROVIDER,
            message: format!("prompt blocked: {}", reason),
        });
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let text = text.trim();
    Ok(if text.is_empty() {
        AnalysisResult::Empty
    } else {
        AnalysisResult::Description(text.to_string())
    })
}
