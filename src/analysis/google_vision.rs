//! Google Cloud Vision `images:annotate` client.
//!
//! Requests object localization, label detection and text detection in a
//! single call.

use super::client::AnalysisClient;
use super::types::{AnalysisResult, Scored};
use super::{build_http_client, post_json};
use crate::error::AnalysisError;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const PROVIDER: &str = "google_vision";
pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com";

pub struct GoogleVisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleVisionClient {
    pub fn new(
        api_key: String,
        endpoint: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        Ok(Self {
            client: build_http_client(PROVIDER, timeout)?,
            endpoint: endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/v1/images:annotate", self.endpoint)
    }
}

#[async_trait]
impl AnalysisClient for GoogleVisionClient {
    async fn analyze(
        &mut self,
        jpeg: &[u8],
        _prompt: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let payload = build_request(jpeg);
        debug!("Submitting {} byte image to Cloud Vision", jpeg.len());

        let body = post_json(&self.client, PROVIDER, &self.url(), &self.api_key, &payload).await?;
        parse_response(body)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

pub(crate) fn build_request(jpeg: &[u8]) -> Value {
    let content = base64::engine::general_purpose::STANDARD.encode(jpeg);

    json!({
        "requests": [{
            "image": { "content": content },
            "features": [
                { "type": "OBJECT_LOCALIZATION" },
                { "type": "LABEL_DETECTION" },
                { "type": "TEXT_DETECTION" }
            ]
        }]
    })
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    localized_object_annotations: Vec<ObjectAnnotation>,
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct ObjectAnnotation {
    name: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    description: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

pub(crate) fn parse_response(body: Value) -> Result<AnalysisResult, AnalysisError> {
    let response: AnnotateResponse =
        serde_json::from_value(body).map_err(|e| AnalysisError::Decode {
            provider: PROVIDER,
            details: e.to_string(),
        })?;

    let Some(image) = response.responses.into_iter().next() else {
        return Ok(AnalysisResult::Empty);
    };

    if let Some(status) = image.error {
        return Err(AnalysisError::Provider {
            provider: PROVIDER,
            message: status.message,
        });
    }

    let objects = image
        .localized_object_annotations
        .into_iter()
        .map(|o| Scored::new(o.name, o.score))
        .collect();
    let labels = image
        .label_annotations
        .into_iter()
        .map(|l| Scored::new(l.description, l.score))
        .collect();
    // The first text annotation holds the full detected text
    let text = image
        .text_annotations
        .into_iter()
        .next()
        .map(|t| t.description);

    Ok(AnalysisResult::Composite(vec![
        AnalysisResult::Objects(objects),
        AnalysisResult::Labels(labels),
        AnalysisResult::Text(text),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_contains_image_and_features() {
        let request = build_request(&[0xFF, 0xD8, 0xFF, 0xD9]);
        let entry = &request["requests"][0];

        assert_eq!(entry["image"]["content"], "/9j/2Q==");
        let features: Vec<&str> = entry["features"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["type"].as_str().unwrap())
            .collect();
        assert_eq!(
            features,
            vec!["OBJECT_LOCALIZATION", "LABEL_DETECTION", "TEXT_DETECTION"]
        );
    }

    #[test]
    fn test_parse_full_response() {
        let body = json!({
            "responses": [{
                "localizedObjectAnnotations": [
                    { "name": "Person", "score": 0.91, "boundingPoly": {} }
                ],
                "labelAnnotations": [
                    { "description": "Door", "score": 0.87 },
                    { "description": "Porch", "score": 0.62 }
                ],
                "textAnnotations": [
                    { "description": "DELIVERY\n42" },
                    { "description": "DELIVERY" }
                ]
            }]
        });

        let result = parse_response(body).unwrap();
        assert_eq!(
            result,
            AnalysisResult::Composite(vec![
                AnalysisResult::Objects(vec![Scored::new("Person", 0.91)]),
                AnalysisResult::Labels(vec![
                    Scored::new("Door", 0.87),
                    Scored::new("Porch", 0.62)
                ]),
                AnalysisResult::Text(Some("DELIVERY\n42".to_string())),
            ])
        );
    }

    #[test]
    fn test_parse_response_without_annotations() {
        let result = parse_response(json!({ "responses": [{}] })).unwrap();
        assert_eq!(
            result,
            AnalysisResult::Composite(vec![
                AnalysisResult::Objects(vec![]),
                AnalysisResult::Labels(vec![]),
                AnalysisResult::Text(None),
            ])
        );

        assert_eq!(parse_response(json!({})).unwrap(), AnalysisResult::Empty);
    }

    #[test]
    fn test_parse_per_image_error() {
        let body = json!({
            "responses": [{ "error": { "code": 3, "message": "Bad image data." } }]
        });

        match parse_response(body) {
            Err(AnalysisError::Provider { message, .. }) => assert_eq!(message, "Bad image data."),
            other => panic!("Expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client = GoogleVisionClient::new(
            "key".to_string(),
            Some("http://localhost:8080/".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.url(), "http://localhost:8080/v1/images:annotate");
    }
}
