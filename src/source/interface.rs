use crate::error::SourceError;
use crate::frame::Frame;
use async_trait::async_trait;
use std::fmt;

/// Pull-based video feed
#[async_trait]
pub trait FrameSource: Send {
    /// Next decoded frame, `None` at end of stream
    async fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Release the underlying device or connection. Safe to call twice.
    fn release(&mut self);

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Opaque source identifier: a local device index or a stream URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceId {
    Device(u32),
    Url(String),
}

impl SourceId {
    /// Parse a configured source string. Only emptiness is rejected.
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SourceError::Unavailable {
                source_id: raw.to_string(),
                details: "source identifier is empty".to_string(),
            });
        }

        Ok(match trimmed.parse::<u32>() {
            Ok(index) => SourceId::Device(index),
            Err(_) => SourceId::Url(trimmed.to_string()),
        })
    }

    pub fn is_rtsp(&self) -> bool {
        matches!(self, SourceId::Url(url) if url.starts_with("rtsp://") || url.starts_with("rtsps://"))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Device(index) => write!(f, "device {}", index),
            SourceId::Url(url) => write!(f, "{}", redact_url(url)),
        }
    }
}

/// Mask the userinfo part of a URL so stream credentials never reach logs,
/// console output or error text
pub fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let authority_end = url[authority_start..]
        .find(['/', '?', '#'])
        .map_or(url.len(), |offset| authority_start + offset);

    match url[authority_start..authority_end].rfind('@') {
        Some(at) => format!(
            "{}***{}",
            &url[..authority_start],
            &url[authority_start + at..]
        ),
        None => url.to_string(),
    }
}
