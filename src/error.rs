use thiserror::Error;

/// Frame source errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source '{source_id}' unavailable: {details}")]
    Unavailable { source_id: String, details: String },

    #[error("Frame capture failed: {details}")]
    CaptureFailure { details: String },
}

/// Motion detector errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DetectorError {
    #[error("Empty frame ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    #[error("Frame size {actual:?} does not match baseline {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Analysis client errors
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} response could not be decoded: {details}")]
    Decode {
        provider: &'static str,
        details: String,
    },

    #[error("{provider} reported an error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },
}

impl AnalysisError {
    /// Short reason suitable for the console report
    pub fn reason(&self) -> String {
        match self {
            AnalysisError::Request { source, .. } if source.is_timeout() => {
                "request timed out".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum MotionVisionError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

impl MotionVisionError {
    pub fn component<C: Into<String>, M: Into<String>>(component: C, message: M) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MotionVisionError>;
