use super::interface::{FrameSource, SourceId};
use super::snapshot::HttpSnapshotSource;
use crate::config::{SourceBackend, SourceConfig};
use crate::error::{Result, SourceError};
use std::time::Duration;
use tracing::info;

/// Open the configured frame source, failing fast if it cannot be reached
pub async fn open_source(config: &SourceConfig) -> Result<Box<dyn FrameSource>> {
    let source_id = SourceId::parse(&config.url)?;
    let timeout = Duration::from_secs(config.timeout_seconds);

    info!("Opening {} via {:?} backend", source_id, config.backend);

    match config.backend {
        SourceBackend::HttpSnapshot => match &source_id {
            SourceId::Url(url) => Ok(Box::new(HttpSnapshotSource::open(url, timeout).await?)),
            SourceId::Device(_) => Err(SourceError::Unavailable {
                source_id: source_id.to_string(),
                details: "http_snapshot backend needs a URL, not a device index".to_string(),
            }
            .into()),
        },
        SourceBackend::Gstreamer => open_gstreamer(source_id, timeout),
    }
}

#[cfg(all(feature = "camera", target_os = "linux"))]
fn open_gstreamer(source_id: SourceId, timeout: Duration) -> Result<Box<dyn FrameSource>> {
    Ok(Box::new(super::gstreamer::GstFrameSource::open(
        source_id, timeout,
    )?))
}

#[cfg(not(all(feature = "camera", target_os = "linux")))]
fn open_gstreamer(source_id: SourceId, _timeout: Duration) -> Result<Box<dyn FrameSource>> {
    Err(SourceError::Unavailable {
        source_id: source_id.to_string(),
        details: "GStreamer backend requires the `camera` feature on Linux".to_string(),
    }
    .into())
}
