mod builder;
#[cfg(all(feature = "camera", target_os = "linux"))]
mod gstreamer;
mod interface;
mod mock;
mod snapshot;

pub use builder::open_source;
#[cfg(all(feature = "camera", target_os = "linux"))]
pub use gstreamer::GstFrameSource;
pub use interface::{redact_url, FrameSource, SourceId};
pub use mock::{ScriptedFrameSource, ScriptedItem};
pub use snapshot::HttpSnapshotSource;
