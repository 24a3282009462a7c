#![forbid(unsafe_code)]

use ladder_abr::BufferSnapshot;
use url::Url;

/// Notifications forwarded from the streaming engine.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent {
    /// Bitrate of the rendition being downloaded changed.
    DownloadBitrateChanged { bps: u64 },
    /// Bitrate of the rendition being played changed.
    PlaybackBitrateChanged { bps: u64 },
    /// Engine moved to another media file.
    MediaFileChanged { uri: Url },
    /// Buffer occupancy update.
    BufferUpdated { snapshot: BufferSnapshot },
}
