#![forbid(unsafe_code)]

use crate::{AbrEvent, PlaybackEvent};

/// Unified event for a playback session.
///
/// Hierarchical: each subsystem has its own variant with a sub-enum.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Variant selection event.
    Abr(AbrEvent),
    /// Engine notification.
    Playback(PlaybackEvent),
}

impl From<AbrEvent> for Event {
    fn from(e: AbrEvent) -> Self {
        Self::Abr(e)
    }
}

impl From<PlaybackEvent> for Event {
    fn from(e: PlaybackEvent) -> Self {
        Self::Playback(e)
    }
}
