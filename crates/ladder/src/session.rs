#![forbid(unsafe_code)]

//! Playback session: selector, buffer monitor, command slot and events in one place.

use std::{sync::Arc, time::Duration};

use ladder_abr::{
    AbrResult, BitrateCommand, BufferMonitor, CommandCell, SelectionContext, SelectionDecision,
    VariantSelect, VariantSelector,
};
use ladder_events::{AbrEvent, Event, EventBus, PlaybackEvent};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

use crate::{Diagnostics, SessionConfig, SessionResult};

/// Entry point for a streaming engine.
///
/// The engine calls [`select_next`](Self::select_next) at every segment
/// boundary and forwards its notifications through the `on_*` methods. The
/// operator path holds a [`command_handle`](Self::command_handle) and writes
/// commands at any time.
///
/// # Example
///
/// ```
/// use ladder::{BitrateCommand, PlaybackSession, ProgramId, SelectionContext, SessionConfig, Variant};
/// use url::Url;
///
/// let variant = |bps: u64| {
///     let uri = Url::parse(&format!("https://cdn.example.com/{bps}.m3u8")).unwrap();
///     Variant::new(bps, ProgramId(1), uri).into_ref()
/// };
/// let available = vec![variant(500_000), variant(1_000_000)];
///
/// let mut session = PlaybackSession::new(SessionConfig::default()).unwrap();
/// let first = session
///     .select_next(SelectionContext::new(None, &available[1], &available))
///     .unwrap();
/// assert_eq!(first.next.map(|v| v.bitrate_bps), Some(1_000_000));
///
/// session.set_command(BitrateCommand::Decrease);
/// session.on_download_bitrate_changed(500_000);
/// let text = session.diagnostics().to_string();
/// assert!(text.contains("Available: 2"));
/// assert!(text.contains("DL Quality: 500000 bps"));
/// ```
pub struct PlaybackSession {
    selector: VariantSelector,
    command: CommandCell,
    monitor: Arc<BufferMonitor>,
    readouts: Mutex<Readouts>,
    bus: EventBus,
}

/// Last values reported by the engine's notifications.
#[derive(Debug, Default)]
struct Readouts {
    download_bps: Option<u64>,
    playback_bps: Option<u64>,
    media_uri: Option<Url>,
}

impl PlaybackSession {
    /// Open a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`](crate::SessionError::InvalidConfig)
    /// when the config does not validate.
    pub fn new(config: SessionConfig) -> SessionResult<Self> {
        config.validate()?;

        let command = CommandCell::new(config.initial_command);
        let mut selector =
            VariantSelector::new(command.clone()).with_floor(config.floor_bitrate_bps);
        if let Some(seed) = config.rng_seed {
            selector = selector.with_seed(seed);
        }

        info!(
            target_buffer = ?config.target_buffer,
            floor_bps = config.floor_bitrate_bps,
            command = %config.initial_command,
            "playback session opened"
        );

        Ok(Self {
            selector,
            command,
            monitor: Arc::new(BufferMonitor::new(
                config.target_buffer,
                config.bandwidth_window,
            )),
            readouts: Mutex::new(Readouts::default()),
            bus: EventBus::new(config.event_capacity),
        })
    }

    /// Pick the variant for the next segment and publish the outcome.
    ///
    /// # Errors
    ///
    /// Propagates catalog construction failures (mixed program ids).
    pub fn select_next(&mut self, ctx: SelectionContext<'_>) -> AbrResult<SelectionDecision> {
        let had_catalog = self.selector.catalog().is_some();

        let decision = match self.selector.select_next(ctx) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(error = %e, "variant selection failed");
                self.bus.publish(AbrEvent::Error {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        if !had_catalog && self.bus.has_subscribers() {
            if let Some(catalog) = self.selector.catalog() {
                self.bus.publish(AbrEvent::CatalogBuilt {
                    variants: catalog.infos(),
                });
            }
        }

        match &decision.next {
            Some(next) => self.bus.publish(AbrEvent::VariantSelected {
                from_bps: ctx.previous.map(|v| v.bitrate_bps),
                to_bps: next.bitrate_bps,
                reason: decision.reason,
            }),
            None => self.bus.publish(AbrEvent::SelectionUnchanged {
                reason: decision.reason,
            }),
        }

        Ok(decision)
    }

    /// Replace the active command from the operator surface.
    pub fn set_command(&self, command: BitrateCommand) -> BitrateCommand {
        let previous = self.command.set(command);
        debug!(from = %previous, to = %command, "bitrate command changed");
        self.bus.publish(AbrEvent::CommandChanged {
            from: previous,
            to: command,
        });
        previous
    }

    pub fn command(&self) -> BitrateCommand {
        self.command.get()
    }

    /// Shared command slot for an operator running on another thread.
    pub fn command_handle(&self) -> CommandCell {
        self.command.clone()
    }

    /// Buffer monitor for engine threads that report progress directly.
    pub fn monitor(&self) -> Arc<BufferMonitor> {
        Arc::clone(&self.monitor)
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Measured download throughput from the bandwidth estimator.
    pub fn on_bandwidth_sample(&self, bps: u64) {
        self.monitor.record_bandwidth(bps);
    }

    /// Bitrate of the rendition now being downloaded. Display only.
    pub fn on_download_bitrate_changed(&self, bps: u64) {
        self.readouts.lock().download_bps = Some(bps);
        self.bus
            .publish(PlaybackEvent::DownloadBitrateChanged { bps });
    }

    /// Bitrate of the rendition now being played. Display only.
    pub fn on_playback_bitrate_changed(&self, bps: u64) {
        self.readouts.lock().playback_bps = Some(bps);
        self.bus
            .publish(PlaybackEvent::PlaybackBitrateChanged { bps });
    }

    pub fn on_media_file_changed(&self, uri: Url) {
        debug!(%uri, "media file changed");
        self.readouts.lock().media_uri = Some(uri.clone());
        self.bus.publish(PlaybackEvent::MediaFileChanged { uri });
    }

    pub fn on_buffer_progress(&self, buffered: Duration, buffered_bytes: u64) {
        self.monitor.update_buffer(buffered, buffered_bytes);
        if self.bus.has_subscribers() {
            self.bus.publish(PlaybackEvent::BufferUpdated {
                snapshot: self.monitor.snapshot(),
            });
        }
    }

    /// Playhead jumped; buffered content is discarded.
    pub fn on_seek(&self) {
        self.monitor.reset_buffer();
    }

    pub fn diagnostics(&self) -> Diagnostics {
        let readouts = self.readouts.lock();
        Diagnostics {
            buffer: self.monitor.snapshot(),
            variants: self
                .selector
                .catalog()
                .map(|c| c.infos())
                .unwrap_or_default(),
            download_bps: readouts.download_bps,
            playback_bps: readouts.playback_bps,
            media_uri: readouts.media_uri.clone(),
            command: self.command.get(),
            position: None,
        }
    }
}

impl VariantSelect for PlaybackSession {
    fn select_variant(&mut self, ctx: SelectionContext<'_>) -> AbrResult<SelectionDecision> {
        self.select_next(ctx)
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("selector", &self.selector)
            .field("monitor", &self.monitor)
            .finish_non_exhaustive()
    }
}
