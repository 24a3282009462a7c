#![forbid(unsafe_code)]

use std::time::Duration;

use parking_lot::Mutex;
use web_time::Instant;

use crate::BandwidthHistory;

/// Consistent view of the buffer state at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferSnapshot {
    /// Media duration downloaded ahead of the playhead.
    pub buffered: Duration,
    pub buffered_bytes: u64,
    /// Buffer length the engine aims for (fixed per session).
    pub target: Duration,
    /// Rolling average of measured download bandwidth.
    pub average_bandwidth_bps: Option<u64>,
    /// When the engine last reported progress.
    pub updated_at: Option<Instant>,
}

impl BufferSnapshot {
    /// Buffer level as a whole percentage of the target (may exceed 100).
    #[expect(clippy::cast_possible_truncation)] // ms of a media buffer fits u64
    pub fn level_percent(&self) -> u64 {
        let target_ms = self.target.as_millis();
        if target_ms == 0 {
            return 0;
        }
        (self.buffered.as_millis() * 100 / target_ms) as u64
    }

    #[expect(clippy::cast_possible_truncation)] // ms of a media buffer fits u64
    pub fn buffered_ms(&self) -> u64 {
        self.buffered.as_millis() as u64
    }

    pub fn buffered_kib(&self) -> u64 {
        self.buffered_bytes / 1024
    }
}

#[derive(Debug)]
struct BufferState {
    buffered: Duration,
    buffered_bytes: u64,
    bandwidth: BandwidthHistory,
    updated_at: Option<Instant>,
}

/// Tracks buffer occupancy and download bandwidth for diagnostics.
///
/// Written by the engine threads, read by diagnostics. All fields live behind
/// one lock so a snapshot never mixes values from different updates. The
/// selector does not consult it.
#[derive(Debug)]
pub struct BufferMonitor {
    target: Duration,
    state: Mutex<BufferState>,
}

impl BufferMonitor {
    pub const DEFAULT_TARGET: Duration = Duration::from_secs(30);

    pub fn new(target: Duration, bandwidth_window: usize) -> Self {
        Self {
            target,
            state: Mutex::new(BufferState {
                buffered: Duration::ZERO,
                buffered_bytes: 0,
                bandwidth: BandwidthHistory::new(bandwidth_window),
                updated_at: None,
            }),
        }
    }

    /// Record the engine's current buffer occupancy.
    pub fn update_buffer(&self, buffered: Duration, buffered_bytes: u64) {
        let mut state = self.state.lock();
        state.buffered = buffered;
        state.buffered_bytes = buffered_bytes;
        state.updated_at = Some(Instant::now());
    }

    /// Feed one bandwidth measurement into the rolling average.
    pub fn record_bandwidth(&self, bps: u64) {
        let mut state = self.state.lock();
        state.bandwidth.push(bps);
        state.updated_at = Some(Instant::now());
    }

    /// Drop buffered content (e.g., on seek). Bandwidth history is kept.
    pub fn reset_buffer(&self) {
        let mut state = self.state.lock();
        state.buffered = Duration::ZERO;
        state.buffered_bytes = 0;
        state.updated_at = Some(Instant::now());
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        let state = self.state.lock();
        BufferSnapshot {
            buffered: state.buffered,
            buffered_bytes: state.buffered_bytes,
            target: self.target,
            average_bandwidth_bps: state.bandwidth.average_bps(),
            updated_at: state.updated_at,
        }
    }
}

impl Default for BufferMonitor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TARGET, BandwidthHistory::DEFAULT_WINDOW)
    }
}
