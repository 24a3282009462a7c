#![forbid(unsafe_code)]

//! Configuration for [`PlaybackSession`](crate::PlaybackSession).

use std::time::Duration;

use ladder_abr::{BandwidthHistory, BitrateCommand, BufferMonitor, FLOOR_BITRATE_BPS};

use crate::{SessionError, SessionResult};

/// Settings fixed at session start.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use ladder::{BitrateCommand, SessionConfig};
///
/// let config = SessionConfig::default()
///     .with_target_buffer(Duration::from_secs(20))
///     .with_initial_command(BitrateCommand::Hold)
///     .with_rng_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Buffer length the engine aims for.
    pub target_buffer: Duration,
    /// Renditions below this bitrate are dropped from the catalog (0 is kept).
    pub floor_bitrate_bps: u64,
    /// Number of samples in the rolling bandwidth average.
    pub bandwidth_window: usize,
    /// Capacity of the event channel.
    pub event_capacity: usize,
    /// Command active when the session opens.
    pub initial_command: BitrateCommand,
    /// Seed for the Random command. `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_buffer: BufferMonitor::DEFAULT_TARGET,
            floor_bitrate_bps: FLOOR_BITRATE_BPS,
            bandwidth_window: BandwidthHistory::DEFAULT_WINDOW,
            event_capacity: 64,
            initial_command: BitrateCommand::Auto,
            rng_seed: None,
        }
    }
}

impl SessionConfig {
    pub fn with_target_buffer(mut self, target: Duration) -> Self {
        self.target_buffer = target;
        self
    }

    pub fn with_floor_bitrate(mut self, bps: u64) -> Self {
        self.floor_bitrate_bps = bps;
        self
    }

    pub fn with_bandwidth_window(mut self, samples: usize) -> Self {
        self.bandwidth_window = samples;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn with_initial_command(mut self, command: BitrateCommand) -> Self {
        self.initial_command = command;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Reject settings that make diagnostics meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] for a zero target buffer or an
    /// empty bandwidth window.
    pub fn validate(&self) -> SessionResult<()> {
        if self.target_buffer.is_zero() {
            return Err(SessionError::InvalidConfig(
                "target buffer must be positive".into(),
            ));
        }
        if self.bandwidth_window == 0 {
            return Err(SessionError::InvalidConfig(
                "bandwidth window must hold at least one sample".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.target_buffer, Duration::from_secs(30));
        assert_eq!(config.floor_bitrate_bps, 100_000);
        assert_eq!(config.initial_command, BitrateCommand::Auto);
        assert!(config.rng_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_target_is_rejected() {
        let config = SessionConfig::default().with_target_buffer(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(SessionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_window_is_rejected() {
        let config = SessionConfig::default().with_bandwidth_window(0);
        assert!(config.validate().is_err());
    }
}
