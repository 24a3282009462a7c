#![forbid(unsafe_code)]

//! Read-only telemetry text for debug overlays.

use std::{fmt, time::Duration};

use ladder_abr::{BitrateCommand, BufferSnapshot, VariantInfo};
use url::Url;

/// Point-in-time telemetry of a session.
#[derive(Clone, Debug)]
pub struct Diagnostics {
    pub buffer: BufferSnapshot,
    /// Catalog entries, empty until the catalog is built.
    pub variants: Vec<VariantInfo>,
    /// Last reported download rendition bitrate.
    pub download_bps: Option<u64>,
    /// Last reported playback rendition bitrate.
    pub playback_bps: Option<u64>,
    /// Media file currently being played.
    pub media_uri: Option<Url>,
    pub command: BitrateCommand,
    /// Playhead position, when the caller knows it.
    pub position: Option<Duration>,
}

impl Diagnostics {
    #[must_use]
    pub fn with_position(mut self, position: Duration) -> Self {
        self.position = Some(position);
        self
    }

    /// `Buffer Level: 42% 12600ms 512KB  Bandwidth:1,500,000 bps Time:00:01:05`
    pub fn buffer_line(&self) -> String {
        let bandwidth = self
            .buffer
            .average_bandwidth_bps
            .map_or_else(|| "-".to_string(), group_thousands);
        let mut line = format!(
            "Buffer Level: {}% {}ms {}KB  Bandwidth:{bandwidth} bps",
            self.buffer.level_percent(),
            self.buffer.buffered_ms(),
            self.buffer.buffered_kib(),
        );
        if let Some(position) = self.position {
            line.push_str(" Time:");
            line.push_str(&clock(position));
        }
        line
    }

    /// `Available: 2 - 500,000 bps; 2,000,000 bps; `, `None` before the catalog exists.
    pub fn variants_line(&self) -> Option<String> {
        if self.variants.is_empty() {
            return None;
        }
        let mut line = format!("Available: {} - ", self.variants.len());
        for info in &self.variants {
            line.push_str(&group_thousands(info.bitrate_bps));
            line.push_str(" bps; ");
        }
        Some(line)
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.buffer_line())?;
        if let Some(line) = self.variants_line() {
            writeln!(f, "{line}")?;
        }
        if let Some(bps) = self.download_bps {
            writeln!(f, "DL Quality: {bps} bps")?;
        }
        if let Some(bps) = self.playback_bps {
            writeln!(f, "PB Quality: {bps} bps")?;
        }
        if let Some(uri) = &self.media_uri {
            writeln!(f, "File: {uri}")?;
        }
        write!(f, "Command: {}", self.command)
    }
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn clock(position: Duration) -> String {
    let secs = position.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
