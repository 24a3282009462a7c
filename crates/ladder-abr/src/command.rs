#![forbid(unsafe_code)]

use std::{
    fmt,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

use thiserror::Error;

/// Operator override applied at the next selection.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum BitrateCommand {
    /// Step one rung up, once.
    Increase = 0,
    /// Step one rung down, once.
    Decrease = 1,
    /// Pick a random rung on every selection.
    Random = 2,
    /// Keep the previous variant.
    Hold = 3,
    /// Follow the heuristic suggestion.
    #[default]
    Auto = 4,
}

impl BitrateCommand {
    /// Increase and Decrease fire once and then settle to Hold.
    pub fn is_one_shot(self) -> bool {
        matches!(self, Self::Increase | Self::Decrease)
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Increase,
            1 => Self::Decrease,
            2 => Self::Random,
            3 => Self::Hold,
            _ => Self::Auto,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Random => "random",
            Self::Hold => "hold",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for BitrateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("Unknown bitrate command: {0}")]
pub struct ParseCommandError(pub String);

impl FromStr for BitrateCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "increase" | "up" => Ok(Self::Increase),
            "decrease" | "down" => Ok(Self::Decrease),
            "random" => Ok(Self::Random),
            "hold" | "do-not-change" => Ok(Self::Hold),
            "auto" => Ok(Self::Auto),
            _ => Err(ParseCommandError(s.to_string())),
        }
    }
}

/// Command as read from a [`CommandCell`], tagged with the write it came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ObservedCommand {
    pub command: BitrateCommand,
    raw: u32,
}

const COMMAND_BITS: u32 = 8;

fn pack(seq: u32, command: BitrateCommand) -> u32 {
    (seq << COMMAND_BITS) | command as u32
}

fn seq_of(raw: u32) -> u32 {
    raw >> COMMAND_BITS
}

#[expect(clippy::cast_possible_truncation)] // low byte holds the command
fn command_of(raw: u32) -> BitrateCommand {
    BitrateCommand::from_u8(raw as u8)
}

/// Shared slot holding the active [`BitrateCommand`].
///
/// Cloning shares the slot: the operator path keeps one clone and writes at
/// any time, the selector reads and resets one-shot commands. Every write
/// bumps a 24-bit sequence stored next to the command, so re-arming the same
/// command is distinguishable from the value the selector read.
#[derive(Clone, Debug)]
pub struct CommandCell {
    inner: Arc<AtomicU32>,
}

impl Default for CommandCell {
    fn default() -> Self {
        Self::new(BitrateCommand::default())
    }
}

impl CommandCell {
    pub fn new(initial: BitrateCommand) -> Self {
        Self {
            inner: Arc::new(AtomicU32::new(pack(0, initial))),
        }
    }

    pub fn get(&self) -> BitrateCommand {
        self.observe().command
    }

    /// Read the command together with its write tag.
    pub fn observe(&self) -> ObservedCommand {
        let raw = self.inner.load(Ordering::Acquire);
        ObservedCommand {
            command: command_of(raw),
            raw,
        }
    }

    /// Replace the active command. Returns the previous one.
    pub fn set(&self, command: BitrateCommand) -> BitrateCommand {
        let previous = self
            .inner
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                Some(pack(seq_of(raw).wrapping_add(1), command))
            })
            .unwrap_or_else(|raw| raw);
        command_of(previous)
    }

    /// Settle a fired one-shot command to Hold.
    ///
    /// Only succeeds while the cell still holds the observed write: any
    /// operator write after the read, including re-arming the same command,
    /// is kept for the next selection.
    pub fn consume_one_shot(&self, fired: ObservedCommand) -> bool {
        if !fired.command.is_one_shot() {
            return false;
        }
        self.inner
            .compare_exchange(
                fired.raw,
                pack(seq_of(fired.raw).wrapping_add(1), BitrateCommand::Hold),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Whether both handles point at the same slot.
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
