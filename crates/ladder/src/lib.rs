#![forbid(unsafe_code)]

//! # Ladder
//!
//! Facade crate for playback-side variant selection in adaptive HLS.
//!
//! ## Quick start
//!
//! ```ignore
//! use ladder::prelude::*;
//!
//! let mut session = PlaybackSession::new(SessionConfig::default())?;
//! let operator = session.command_handle();
//!
//! // Engine thread, once per segment boundary:
//! let decision = session.select_next(SelectionContext::new(previous, &suggested, &available))?;
//! let next = decision.resolve(&current);
//!
//! // Operator thread, any time:
//! operator.set(BitrateCommand::Increase);
//! ```

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod abr {
    pub use ladder_abr::*;
}

pub mod events {
    pub use ladder_events::*;
}

// ── Session ─────────────────────────────────────────────────────────────

mod config;
mod diagnostics;
mod error;
mod session;

pub use config::SessionConfig;
pub use diagnostics::{Diagnostics, group_thousands};
pub use error::{SessionError, SessionResult};
pub use ladder_abr::{
    AbrError, AbrResult, BitrateCommand, BufferSnapshot, CommandCell, ProgramId,
    SelectionContext, SelectionDecision, SelectionReason, Variant, VariantRef, VariantSelect,
};
pub use ladder_events::{AbrEvent, Event, PlaybackEvent};
pub use session::PlaybackSession;

// ── Prelude ─────────────────────────────────────────────────────────────

pub mod prelude {
    pub use ladder_abr::{
        BitrateCommand, SelectionContext, SelectionDecision, SelectionReason, Variant,
        VariantRef, VariantSelect,
    };
    pub use ladder_events::{AbrEvent, Event, PlaybackEvent};

    pub use crate::{Diagnostics, PlaybackSession, SessionConfig, SessionError};
}
