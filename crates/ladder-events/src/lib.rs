#![forbid(unsafe_code)]

//! Event bus for ladder playback sessions.

mod abr;
mod bus;
mod event;
mod playback;

pub use abr::AbrEvent;
pub use bus::EventBus;
pub use event::Event;
pub use playback::PlaybackEvent;
