#![forbid(unsafe_code)]
#![expect(
    clippy::unwrap_used,
    reason = "test utility crate — unwraps are acceptable"
)]
#![expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "test utility crate — numeric casts are acceptable for PRNG ranges"
)]

//! Shared test utilities for the ladder workspace.

pub mod fixtures;
pub mod rng;

pub use fixtures::*;
pub use rng::*;
