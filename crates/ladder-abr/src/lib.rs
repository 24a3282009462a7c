//! Variant selection for adaptive HLS playback.
//!
//! The streaming engine calls into this crate once per segment boundary. It
//! passes the previous variant, the bandwidth heuristic's suggestion and the
//! variants on offer, and gets back the variant to download next.
//!
//! ## Components
//!
//! - [`VariantCatalog`]: deduplicated, bitrate-ordered, floor-filtered renditions
//! - [`CommandCell`]: shared operator override ([`BitrateCommand`])
//! - [`VariantSelector`]: the decision algorithm
//! - [`BufferMonitor`]: buffer/bandwidth diagnostics, never consulted by the selector
//!
//! ## Example
//!
//! ```rust
//! use ladder_abr::{
//!     BitrateCommand, CommandCell, ProgramId, SelectionContext, Variant, VariantSelector,
//! };
//! use url::Url;
//!
//! let variant = |bps: u64| {
//!     let uri = Url::parse(&format!("https://cdn.example.com/{bps}.m3u8")).unwrap();
//!     Variant::new(bps, ProgramId(1), uri).into_ref()
//! };
//! let available = vec![variant(500_000), variant(1_000_000), variant(2_000_000)];
//!
//! let command = CommandCell::default();
//! let mut selector = VariantSelector::new(command.clone());
//!
//! // Session start: the suggestion is snapped down to a known rung.
//! let suggested = variant(1_200_000);
//! let first = selector
//!     .select_next(SelectionContext::new(None, &suggested, &available))
//!     .unwrap();
//! assert_eq!(first.next.as_ref().map(|v| v.bitrate_bps), Some(1_000_000));
//!
//! // Operator asks for one step up.
//! command.set(BitrateCommand::Increase);
//! let previous = first.next.unwrap();
//! let next = selector
//!     .select_next(SelectionContext::new(Some(&previous), &suggested, &available))
//!     .unwrap();
//! assert_eq!(next.next.map(|v| v.bitrate_bps), Some(2_000_000));
//! assert_eq!(command.get(), BitrateCommand::Hold);
//! ```

#![forbid(unsafe_code)]

mod bandwidth;
mod catalog;
mod command;
mod error;
mod monitor;
mod selector;
#[cfg(test)]
mod test_support;
mod types;

pub use bandwidth::BandwidthHistory;
pub use catalog::{FLOOR_BITRATE_BPS, VariantCatalog};
pub use command::{BitrateCommand, CommandCell, ObservedCommand, ParseCommandError};
pub use error::{AbrError, AbrResult};
pub use monitor::{BufferMonitor, BufferSnapshot};
pub use selector::{VariantSelect, VariantSelector};
pub use types::{
    ProgramId, SelectionContext, SelectionDecision, SelectionReason, Variant, VariantInfo,
    VariantRef,
};
