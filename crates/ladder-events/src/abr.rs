#![forbid(unsafe_code)]

use ladder_abr::{BitrateCommand, SelectionReason, VariantInfo};

/// Events emitted by variant selection.
#[derive(Clone, Debug, PartialEq)]
pub enum AbrEvent {
    /// Catalog frozen from the first non-empty variant list.
    CatalogBuilt { variants: Vec<VariantInfo> },
    /// A variant was chosen for the next segment.
    VariantSelected {
        from_bps: Option<u64>,
        to_bps: u64,
        reason: SelectionReason,
    },
    /// Selection kept the current rendition.
    SelectionUnchanged { reason: SelectionReason },
    /// Operator replaced the active command.
    CommandChanged {
        from: BitrateCommand,
        to: BitrateCommand,
    },
    /// Catalog construction failed.
    Error { error: String },
}
