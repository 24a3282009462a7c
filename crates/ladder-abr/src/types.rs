#![forbid(unsafe_code)]

use std::{fmt, sync::Arc};

use url::Url;

/// Program identifier shared by every variant of one presentation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ProgramId(pub u32);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program-{}", self.0)
    }
}

/// One encoded rendition of the stream.
///
/// Variants are produced by the manifest layer and shared as [`VariantRef`].
/// The selector never mutates them; it only reorders and filters references.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variant {
    /// Advertised bitrate in bits per second. `0` marks a placeholder rendition.
    pub bitrate_bps: u64,
    pub program_id: ProgramId,
    /// Media playlist of this rendition.
    pub uri: Url,
    /// Human-readable name (if the manifest provides one).
    pub name: Option<String>,
}

impl Variant {
    pub fn new(bitrate_bps: u64, program_id: ProgramId, uri: Url) -> Self {
        Self {
            bitrate_bps,
            program_id,
            uri,
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Wrap into a shared reference.
    pub fn into_ref(self) -> VariantRef {
        Arc::new(self)
    }
}

/// Shared handle to a [`Variant`].
///
/// Pointer identity of the `Arc` is the rendition identity: two handles with
/// equal fields but different allocations are different renditions.
pub type VariantRef = Arc<Variant>;

/// Variant metadata for diagnostics and events.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariantInfo {
    /// Position in the catalog (ascending bitrate).
    pub index: usize,
    pub bitrate_bps: u64,
    pub name: Option<String>,
    pub uri: Url,
}

/// Inputs of one selection call.
#[derive(Clone, Copy, Debug)]
pub struct SelectionContext<'a> {
    /// Variant of the previous segment. `None` only on the first call of a session.
    pub previous: Option<&'a VariantRef>,
    /// Variant proposed by the bandwidth heuristic.
    pub suggested: &'a VariantRef,
    /// Variants currently offered by the engine.
    pub available: &'a [VariantRef],
}

impl<'a> SelectionContext<'a> {
    pub fn new(
        previous: Option<&'a VariantRef>,
        suggested: &'a VariantRef,
        available: &'a [VariantRef],
    ) -> Self {
        Self {
            previous,
            suggested,
            available,
        }
    }
}

/// Why a selection produced its result.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SelectionReason {
    /// First call of the session: snapped heuristic suggestion.
    Initial,
    /// Snapped heuristic suggestion.
    Auto,
    /// Previous variant kept on purpose.
    Hold,
    /// One-shot step up.
    Increase,
    /// One-shot step down.
    Decrease,
    /// Random pick.
    Random,
    /// Increase/Decrease found no neighbor in the catalog.
    NoCandidate,
    /// No catalog entries to choose from.
    EmptyCatalog,
}

/// Result of one selection call.
///
/// `next == None` means "unchanged": the engine keeps its current rendition.
#[derive(Clone, Debug)]
pub struct SelectionDecision {
    pub next: Option<VariantRef>,
    pub reason: SelectionReason,
}

impl SelectionDecision {
    pub fn switch_to(next: VariantRef, reason: SelectionReason) -> Self {
        Self {
            next: Some(next),
            reason,
        }
    }

    pub fn unchanged(reason: SelectionReason) -> Self {
        Self { next: None, reason }
    }

    pub fn is_unchanged(&self) -> bool {
        self.next.is_none()
    }

    /// Chosen variant, or `current` for the unchanged sentinel.
    pub fn resolve(self, current: &VariantRef) -> VariantRef {
        self.next.unwrap_or_else(|| Arc::clone(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::variant;

    #[test]
    fn unchanged_resolves_to_current() {
        let current = variant(500_000);
        let decision = SelectionDecision::unchanged(SelectionReason::EmptyCatalog);
        assert!(decision.is_unchanged());
        assert!(Arc::ptr_eq(&decision.resolve(&current), &current));
    }

    #[test]
    fn switch_resolves_to_target() {
        let current = variant(500_000);
        let target = variant(1_000_000);
        let decision = SelectionDecision::switch_to(Arc::clone(&target), SelectionReason::Auto);
        assert!(Arc::ptr_eq(&decision.resolve(&current), &target));
    }

    #[test]
    fn equal_fields_are_distinct_references() {
        let a = variant(500_000);
        let b = variant(500_000);
        assert_eq!(*a, *b);
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
