#![forbid(unsafe_code)]

use std::{collections::HashSet, sync::Arc};

use tracing::{debug, trace, warn};

use crate::{AbrError, AbrResult, VariantInfo, VariantRef};

/// Renditions below this bitrate are not worth offering (placeholders at 0 excepted).
pub const FLOOR_BITRATE_BPS: u64 = 100_000;

/// Deduplicated, bitrate-ordered, floor-filtered set of variants.
///
/// Built once per session and immutable afterwards. Entries are strictly
/// ascending by bitrate.
#[derive(Clone, Debug, Default)]
pub struct VariantCatalog {
    entries: Vec<VariantRef>,
}

impl VariantCatalog {
    /// Build with the default [`FLOOR_BITRATE_BPS`].
    pub fn build(raw: &[VariantRef]) -> AbrResult<Self> {
        Self::build_with_floor(raw, FLOOR_BITRATE_BPS)
    }

    /// Build from the engine's variant list.
    ///
    /// Fails if the variants do not share one program id. Equal bitrates keep
    /// the earlier entry. After sorting, the lowest entry is dropped while it is
    /// nonzero and below `floor_bps`; this may empty the catalog.
    pub fn build_with_floor(raw: &[VariantRef], floor_bps: u64) -> AbrResult<Self> {
        if let Some(first) = raw.first() {
            let expected = first.program_id;
            if let Some(other) = raw.iter().find(|v| v.program_id != expected) {
                warn!(
                    %expected,
                    found = %other.program_id,
                    "variant catalog rejected: mixed program ids"
                );
                return Err(AbrError::MixedProgramIds {
                    expected,
                    found: other.program_id,
                });
            }
        }

        let mut seen = HashSet::with_capacity(raw.len());
        let mut entries: Vec<VariantRef> = raw
            .iter()
            .filter(|v| seen.insert(v.bitrate_bps))
            .cloned()
            .collect();
        let deduped = entries.len();

        entries.sort_by_key(|v| v.bitrate_bps);

        let below_floor = entries
            .iter()
            .take_while(|v| v.bitrate_bps != 0 && v.bitrate_bps < floor_bps)
            .count();
        entries.drain(..below_floor);

        debug!(
            input = raw.len(),
            duplicates = raw.len() - deduped,
            below_floor,
            kept = entries.len(),
            floor_bps,
            "variant catalog built"
        );

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariantRef> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&VariantRef> {
        self.entries.get(index)
    }

    pub fn lowest(&self) -> Option<&VariantRef> {
        self.entries.first()
    }

    /// Membership by reference identity, not by bitrate.
    pub fn contains(&self, variant: &VariantRef) -> bool {
        self.entries.iter().any(|v| Arc::ptr_eq(v, variant))
    }

    /// Round a suggestion down to the nearest catalog rung.
    ///
    /// Members are returned as-is. Otherwise the result is the highest entry
    /// whose bitrate does not exceed the suggestion, the lowest entry if the
    /// suggestion is below all of them. `None` only for an empty catalog.
    pub fn snap(&self, suggested: &VariantRef) -> Option<VariantRef> {
        if self.contains(suggested) {
            return Some(Arc::clone(suggested));
        }
        if self.entries.is_empty() {
            return None;
        }

        let bps = suggested.bitrate_bps;
        let mut idx = 0;
        while idx + 1 < self.entries.len() && self.entries[idx + 1].bitrate_bps <= bps {
            idx += 1;
        }

        let snapped = &self.entries[idx];
        trace!(
            suggested_bps = bps,
            snapped_bps = snapped.bitrate_bps,
            "snapped suggestion to catalog"
        );
        Some(Arc::clone(snapped))
    }

    /// Lowest entry strictly above `bitrate_bps`.
    pub fn next_above(&self, bitrate_bps: u64) -> Option<&VariantRef> {
        self.entries.iter().find(|v| v.bitrate_bps > bitrate_bps)
    }

    /// Highest entry strictly below `bitrate_bps`.
    pub fn next_below(&self, bitrate_bps: u64) -> Option<&VariantRef> {
        self.entries
            .iter()
            .take_while(|v| v.bitrate_bps < bitrate_bps)
            .last()
    }

    pub fn infos(&self) -> Vec<VariantInfo> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, v)| VariantInfo {
                index,
                bitrate_bps: v.bitrate_bps,
                name: v.name.clone(),
                uri: v.uri.clone(),
            })
            .collect()
    }
}
