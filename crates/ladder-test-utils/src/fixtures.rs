//! Variant fixtures.

use std::sync::Arc;

use ladder_abr::{ProgramId, SelectionContext, Variant, VariantRef};
use url::Url;

use crate::Xorshift64;

/// Program id used by every fixture variant unless stated otherwise.
pub const TEST_PROGRAM: ProgramId = ProgramId(1);

/// Variant of [`TEST_PROGRAM`] with a media playlist URL derived from the bitrate.
pub fn variant(bitrate_bps: u64) -> VariantRef {
    variant_in(TEST_PROGRAM, bitrate_bps)
}

pub fn variant_in(program_id: ProgramId, bitrate_bps: u64) -> VariantRef {
    let uri = Url::parse(&format!(
        "https://cdn.example.com/{}/{bitrate_bps}/index.m3u8",
        program_id.0
    ))
    .unwrap();
    Variant::new(bitrate_bps, program_id, uri).into_ref()
}

/// One variant per bitrate, in the given order.
pub fn variants(bitrates: &[u64]) -> Vec<VariantRef> {
    bitrates.iter().map(|&bps| variant(bps)).collect()
}

/// The usual three-rung ladder: 500 kbps, 1 Mbps, 2 Mbps.
pub fn ladder_3() -> Vec<VariantRef> {
    variants(&[500_000, 1_000_000, 2_000_000])
}

/// Bitrates of a variant sequence, for assertions.
pub fn bitrates<'a>(variants: impl IntoIterator<Item = &'a VariantRef>) -> Vec<u64> {
    variants.into_iter().map(|v| v.bitrate_bps).collect()
}

/// Random variant list with duplicates, zero placeholders and sub-floor entries.
pub fn random_variants(rng: &mut Xorshift64, max_len: usize) -> Vec<VariantRef> {
    const RUNGS: [u64; 10] = [
        0, 48_000, 64_000, 99_999, 100_000, 250_000, 500_000, 1_000_000, 2_500_000, 6_000_000,
    ];
    let len = rng.range_usize(0, max_len + 1);
    (0..len)
        .map(|_| {
            let bps = if rng.next_f64() < 0.7 {
                *rng.pick(&RUNGS)
            } else {
                rng.range_u64(0, 8_000_000)
            };
            variant(bps)
        })
        .collect()
}

/// Selection inputs with a previous variant.
pub fn ctx<'a>(
    previous: &'a VariantRef,
    suggested: &'a VariantRef,
    available: &'a [VariantRef],
) -> SelectionContext<'a> {
    SelectionContext::new(Some(previous), suggested, available)
}

/// Whether two handles are the same rendition.
pub fn same(a: &VariantRef, b: &VariantRef) -> bool {
    Arc::ptr_eq(a, b)
}
