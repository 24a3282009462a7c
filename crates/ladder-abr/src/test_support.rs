#![forbid(unsafe_code)]

//! Fixtures for unit tests. Integration tests use `ladder-test-utils`, whose
//! types come from a separate build of this crate and cannot be mixed in here.

use url::Url;

use crate::{ProgramId, Variant, VariantRef};

pub(crate) fn variant_in(program: u32, bps: u64) -> VariantRef {
    let uri = Url::parse(&format!("https://cdn.example.com/{program}/{bps}/index.m3u8")).unwrap();
    Variant::new(bps, ProgramId(program), uri).into_ref()
}

pub(crate) fn variant(bps: u64) -> VariantRef {
    variant_in(1, bps)
}

pub(crate) fn variants(bitrates: &[u64]) -> Vec<VariantRef> {
    bitrates.iter().map(|&bps| variant(bps)).collect()
}
