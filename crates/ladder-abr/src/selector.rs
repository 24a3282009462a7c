#![forbid(unsafe_code)]

use std::sync::{Arc, OnceLock};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{
    AbrResult, BitrateCommand, CommandCell, FLOOR_BITRATE_BPS, SelectionContext,
    SelectionDecision, SelectionReason, VariantCatalog, VariantRef,
};

/// Callback the streaming engine invokes at every rendition-switch decision point.
pub trait VariantSelect {
    fn select_variant(&mut self, ctx: SelectionContext<'_>) -> AbrResult<SelectionDecision>;
}

impl<F> VariantSelect for F
where
    F: FnMut(SelectionContext<'_>) -> AbrResult<SelectionDecision>,
{
    fn select_variant(&mut self, ctx: SelectionContext<'_>) -> AbrResult<SelectionDecision> {
        self(ctx)
    }
}

/// Chooses the next variant from the heuristic suggestion and the operator command.
///
/// The catalog is frozen from the first call that carries a non-empty variant
/// list; later lists are ignored.
pub struct VariantSelector {
    catalog: OnceLock<Arc<VariantCatalog>>,
    command: CommandCell,
    floor_bps: u64,
    rng: StdRng,
}

impl VariantSelector {
    pub fn new(command: CommandCell) -> Self {
        Self {
            catalog: OnceLock::new(),
            command,
            floor_bps: FLOOR_BITRATE_BPS,
            rng: StdRng::from_entropy(),
        }
    }

    /// Override the floor used when the catalog is built.
    #[must_use]
    pub fn with_floor(mut self, floor_bps: u64) -> Self {
        self.floor_bps = floor_bps;
        self
    }

    /// Deterministic random picks.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Frozen catalog, once built.
    pub fn catalog(&self) -> Option<&Arc<VariantCatalog>> {
        self.catalog.get()
    }

    pub fn command(&self) -> &CommandCell {
        &self.command
    }

    /// Pick the variant for the next segment.
    ///
    /// Errors only when the catalog cannot be built. Degenerate cases (empty
    /// catalog, no neighbor for a step) yield [`SelectionDecision::unchanged`].
    pub fn select_next(&mut self, ctx: SelectionContext<'_>) -> AbrResult<SelectionDecision> {
        let Some(catalog) = self.ensure_catalog(ctx.available)?.cloned() else {
            debug!("variant selection: no catalog yet");
            return Ok(SelectionDecision::unchanged(SelectionReason::EmptyCatalog));
        };

        let Some(suggested) = catalog.snap(ctx.suggested) else {
            debug!("variant selection: catalog is empty");
            return Ok(SelectionDecision::unchanged(SelectionReason::EmptyCatalog));
        };

        let Some(previous) = ctx.previous else {
            debug!(
                suggested_bps = ctx.suggested.bitrate_bps,
                next_bps = suggested.bitrate_bps,
                "variant selection: initial"
            );
            return Ok(SelectionDecision::switch_to(
                suggested,
                SelectionReason::Initial,
            ));
        };

        let observed = self.command.observe();
        let command = observed.command;
        let decision = match command {
            BitrateCommand::Increase => {
                let next = catalog.next_above(previous.bitrate_bps).cloned();
                self.command.consume_one_shot(observed);
                step(next, SelectionReason::Increase)
            }
            BitrateCommand::Decrease => {
                let next = catalog.next_below(previous.bitrate_bps).cloned();
                self.command.consume_one_shot(observed);
                step(next, SelectionReason::Decrease)
            }
            BitrateCommand::Random => {
                let next = self.random_entry(&catalog);
                step(next, SelectionReason::Random)
            }
            BitrateCommand::Hold => {
                SelectionDecision::switch_to(Arc::clone(previous), SelectionReason::Hold)
            }
            BitrateCommand::Auto => SelectionDecision::switch_to(suggested, SelectionReason::Auto),
        };

        debug!(
            %command,
            previous_bps = previous.bitrate_bps,
            suggested_bps = ctx.suggested.bitrate_bps,
            next_bps = decision.next.as_ref().map(|v| v.bitrate_bps),
            reason = ?decision.reason,
            "variant selection"
        );

        Ok(decision)
    }

    fn ensure_catalog(&self, available: &[VariantRef]) -> AbrResult<Option<&Arc<VariantCatalog>>> {
        if let Some(catalog) = self.catalog.get() {
            return Ok(Some(catalog));
        }
        if available.is_empty() {
            return Ok(None);
        }
        let built = Arc::new(VariantCatalog::build_with_floor(available, self.floor_bps)?);
        Ok(Some(self.catalog.get_or_init(|| built)))
    }

    /// Uniform pick over `[0, len - 1)`: the highest rung is never chosen
    /// unless it is the only one.
    fn random_entry(&mut self, catalog: &VariantCatalog) -> Option<VariantRef> {
        let upper = catalog.len().saturating_sub(1).max(1);
        let index = self.rng.gen_range(0..upper);
        catalog.get(index).cloned()
    }
}

impl VariantSelect for VariantSelector {
    fn select_variant(&mut self, ctx: SelectionContext<'_>) -> AbrResult<SelectionDecision> {
        self.select_next(ctx)
    }
}

impl std::fmt::Debug for VariantSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantSelector")
            .field("catalog", &self.catalog.get().map(|c| c.len()))
            .field("command", &self.command.get())
            .field("floor_bps", &self.floor_bps)
            .finish_non_exhaustive()
    }
}

fn step(next: Option<VariantRef>, reason: SelectionReason) -> SelectionDecision {
    match next {
        Some(v) => SelectionDecision::switch_to(v, reason),
        None => SelectionDecision::unchanged(SelectionReason::NoCandidate),
    }
}
