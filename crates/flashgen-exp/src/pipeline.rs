//! The expansion primitive: sequential, order-preserving flat-map of a
//! sweep over an experiment list.

use flashgen_core::{ErrorInfo, GenError};

use crate::catalog::Sweep;
use crate::experiment::Experiment;

/// Applies `sweep` to every experiment and concatenates the emissions.
///
/// Input order and per-input emission order are both preserved; names
/// and output paths derive positionally from this ordering. Composing
/// `expand` calls multiplies fan-outs: N-for-1 after M-for-1 yields
/// exactly N×M when both sweeps apply unconditionally.
pub fn expand(exps: &[Experiment], sweep: &Sweep) -> Result<Vec<Experiment>, GenError> {
    let mut out = Vec::with_capacity(exps.len());
    for exp in exps {
        out.extend(sweep.apply(exp)?);
    }
    Ok(out)
}

/// Guards a pipeline stage against combinatorial blow-up.
pub(crate) fn ensure_budget(stage: &str, count: usize, max_variants: usize) -> Result<(), GenError> {
    if count > max_variants {
        return Err(GenError::Sweep(
            ErrorInfo::new("variant-budget", "sweep fan-out exceeds the variant budget")
                .with_context("stage", stage)
                .with_context("variants", count.to_string())
                .with_context("budget", max_variants.to_string())
                .with_hint("raise max_variants or narrow the sweep value lists"),
        ));
    }
    if count.saturating_mul(2) > max_variants {
        tracing::warn!(
            stage,
            variants = count,
            budget = max_variants,
            "sweep fan-out is past half the variant budget"
        );
    }
    Ok(())
}
