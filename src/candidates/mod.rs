pub mod accumulate;
pub mod grammar;
pub mod outcome;

pub use accumulate::{accumulate_fragments, collect_candidates};
pub use grammar::{completeness, parse_candidate, split_candidates, Completeness};
pub use outcome::{assign_outcomes, DistrictOutcome};

use crate::core::diagnostics::Extraction;
use crate::core::model::{ElectionRow, ScopeContext};

/// Turns one district's body text into rows in the accumulator.
pub fn emit_district<S: AsRef<str>>(texts: &[S], ctx: &ScopeContext, out: &mut Extraction) {
    let candidates = collect_candidates(texts, ctx, out);
    if candidates.is_empty() {
        return;
    }
    let DistrictOutcome { runoff, ranked } = assign_outcomes(candidates, ctx.seats());
    for (candidate, result) in ranked {
        out.push_row(ElectionRow::new(ctx, candidate, runoff, result));
    }
}
