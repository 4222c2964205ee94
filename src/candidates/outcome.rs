use crate::core::model::{CandidateRecord, Outcome};

#[derive(Debug, Clone, PartialEq)]
pub struct DistrictOutcome {
    /// Set when any candidate in the district carries the runoff marker.
    pub runoff: bool,
    /// Candidates in rank order with their result.
    pub ranked: Vec<(CandidateRecord, Outcome)>,
}

/// Ranks a district's candidates by votes and labels each one.
///
/// Missing vote counts rank below every counted candidate; equal counts keep
/// extraction order. When the district went to a runoff, the seats are not
/// decided here: the would-be winners and every marked candidate become
/// `Runoff`, and the later trial record settles the seat.
pub fn assign_outcomes(mut candidates: Vec<CandidateRecord>, num_elected: u32) -> DistrictOutcome {
    let runoff = candidates.iter().any(|c| c.runoff);
    candidates.sort_by(|a, b| b.votes.cmp(&a.votes));

    let seats = num_elected.max(1) as usize;
    let mut seated = 0;
    let ranked = candidates
        .into_iter()
        .map(|candidate| {
            let outcome = if candidate.runoff {
                Outcome::Runoff
            } else if seated < seats {
                seated += 1;
                if runoff {
                    Outcome::Runoff
                } else {
                    Outcome::Won
                }
            } else {
                Outcome::Lost
            };
            (candidate, outcome)
        })
        .collect();

    DistrictOutcome { runoff, ranked }
}
