//! Plurality / MNTV / FPTP tally (C8).

use super::CandidateId;
use crate::error::TallyError;
use std::collections::HashMap;
use tracing::debug;

/// Result of a plurality/MNTV tally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluralityResult {
    /// Every candidate's vote count, ordered descending by votes (the
    /// reference implementation relies on this sort order, so it is
    /// modeled as an ordered list rather than a map).
    pub tally: Vec<(CandidateId, u64)>,
    pub winners: Vec<CandidateId>,
    /// Number of winners dropped from the initial cut line due to a tie
    /// with the next non-winner.
    pub ties: u32,
    pub valid_ballots: u64,
    pub invalid_ballots: u64,
    pub valid_votes: u64,
    pub invalid_votes: u64,
    pub meets_quorum: bool,
}

/// Tallies plurality (`number_of_winners == 1`, FPTP) or MNTV/bloc voting
/// (`number_of_winners > 1`) ballots.
///
/// A plurality ballot is a single candidate hash; an MNTV ballot is a list
/// of up to `number_of_winners` hashes, each casting one vote.
///
/// Entries are counted independently: a ballot with one known and one
/// unknown hash still credits the known candidate's vote and still counts
/// as an invalid ballot overall, mirroring per-entry accounting rather than
/// rejecting the whole ballot's votes. Only a ballot listing more candidates
/// than there are seats is rejected outright, with no per-entry accounting
/// at all.
pub fn plurality(
    number_of_winners: usize,
    candidates: &[CandidateId],
    ballots: &[Vec<CandidateId>],
    quorum: u64,
) -> Result<PluralityResult, TallyError> {
    if candidates.is_empty() {
        return Err(TallyError::NoCandidates);
    }
    if number_of_winners == 0 || number_of_winners > candidates.len() {
        return Err(TallyError::InvalidWinnerCount {
            requested: number_of_winners,
            candidates: candidates.len(),
        });
    }

    let mut votes: HashMap<CandidateId, u64> =
        candidates.iter().cloned().map(|c| (c, 0u64)).collect();

    let mut valid_ballots = 0u64;
    let mut invalid_ballots = 0u64;
    let mut valid_votes = 0u64;
    let mut invalid_votes = 0u64;

    let length_limit = if number_of_winners == 1 { 1 } else { number_of_winners };

    for ballot in ballots {
        if ballot.len() > length_limit {
            debug!(ballot_len = ballot.len(), length_limit, "ballot rejected: too many entries");
            invalid_ballots += 1;
            continue;
        }

        let mut ballot_valid = true;
        for c in ballot {
            if let Some(count) = votes.get_mut(c) {
                *count += 1;
                valid_votes += 1;
            } else {
                invalid_votes += 1;
                ballot_valid = false;
            }
        }

        if ballot_valid {
            valid_ballots += 1;
        } else {
            debug!(ballot_len = ballot.len(), "ballot rejected: unknown candidate");
            invalid_ballots += 1;
        }
    }

    // Stable sort by votes only, preserving `candidates`' input order among
    // ties rather than breaking on candidate id.
    let mut tally: Vec<(CandidateId, u64)> = candidates
        .iter()
        .map(|c| (c.clone(), votes[c]))
        .collect();
    tally.sort_by(|a, b| b.1.cmp(&a.1));

    let mut winners: Vec<CandidateId> = tally
        .iter()
        .take(number_of_winners)
        .map(|(c, _)| c.clone())
        .collect();

    let mut ties = 0u32;
    while !winners.is_empty() {
        let cut_index = winners.len() - 1;
        let cut_votes = tally[cut_index].1;
        let next_votes = tally.get(winners.len()).map(|(_, v)| *v);
        if next_votes == Some(cut_votes) {
            winners.pop();
            ties += 1;
        } else {
            break;
        }
    }

    let meets_quorum = valid_ballots >= quorum;

    Ok(PluralityResult {
        tally,
        winners,
        ties,
        valid_ballots,
        invalid_ballots,
        valid_votes,
        invalid_votes,
        meets_quorum,
    })
}
