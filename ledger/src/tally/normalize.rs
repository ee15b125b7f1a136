//! Ballot normalizer (C7).
//!
//! Canonicalizes ranked ballots so the write-in/unranked placeholder always
//! ends up as a single trailing tie group, rather than the caller's raw
//! mix of explicit ranks and an optional placeholder token. Deterministic:
//! unlike the older reference normalizer, no randomness is involved in how
//! unranked candidates are ordered relative to one another (they are tied,
//! not shuffled).

use super::CandidateId;
use std::collections::HashSet;

/// A set of candidates the voter ranked equally; contributes a fractional
/// vote to each member during tallying.
pub type RankGroup = Vec<CandidateId>;

/// A single ballot's ranked preferences, most-preferred rank first.
pub type RankedBallot = Vec<RankGroup>;

/// The default write-in/unranked placeholder token, matching the
/// reference implementation's `b'Unranked/Write-Ins/Other'`.
pub const DEFAULT_PLACEHOLDER: &[u8] = b"Unranked/Write-Ins/Other";

/// Canonicalizes `ballots` against `candidates`:
///
/// 1. Any candidate referenced by a ballot that isn't in `candidates` and
///    isn't the placeholder is a write-in; it is appended to the returned
///    candidate list.
/// 2. Any ballot that doesn't already carry the placeholder has it
///    appended as its final rank.
/// 3. The placeholder rank on each ballot is replaced with a single tie
///    group containing every candidate that ballot doesn't already rank.
///
/// Running this twice on its own output is a no-op (see module tests):
/// once the placeholder has been materialized into a concrete (possibly
/// empty) unranked group, there is nothing left for a second pass to
/// change.
pub fn normalize_ranked_ballots(
    ballots: &[RankedBallot],
    candidates: &[CandidateId],
    placeholder: Option<&[u8]>,
) -> (Vec<RankedBallot>, Vec<CandidateId>) {
    let placeholder: CandidateId = placeholder.unwrap_or(DEFAULT_PLACEHOLDER).to_vec();

    let mut extended_candidates = candidates.to_vec();
    for ballot in ballots {
        for group in ballot {
            for c in group {
                if *c != placeholder && !extended_candidates.contains(c) {
                    extended_candidates.push(c.clone());
                }
            }
        }
    }

    let mut normalized = Vec::with_capacity(ballots.len());
    for ballot in ballots {
        let mut new_ballot = ballot.clone();

        let has_placeholder = new_ballot.iter().any(|g| g.contains(&placeholder));
        if !has_placeholder {
            new_ballot.push(vec![placeholder.clone()]);
        }

        let ranked_on_ballot: HashSet<&CandidateId> = new_ballot
            .iter()
            .flatten()
            .filter(|c| **c != placeholder)
            .collect();
        let unranked: Vec<CandidateId> = extended_candidates
            .iter()
            .filter(|c| !ranked_on_ballot.contains(c))
            .cloned()
            .collect();

        for group in new_ballot.iter_mut() {
            if group.contains(&placeholder) {
                *group = unranked.clone();
            }
        }
        // A materialized empty unranked group (ballot already ranked
        // everyone) carries no information; drop it rather than leaving a
        // dangling empty rank.
        new_ballot.retain(|g| !g.is_empty());

        normalized.push(new_ballot);
    }

    (normalized, extended_candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(byte: u8) -> CandidateId {
        vec![byte; 32]
    }

    fn single(id: CandidateId) -> RankGroup {
        vec![id]
    }

    #[test]
    fn appends_placeholder_to_ballots_missing_it() {
        let candidates = vec![c(1), c(2), c(3)];
        let ballots = vec![vec![single(c(1))]];
        let (normalized, extended) = normalize_ranked_ballots(&ballots, &candidates, None);
        assert_eq!(extended, candidates);
        // c(1) ranked, so the unranked group is {c(2), c(3)}.
        assert_eq!(normalized[0].len(), 2);
        let unranked = &normalized[0][1];
        assert_eq!(unranked.len(), 2);
        assert!(unranked.contains(&c(2)));
        assert!(unranked.contains(&c(3)));
    }

    #[test]
    fn write_in_candidate_is_appended_to_candidate_list() {
        let candidates = vec![c(1), c(2)];
        let write_in = vec![9u8; 32];
        let ballots = vec![vec![single(write_in.clone())]];
        let (_, extended) = normalize_ranked_ballots(&ballots, &candidates, None);
        assert!(extended.contains(&write_in));
        assert_eq!(extended.len(), 3);
    }

    #[test]
    fn fully_ranked_ballot_gets_no_unranked_group() {
        let candidates = vec![c(1), c(2)];
        let ballots = vec![vec![single(c(1)), single(c(2))]];
        let (normalized, _) = normalize_ranked_ballots(&ballots, &candidates, None);
        assert_eq!(normalized[0].len(), 2);
    }

    #[test]
    fn normalization_is_idempotent() {
        let candidates = vec![c(1), c(2), c(3)];
        let ballots = vec![vec![single(c(2))], vec![single(c(1)), single(c(3))]];
        let (once, cands_once) = normalize_ranked_ballots(&ballots, &candidates, None);
        let (twice, cands_twice) = normalize_ranked_ballots(&once, &cands_once, None);
        assert_eq!(once, twice);
        assert_eq!(cands_once, cands_twice);
    }

    #[test]
    fn custom_placeholder_is_respected() {
        let candidates = vec![c(1), c(2)];
        let ballots: Vec<RankedBallot> = vec![vec![single(c(1))]];
        let custom = b"none-of-the-above";
        let (normalized, _) = normalize_ranked_ballots(&ballots, &candidates, Some(custom));
        assert_eq!(normalized[0].len(), 2);
        assert_eq!(normalized[0][1], vec![c(2)]);
    }
}
