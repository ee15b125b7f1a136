//! IRV (Hare) and IRV-Coombs tallies (C8).

use super::normalize::RankedBallot;
use super::CandidateId;
use crate::error::TallyError;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Tolerance for comparing fractional (tied-rank) vote totals.
const EPSILON: f64 = 1e-9;

/// One round's tally. `lowest` is only populated for IRV-Coombs, which
/// eliminates on lowest-preference counts rather than highest-preference
/// counts.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundTally {
    pub highest: Vec<(CandidateId, f64)>,
    pub lowest: Option<Vec<(CandidateId, f64)>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IrvResult {
    pub valid_ballots: u64,
    pub invalid_ballots: u64,
    pub exhausted_ballots: u64,
    /// `None` if the candidate set was exhausted with no majority winner
    /// (wire encoding: 32 zero bytes).
    pub winner: Option<CandidateId>,
    pub rounds: Vec<RoundTally>,
    pub meets_quorum: bool,
}

/// Runs IRV (Hare): each round eliminates the candidate(s) with the
/// *fewest* first-preference votes.
pub fn irv(
    candidates: &[CandidateId],
    ballots: &[RankedBallot],
    quorum: u64,
) -> Result<IrvResult, TallyError> {
    run(candidates, ballots, quorum, false)
}

/// Runs IRV-Coombs: each round eliminates the candidate(s) with the
/// *greatest* lowest-preference (last-rank) vote count, and round 0
/// requires every ballot to rank all known candidates.
pub fn irv_coombs(
    candidates: &[CandidateId],
    ballots: &[RankedBallot],
    quorum: u64,
) -> Result<IrvResult, TallyError> {
    run(candidates, ballots, quorum, true)
}

fn run(
    candidates: &[CandidateId],
    ballots: &[RankedBallot],
    quorum: u64,
    coombs: bool,
) -> Result<IrvResult, TallyError> {
    if candidates.is_empty() {
        return Err(TallyError::NoCandidates);
    }

    let n_candidates = candidates.len();
    let mut active: Vec<CandidateId> = candidates.to_vec();

    let mut valid_ballots = 0u64;
    let mut invalid_ballots = 0u64;
    let mut working: Vec<RankedBallot> = Vec::with_capacity(ballots.len());

    for ballot in ballots {
        let is_valid = if coombs {
            let ranked_count: usize = ballot.iter().map(|g| g.len()).sum();
            ranked_count >= n_candidates
        } else {
            match ballot.first() {
                Some(first_rank) => first_rank.iter().any(|c| active.contains(c)),
                None => false,
            }
        };
        if is_valid {
            valid_ballots += 1;
            working.push(ballot.clone());
        } else {
            debug!(coombs, "ballot rejected");
            invalid_ballots += 1;
        }
    }

    let mut rounds: Vec<RoundTally> = Vec::new();
    let mut exhausted_ballots = 0u64;

    loop {
        if active.is_empty() {
            return Ok(IrvResult {
                valid_ballots,
                invalid_ballots,
                exhausted_ballots,
                winner: None,
                rounds,
                meets_quorum: meets_quorum(valid_ballots, exhausted_ballots, quorum),
            });
        }

        let mut highest: HashMap<CandidateId, f64> =
            active.iter().cloned().map(|c| (c, 0.0)).collect();
        let mut lowest: HashMap<CandidateId, f64> =
            active.iter().cloned().map(|c| (c, 0.0)).collect();

        for ballot in &working {
            if let Some(first_group) = ballot.first() {
                let weight = 1.0 / first_group.len() as f64;
                for c in first_group {
                    if let Some(v) = highest.get_mut(c) {
                        *v += weight;
                    }
                }
            }
            if coombs {
                if let Some(last_group) = ballot.last() {
                    let weight = 1.0 / last_group.len() as f64;
                    for c in last_group {
                        if let Some(v) = lowest.get_mut(c) {
                            *v += weight;
                        }
                    }
                }
            }
        }

        let total_votes: f64 = highest.values().sum();

        // Stable sort by votes only: ties keep `active`'s order rather than
        // breaking on candidate id.
        let mut highest_sorted: Vec<(CandidateId, f64)> =
            active.iter().map(|c| (c.clone(), highest[c])).collect();
        highest_sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

        let lowest_sorted: Option<Vec<(CandidateId, f64)>> = if coombs {
            let mut v: Vec<(CandidateId, f64)> =
                active.iter().map(|c| (c.clone(), lowest[c])).collect();
            v.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
            Some(v)
        } else {
            None
        };

        rounds.push(RoundTally {
            highest: highest_sorted.clone(),
            lowest: lowest_sorted.clone(),
        });

        let majority_threshold = (total_votes / 2.0).floor();
        if let Some((winner_id, votes)) = highest_sorted.first() {
            if *votes > majority_threshold {
                return Ok(IrvResult {
                    valid_ballots,
                    invalid_ballots,
                    exhausted_ballots,
                    winner: Some(winner_id.clone()),
                    rounds,
                    meets_quorum: meets_quorum(valid_ballots, exhausted_ballots, quorum),
                });
            }
        }

        let elimination_basis: &[(CandidateId, f64)] = if coombs {
            lowest_sorted.as_ref().unwrap()
        } else {
            &highest_sorted
        };
        let target = if coombs {
            elimination_basis
                .iter()
                .map(|(_, v)| *v)
                .fold(f64::MIN, f64::max)
        } else {
            elimination_basis
                .iter()
                .map(|(_, v)| *v)
                .fold(f64::MAX, f64::min)
        };
        let eliminated: HashSet<CandidateId> = elimination_basis
            .iter()
            .filter(|(_, v)| (*v - target).abs() < EPSILON)
            .map(|(c, _)| c.clone())
            .collect();

        active.retain(|c| !eliminated.contains(c));

        for ballot in working.iter_mut() {
            let rebuilt: RankedBallot = ballot
                .iter()
                .filter_map(|group| {
                    let filtered: Vec<CandidateId> = group
                        .iter()
                        .filter(|c| !eliminated.contains(*c))
                        .cloned()
                        .collect();
                    if filtered.is_empty() {
                        None
                    } else {
                        Some(filtered)
                    }
                })
                .collect();
            *ballot = rebuilt;
        }

        let before = working.len();
        working.retain(|b| !b.is_empty());
        exhausted_ballots += (before - working.len()) as u64;
    }
}

/// Round-based quorum check: `valid_ballots - exhausted_ballots > quorum`
/// (note the strict `>`, unlike plurality's `>=`).
fn meets_quorum(valid_ballots: u64, exhausted_ballots: u64, quorum: u64) -> bool {
    valid_ballots.saturating_sub(exhausted_ballots) > quorum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(byte: u8) -> CandidateId {
        vec![byte; 32]
    }

    fn rank(ids: &[CandidateId]) -> RankedBallot {
        ids.iter().map(|id| vec![id.clone()]).collect()
    }

    #[test]
    fn irv_majority_winner_in_round_zero() {
        let g = c(1);
        let j = c(2);
        let candidates = vec![g.clone(), j.clone()];
        let ballots = vec![
            rank(&[g.clone()]),
            rank(&[g.clone()]),
            rank(&[g.clone()]),
            rank(&[j.clone()]),
        ];
        let result = irv(&candidates, &ballots, 1).unwrap();
        assert_eq!(result.winner, Some(g));
        assert_eq!(result.rounds.len(), 1);
    }

    #[test]
    fn irv_eliminates_last_place_and_transfers() {
        let g = c(b'G');
        let j = c(b'J');
        let o = c(b'O');
        let t = c(b'T');
        let candidates = vec![g.clone(), j.clone(), o.clone(), t.clone()];

        let mut ballots = Vec::new();
        for _ in 0..8 {
            ballots.push(rank(&[g.clone(), j.clone()]));
        }
        for _ in 0..7 {
            ballots.push(rank(&[j.clone(), g.clone()]));
        }
        for _ in 0..3 {
            ballots.push(rank(&[o.clone(), g.clone()]));
        }
        // This ballot exhausts once both its listed candidates are eliminated.
        ballots.push(rank(&[o.clone(), t.clone()]));

        let result = irv(&candidates, &ballots, 10).unwrap();
        assert!(result.rounds.len() >= 2);
        assert_eq!(result.winner, Some(g));
        assert!(result.meets_quorum);
    }

    #[test]
    fn irv_ballot_with_unknown_first_choice_is_invalid() {
        let g = c(1);
        let unknown = c(99);
        let candidates = vec![g.clone()];
        let ballots = vec![rank(&[unknown]), rank(&[g.clone()])];
        let result = irv(&candidates, &ballots, 0).unwrap();
        assert_eq!(result.invalid_ballots, 1);
        assert_eq!(result.valid_ballots, 1);
    }

    #[test]
    fn coombs_requires_full_ranking_in_round_zero() {
        let g = c(1);
        let j = c(2);
        let candidates = vec![g.clone(), j.clone()];
        // Only ranks g, not j: invalid for Coombs.
        let partial = rank(&[g.clone()]);
        let full = rank(&[j.clone(), g.clone()]);
        let ballots = vec![partial, full.clone(), full];
        let result = irv_coombs(&candidates, &ballots, 0).unwrap();
        assert_eq!(result.invalid_ballots, 1);
        assert_eq!(result.valid_ballots, 2);
    }

    #[test]
    fn coombs_eliminates_by_greatest_last_place_count() {
        let g = c(b'G');
        let j = c(b'J');
        let o = c(b'O');
        let candidates = vec![g.clone(), j.clone(), o.clone()];

        // O is ranked last on every ballot -> eliminated first under Coombs.
        let ballots = vec![
            rank(&[g.clone(), j.clone(), o.clone()]),
            rank(&[g.clone(), j.clone(), o.clone()]),
            rank(&[j.clone(), g.clone(), o.clone()]),
        ];
        let result = irv_coombs(&candidates, &ballots, 0).unwrap();
        assert_eq!(result.winner, Some(g));
    }

    #[test]
    fn empty_candidate_set_halts_with_no_winner() {
        let g = c(1);
        let j = c(2);
        let candidates = vec![g.clone(), j.clone()];
        // A perfect tie that never reaches majority: both eliminated together,
        // active set empties out.
        let ballots = vec![rank(&[g.clone()]), rank(&[j.clone()])];
        let result = irv(&candidates, &ballots, 0).unwrap();
        assert_eq!(result.winner, None);
    }

    #[test]
    fn determinism_across_repeated_runs() {
        let g = c(b'G');
        let j = c(b'J');
        let o = c(b'O');
        let candidates = vec![g.clone(), j.clone(), o.clone()];
        let ballots = vec![
            rank(&[g.clone(), j.clone()]),
            rank(&[j.clone(), o.clone()]),
            rank(&[o.clone(), g.clone()]),
            rank(&[g.clone()]),
        ];
        let a = irv(&candidates, &ballots, 0).unwrap();
        let b = irv(&candidates, &ballots, 0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_empty_candidates() {
        assert!(matches!(irv(&[], &[], 0), Err(TallyError::NoCandidates)));
    }
}
