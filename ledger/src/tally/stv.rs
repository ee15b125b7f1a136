//! STV-Droop tally (C8): partial-seat single transferable vote with Droop
//! quota and Gregory-method surplus transfer.

use super::normalize::RankedBallot;
use super::CandidateId;
use crate::error::TallyError;
use std::collections::{HashMap, HashSet};

const EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct StvResult {
    pub quota: u64,
    pub seats_filled: Vec<CandidateId>,
    pub valid_ballots: u64,
    pub invalid_ballots: u64,
    pub rounds: Vec<Vec<(CandidateId, f64)>>,
}

/// Runs STV-Droop with Gregory-method surplus transfer.
///
/// `seats` is the number of winners to elect. A ballot is invalid if its
/// first rank references no known candidate; otherwise it participates,
/// carrying a transfer weight that starts at 1.0 and shrinks each time it
/// helps elect a candidate with surplus votes.
pub fn stv_droop(
    seats: usize,
    candidates: &[CandidateId],
    ballots: &[RankedBallot],
    quorum_requirement: u64,
) -> Result<StvResult, TallyError> {
    if candidates.is_empty() {
        return Err(TallyError::NoCandidates);
    }
    if seats == 0 || seats > candidates.len() {
        return Err(TallyError::InvalidWinnerCount {
            requested: seats,
            candidates: candidates.len(),
        });
    }

    let mut valid_ballots = 0u64;
    let mut invalid_ballots = 0u64;
    // Each working ballot: (rank list, current transfer weight).
    let mut working: Vec<(RankedBallot, f64)> = Vec::new();
    for ballot in ballots {
        match ballot.first() {
            Some(first_rank) if first_rank.iter().any(|c| candidates.contains(c)) => {
                valid_ballots += 1;
                working.push((ballot.clone(), 1.0));
            }
            _ => invalid_ballots += 1,
        }
    }
    let _ = quorum_requirement; // quorum is evaluated by the caller against valid_ballots per spec.

    let total_ballots = valid_ballots;
    let quota = total_ballots / (seats as u64 + 1) + 1;

    let mut active: Vec<CandidateId> = candidates.to_vec();
    let mut seated: Vec<CandidateId> = Vec::new();
    let mut rounds: Vec<Vec<(CandidateId, f64)>> = Vec::new();

    while seated.len() < seats && !active.is_empty() {
        let mut sums: HashMap<CandidateId, f64> =
            active.iter().cloned().map(|c| (c, 0.0)).collect();

        for (ballot, weight) in &working {
            if let Some(first_active_group) = first_active_rank(ballot, &active) {
                let share = *weight / first_active_group.len() as f64;
                for c in first_active_group {
                    if let Some(v) = sums.get_mut(c) {
                        *v += share;
                    }
                }
            }
        }

        // Stable sort by votes only: ties keep `active`'s order rather than
        // breaking on candidate id.
        let mut sorted: Vec<(CandidateId, f64)> = active.iter().map(|c| (c.clone(), sums[c])).collect();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        rounds.push(sorted.clone());

        let reaching_quota: Vec<(CandidateId, f64)> = sorted
            .iter()
            .filter(|(_, v)| *v >= quota as f64 - EPSILON)
            .cloned()
            .collect();

        if !reaching_quota.is_empty() {
            for (candidate, votes) in reaching_quota {
                if seated.len() >= seats {
                    break;
                }
                seated.push(candidate.clone());
                active.retain(|c| c != &candidate);

                // Gregory method: redistribute this candidate's surplus,
                // scaling every ballot that helped elect them by
                // (votes - quota) / votes.
                let surplus_factor = if votes > EPSILON {
                    ((votes - quota as f64) / votes).max(0.0)
                } else {
                    0.0
                };
                for (ballot, weight) in working.iter_mut() {
                    if let Some(first_active_group) = first_active_rank(ballot, &active_plus(&active, &candidate))
                    {
                        if first_active_group.contains(&&candidate) {
                            *weight *= surplus_factor;
                        }
                    }
                }
            }
        } else {
            // No one reaches quota: eliminate the lowest-scoring active
            // candidate(s) and let their ballots fall through to the next
            // preference at full weight.
            let min_votes = sorted
                .iter()
                .map(|(_, v)| *v)
                .fold(f64::MAX, f64::min);
            let eliminated: HashSet<CandidateId> = sorted
                .iter()
                .filter(|(_, v)| (*v - min_votes).abs() < EPSILON)
                .map(|(c, _)| c.clone())
                .collect();
            active.retain(|c| !eliminated.contains(c));
        }
    }

    Ok(StvResult {
        quota,
        seats_filled: seated,
        valid_ballots,
        invalid_ballots,
        rounds,
    })
}

/// The first rank group in `ballot` that still contains at least one
/// candidate from `active`, with eliminated/seated candidates filtered
/// out of it.
fn first_active_rank<'a>(
    ballot: &'a RankedBallot,
    active: &[CandidateId],
) -> Option<Vec<&'a CandidateId>> {
    for group in ballot {
        let filtered: Vec<&CandidateId> = group.iter().filter(|c| active.contains(c)).collect();
        if !filtered.is_empty() {
            return Some(filtered);
        }
    }
    None
}

/// `active` plus a just-seated candidate, used transiently while
/// redistributing that candidate's surplus (their ballots still need to
/// resolve to *their* rank before moving past it).
fn active_plus(active: &[CandidateId], extra: &CandidateId) -> Vec<CandidateId> {
    let mut v = active.to_vec();
    v.push(extra.clone());
    v
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
    fn single_seat_with_clear_quota_winner() {
        let a = c(1);
        let b = c(2);
        let candidates = vec![a.clone(), b.clone()];
        let ballots = vec![rank(&[a.clone()]); 6]
            .into_iter()
            .chain(vec![rank(&[b.clone()]); 4])
            .collect::<Vec<_>>();
        let result = stv_droop(1, &candidates, &ballots, 0).unwrap();
        assert_eq!(result.seats_filled, vec![a]);
        assert_eq!(result.quota, 6); // floor(10/2)+1
    }

    #[test]
    fn surplus_transfers_to_next_preference() {
        let a = c(b'A');
        let b = c(b'B');
        let e = c(b'E');
        let candidates = vec![a.clone(), b.clone(), e.clone()];
        // 2 seats, quota = floor(10/3)+1 = 4.
        // A gets 6 first-choices (2 surplus), all naming B second.
        // B gets 3 first-choices directly, E gets 1.
        let mut ballots = Vec::new();
        for _ in 0..6 {
            ballots.push(rank(&[a.clone(), b.clone()]));
        }
        for _ in 0..3 {
            ballots.push(rank(&[b.clone()]));
        }
        ballots.push(rank(&[e.clone()]));

        let result = stv_droop(2, &candidates, &ballots, 0).unwrap();
        assert_eq!(result.quota, 4);
        assert!(result.seats_filled.contains(&a));
        assert!(result.seats_filled.contains(&b));
        assert_eq!(result.seats_filled.len(), 2);
    }

    #[test]
    fn eliminates_lowest_when_no_one_meets_quota() {
        let a = c(1);
        let b = c(2);
        let d = c(3);
        let candidates = vec![a.clone(), b.clone(), d.clone()];
        let ballots = vec![
            rank(&[a.clone()]),
            rank(&[a.clone()]),
            rank(&[b.clone()]),
            rank(&[b.clone()]),
            rank(&[d.clone(), a.clone()]),
        ];
        let result = stv_droop(1, &candidates, &ballots, 0).unwrap();
        assert_eq!(result.seats_filled.len(), 1);
    }

    #[test]
    fn rejects_seats_exceeding_candidate_count() {
        let candidates = vec![c(1)];
        assert!(matches!(
            stv_droop(2, &candidates, &[], 0),
            Err(TallyError::InvalidWinnerCount { .. })
        ));
    }
}
