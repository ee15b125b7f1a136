//! Tally engine (C7 ballot normalizer + C8 tally algorithms).
//!
//! Candidates are identified generically by [`CandidateId`] (a byte
//! string) rather than being hard-wired to the 32-byte hash the block
//! codec uses for on-chain candidates: the reference implementation's
//! normalizer and tally functions operate on plain candidate labels, and
//! the synthetic write-in/unranked placeholder (`b"Unranked/Write-Ins/Other"`)
//! is not itself a 32-byte hash. Callers working with on-chain data convert
//! `[u8; 32]` candidate hashes to `CandidateId` at the boundary (see
//! `Ballot::candidate_refs`).

mod irv;
mod normalize;
mod plurality;
mod stv;

pub use irv::{irv, irv_coombs, IrvResult, RoundTally};
pub use normalize::{normalize_ranked_ballots, RankGroup, RankedBallot, DEFAULT_PLACEHOLDER};
pub use plurality::{plurality, PluralityResult};
pub use stv::{stv_droop, StvResult};

/// A candidate identifier: a 32-byte hash for on-chain candidates, or an
/// arbitrary label (e.g. the write-in placeholder) during normalization.
pub type CandidateId = Vec<u8>;

/// Converts a 32-byte candidate hash to the tally engine's generic
/// [`CandidateId`] representation.
pub fn candidate_id_from_hash(hash: &[u8; 32]) -> CandidateId {
    hash.to_vec()
}
