//! BALLOT bodies (C6): plurality, ranked, approval, and reserved score
//! shapes. Packing/unpacking only — validity against a candidate set and
//! tallying live in [`crate::tally`].
//!
//! Per the data model, `candidate_refs` is a flat concatenation of 32-byte
//! candidate hashes for every method; ranked ballots differ from
//! plurality/approval only in that hash *order* carries meaning (index 0 is
//! most preferred). Ties are not representable on the wire — they are a
//! concept the tally engine's normalizer (`crate::tally::normalize`)
//! introduces for the synthetic write-in/unranked rank, not something a
//! single cast ballot can express.

use super::{read_hash, read_u8, tag};
use crate::error::{BodyError, FramingError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallotKind {
    Plurality,
    Ranked,
    Approval,
    Score,
}

impl BallotKind {
    fn tag(self) -> u8 {
        match self {
            BallotKind::Plurality => tag::BALLOT_PLURALITY,
            BallotKind::Ranked => tag::BALLOT_RANKED,
            BallotKind::Approval => tag::BALLOT_APPROVAL,
            BallotKind::Score => tag::BALLOT_SCORE,
        }
    }
}

pub(crate) fn is_ballot_tag(t: u8) -> bool {
    matches!(
        t,
        tag::BALLOT_PLURALITY | tag::BALLOT_RANKED | tag::BALLOT_APPROVAL | tag::BALLOT_SCORE
    )
}

/// A decoded ballot body. Plurality/approval/ranked ballots all carry the
/// same flat list of candidate hashes; for ranked ballots the order is the
/// voter's preference (index 0 = most preferred), for plurality/approval it
/// is an unordered set. Score ballots (reserved shape, not tallied) carry a
/// hash plus a one-byte score per candidate.
#[derive(Clone, Debug, PartialEq)]
pub enum Ballot {
    Plurality {
        proposal_ref_hash: [u8; 32],
        candidate_refs: Vec<[u8; 32]>,
    },
    Ranked {
        proposal_ref_hash: [u8; 32],
        candidate_refs: Vec<[u8; 32]>,
    },
    Approval {
        proposal_ref_hash: [u8; 32],
        candidate_refs: Vec<[u8; 32]>,
    },
    Score {
        proposal_ref_hash: [u8; 32],
        scores: Vec<([u8; 32], u8)>,
    },
}

impl Ballot {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        match self {
            Ballot::Plurality {
                proposal_ref_hash,
                candidate_refs,
            } => {
                buf.push(BallotKind::Plurality.tag());
                buf.extend_from_slice(proposal_ref_hash);
                for c in candidate_refs {
                    buf.extend_from_slice(c);
                }
            }
            Ballot::Approval {
                proposal_ref_hash,
                candidate_refs,
            } => {
                buf.push(BallotKind::Approval.tag());
                buf.extend_from_slice(proposal_ref_hash);
                for c in candidate_refs {
                    buf.extend_from_slice(c);
                }
            }
            Ballot::Ranked {
                proposal_ref_hash,
                candidate_refs,
            } => {
                buf.push(BallotKind::Ranked.tag());
                buf.extend_from_slice(proposal_ref_hash);
                for c in candidate_refs {
                    buf.extend_from_slice(c);
                }
            }
            Ballot::Score {
                proposal_ref_hash,
                scores,
            } => {
                buf.push(BallotKind::Score.tag());
                buf.extend_from_slice(proposal_ref_hash);
                for (hash, score) in scores {
                    buf.extend_from_slice(hash);
                    buf.push(*score);
                }
            }
        }
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let tag_byte = read_u8(bytes, &mut pos, "tag")?;
        let proposal_ref_hash = read_hash(bytes, &mut pos, "proposal_ref_hash")?;
        match tag_byte {
            tag::BALLOT_PLURALITY | tag::BALLOT_APPROVAL | tag::BALLOT_RANKED => {
                let remaining = &bytes[pos..];
                if remaining.len() % 32 != 0 {
                    return Err(FramingError::TruncatedField("candidate_refs").into());
                }
                let candidate_refs: Vec<[u8; 32]> = remaining
                    .chunks_exact(32)
                    .map(|c| c.try_into().unwrap())
                    .collect();
                Ok(match tag_byte {
                    tag::BALLOT_PLURALITY => Ballot::Plurality {
                        proposal_ref_hash,
                        candidate_refs,
                    },
                    tag::BALLOT_RANKED => Ballot::Ranked {
                        proposal_ref_hash,
                        candidate_refs,
                    },
                    _ => Ballot::Approval {
                        proposal_ref_hash,
                        candidate_refs,
                    },
                })
            }
            tag::BALLOT_SCORE => {
                let mut scores = Vec::new();
                while pos < bytes.len() {
                    let hash = read_hash(bytes, &mut pos, "score_hash")?;
                    let score = read_u8(bytes, &mut pos, "score")?;
                    scores.push((hash, score));
                }
                Ok(Ballot::Score {
                    proposal_ref_hash,
                    scores,
                })
            }
            other => Err(BodyError::UnknownTag(other)),
        }
    }
}
