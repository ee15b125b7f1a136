//! COLLECT_BALLOTS bodies: a growing list of ballot references attached to
//! a proposal. Chainable: a later collection block can reference an
//! earlier one's ballot set via its own `proposal_ref_hash` pointing at the
//! prior COLLECT_BALLOTS block instead of the PROPOSAL block, per the
//! source's "can be chained together" comment.

use super::{read_hash, read_u16, read_u8, tag};
use crate::error::{BodyError, FramingError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectBallots {
    pub proposal_ref_hash: [u8; 32],
    pub ballot_refs: Vec<[u8; 32]>,
}

impl CollectBallots {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + 32 + 2 + self.ballot_refs.len() * 32);
        buf.push(tag::COLLECT_BALLOTS);
        buf.extend_from_slice(&self.proposal_ref_hash);
        buf.extend_from_slice(&(self.ballot_refs.len() as u16).to_be_bytes());
        for r in &self.ballot_refs {
            buf.extend_from_slice(r);
        }
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let t = read_u8(bytes, &mut pos, "tag")?;
        if t != tag::COLLECT_BALLOTS {
            return Err(BodyError::UnknownTag(t));
        }
        let proposal_ref_hash = read_hash(bytes, &mut pos, "proposal_ref_hash")?;
        let n_ballots = read_u16(bytes, &mut pos, "n_ballots")?;
        let mut ballot_refs = Vec::with_capacity(n_ballots as usize);
        for _ in 0..n_ballots {
            ballot_refs.push(read_hash(bytes, &mut pos, "ballot_ref_hash")?);
        }
        if pos != bytes.len() {
            return Err(FramingError::TrailingBytes.into());
        }
        Ok(CollectBallots {
            proposal_ref_hash,
            ballot_refs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_ballots_round_trips() {
        let c = CollectBallots {
            proposal_ref_hash: [1u8; 32],
            ballot_refs: vec![[2u8; 32], [3u8; 32]],
        };
        assert_eq!(CollectBallots::unpack(&c.pack()).unwrap(), c);
    }

    #[test]
    fn collect_ballots_with_no_refs_round_trips() {
        let c = CollectBallots {
            proposal_ref_hash: [9u8; 32],
            ballot_refs: vec![],
        };
        assert_eq!(CollectBallots::unpack(&c.pack()).unwrap(), c);
    }
}
