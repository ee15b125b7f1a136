//! TALLY_OF_VOTES bodies (C6), per method.
//!
//! The plurality and IRV/IRV-Coombs layouts differ in shape (IRV carries
//! per-round tallies, plurality doesn't), so each gets its own packed
//! representation under the shared `TALLY_OF_VOTES` outer tag plus an
//! inner method tag.
//!
//! IRV-Coombs rounds additionally carry a *lowest*-preference map per
//! round (Coombs eliminates on lowest-preference counts, so a reader needs
//! both maps to follow a round); plain IRV rounds carry only the
//! highest-preference map.

use super::{read_hash, read_u16, read_u8, tag, ElectionMethod};
use crate::error::{BodyError, FramingError};
use crate::tally::{CandidateId, IrvResult, PluralityResult};

/// Sentinel returned as `winner` when IRV/Coombs halts with no majority.
pub const NO_WINNER: [u8; 32] = [0u8; 32];

fn candidate_hash(id: &CandidateId) -> [u8; 32] {
    let mut hash = [0u8; 32];
    let n = id.len().min(32);
    hash[..n].copy_from_slice(&id[..n]);
    hash
}

fn saturating_u16(value: u64) -> u16 {
    value.min(u16::MAX as u64) as u16
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluralityTallyBody {
    pub collection_ref_hash: [u8; 32],
    pub meets_quorum: bool,
    pub ties: u8,
    pub valid_ballots: u16,
    pub invalid_ballots: u16,
    pub valid_votes: u16,
    pub invalid_votes: u16,
    pub winners: Vec<[u8; 32]>,
    pub candidate_tally: Vec<([u8; 32], u16)>,
}

impl PluralityTallyBody {
    /// Builds the wire body from a tally-engine result. Vote/ballot counts
    /// beyond `u16::MAX` saturate — the wire format has no room for more.
    pub fn from_result(collection_ref_hash: [u8; 32], result: &PluralityResult) -> Self {
        PluralityTallyBody {
            collection_ref_hash,
            meets_quorum: result.meets_quorum,
            ties: result.ties.min(u8::MAX as u32) as u8,
            valid_ballots: saturating_u16(result.valid_ballots),
            invalid_ballots: saturating_u16(result.invalid_ballots),
            valid_votes: saturating_u16(result.valid_votes),
            invalid_votes: saturating_u16(result.invalid_votes),
            winners: result.winners.iter().map(candidate_hash).collect(),
            candidate_tally: result
                .tally
                .iter()
                .map(|(c, v)| (candidate_hash(c), saturating_u16(*v)))
                .collect(),
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(tag::TALLY_OF_VOTES);
        buf.push(ElectionMethod::Plurality.proposal_tag());
        buf.extend_from_slice(&self.collection_ref_hash);
        buf.push(if self.meets_quorum { 0x01 } else { 0x00 });
        buf.push(self.ties);
        buf.extend_from_slice(&self.valid_ballots.to_be_bytes());
        buf.extend_from_slice(&self.invalid_ballots.to_be_bytes());
        buf.extend_from_slice(&self.valid_votes.to_be_bytes());
        buf.extend_from_slice(&self.invalid_votes.to_be_bytes());
        buf.push(self.winners.len() as u8);
        for w in &self.winners {
            buf.extend_from_slice(w);
        }
        buf.extend_from_slice(&(self.candidate_tally.len() as u16).to_be_bytes());
        for (hash, votes) in &self.candidate_tally {
            buf.extend_from_slice(hash);
            buf.extend_from_slice(&votes.to_be_bytes());
        }
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let outer = read_u8(bytes, &mut pos, "tag")?;
        if outer != tag::TALLY_OF_VOTES {
            return Err(BodyError::UnknownTag(outer));
        }
        let method_tag = read_u8(bytes, &mut pos, "method_tag")?;
        if ElectionMethod::from_proposal_tag(method_tag) != Some(ElectionMethod::Plurality) {
            return Err(BodyError::UnknownTag(method_tag));
        }
        let collection_ref_hash = read_hash(bytes, &mut pos, "collection_ref_hash")?;
        let meets_quorum = read_u8(bytes, &mut pos, "meets_quorum")? != 0;
        let ties = read_u8(bytes, &mut pos, "ties")?;
        let valid_ballots = read_u16(bytes, &mut pos, "valid_ballots")?;
        let invalid_ballots = read_u16(bytes, &mut pos, "invalid_ballots")?;
        let valid_votes = read_u16(bytes, &mut pos, "valid_votes")?;
        let invalid_votes = read_u16(bytes, &mut pos, "invalid_votes")?;
        let n_winners = read_u8(bytes, &mut pos, "n_winners")?;
        let mut winners = Vec::with_capacity(n_winners as usize);
        for _ in 0..n_winners {
            winners.push(read_hash(bytes, &mut pos, "winner")?);
        }
        let n_candidates = read_u16(bytes, &mut pos, "n_candidates")?;
        let mut candidate_tally = Vec::with_capacity(n_candidates as usize);
        for _ in 0..n_candidates {
            let hash = read_hash(bytes, &mut pos, "candidate_hash")?;
            let votes = read_u16(bytes, &mut pos, "votes")?;
            candidate_tally.push((hash, votes));
        }
        if pos != bytes.len() {
            return Err(FramingError::TrailingBytes.into());
        }
        Ok(PluralityTallyBody {
            collection_ref_hash,
            meets_quorum,
            ties,
            valid_ballots,
            invalid_ballots,
            valid_votes,
            invalid_votes,
            winners,
            candidate_tally,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IrvRoundBody {
    pub highest: Vec<([u8; 32], u16)>,
    /// Present only for IRV-Coombs rounds.
    pub lowest: Option<Vec<([u8; 32], u16)>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IrvTallyBody {
    pub coombs: bool,
    pub collection_ref_hash: [u8; 32],
    pub meets_quorum: bool,
    pub valid_ballots: u16,
    pub invalid_ballots: u16,
    pub exhausted_ballots: u16,
    pub winner: [u8; 32],
    pub rounds: Vec<IrvRoundBody>,
}

impl IrvTallyBody {
    pub fn from_result(collection_ref_hash: [u8; 32], coombs: bool, result: &IrvResult) -> Self {
        let rounds = result
            .rounds
            .iter()
            .map(|r| IrvRoundBody {
                highest: r
                    .highest
                    .iter()
                    .map(|(c, v)| (candidate_hash(c), v.round() as u16))
                    .collect(),
                lowest: r.lowest.as_ref().map(|l| {
                    l.iter()
                        .map(|(c, v)| (candidate_hash(c), v.round() as u16))
                        .collect()
                }),
            })
            .collect();
        IrvTallyBody {
            coombs,
            collection_ref_hash,
            meets_quorum: result.meets_quorum,
            valid_ballots: saturating_u16(result.valid_ballots),
            invalid_ballots: saturating_u16(result.invalid_ballots),
            exhausted_ballots: saturating_u16(result.exhausted_ballots),
            winner: result
                .winner
                .as_ref()
                .map(candidate_hash)
                .unwrap_or(NO_WINNER),
            rounds,
        }
    }

    fn method_tag(&self) -> u8 {
        if self.coombs {
            ElectionMethod::IrvCoombs.proposal_tag()
        } else {
            ElectionMethod::Irv.proposal_tag()
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(tag::TALLY_OF_VOTES);
        buf.push(self.method_tag());
        buf.extend_from_slice(&self.collection_ref_hash);
        buf.push(if self.meets_quorum { 0x01 } else { 0x00 });
        buf.extend_from_slice(&self.valid_ballots.to_be_bytes());
        buf.extend_from_slice(&self.invalid_ballots.to_be_bytes());
        buf.extend_from_slice(&self.exhausted_ballots.to_be_bytes());
        buf.extend_from_slice(&self.winner);
        buf.push(self.rounds.len() as u8);
        for round in &self.rounds {
            pack_round_map(&mut buf, &round.highest);
            if self.coombs {
                pack_round_map(&mut buf, round.lowest.as_deref().unwrap_or(&[]));
            }
        }
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let outer = read_u8(bytes, &mut pos, "tag")?;
        if outer != tag::TALLY_OF_VOTES {
            return Err(BodyError::UnknownTag(outer));
        }
        let method_tag = read_u8(bytes, &mut pos, "method_tag")?;
        let coombs = match ElectionMethod::from_proposal_tag(method_tag) {
            Some(ElectionMethod::Irv) => false,
            Some(ElectionMethod::IrvCoombs) => true,
            _ => return Err(BodyError::UnknownTag(method_tag)),
        };
        let collection_ref_hash = read_hash(bytes, &mut pos, "collection_ref_hash")?;
        let meets_quorum = read_u8(bytes, &mut pos, "meets_quorum")? != 0;
        let valid_ballots = read_u16(bytes, &mut pos, "valid_ballots")?;
        let invalid_ballots = read_u16(bytes, &mut pos, "invalid_ballots")?;
        let exhausted_ballots = read_u16(bytes, &mut pos, "exhausted_ballots")?;
        let winner = read_hash(bytes, &mut pos, "winner")?;
        let n_rounds = read_u8(bytes, &mut pos, "n_rounds")?;
        let mut rounds = Vec::with_capacity(n_rounds as usize);
        for _ in 0..n_rounds {
            let highest = unpack_round_map(bytes, &mut pos)?;
            let lowest = if coombs {
                Some(unpack_round_map(bytes, &mut pos)?)
            } else {
                None
            };
            rounds.push(IrvRoundBody { highest, lowest });
        }
        if pos != bytes.len() {
            return Err(FramingError::TrailingBytes.into());
        }
        Ok(IrvTallyBody {
            coombs,
            collection_ref_hash,
            meets_quorum,
            valid_ballots,
            invalid_ballots,
            exhausted_ballots,
            winner,
            rounds,
        })
    }
}

fn pack_round_map(buf: &mut Vec<u8>, map: &[([u8; 32], u16)]) {
    buf.extend_from_slice(&(map.len() as u16).to_be_bytes());
    for (hash, votes) in map {
        buf.extend_from_slice(hash);
        buf.extend_from_slice(&votes.to_be_bytes());
    }
}

fn unpack_round_map(
    bytes: &[u8],
    pos: &mut usize,
) -> Result<Vec<([u8; 32], u16)>, FramingError> {
    let n = read_u16(bytes, pos, "n_candidates")?;
    let mut map = Vec::with_capacity(n as usize);
    for _ in 0..n {
        let hash = read_hash(bytes, pos, "candidate_hash")?;
        let votes = read_u16(bytes, pos, "votes")?;
        map.push((hash, votes));
    }
    Ok(map)
}

/// A decoded TALLY_OF_VOTES body, dispatched on the inner method tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tally {
    Plurality(PluralityTallyBody),
    Irv(IrvTallyBody),
}

impl Tally {
    pub fn pack(&self) -> Vec<u8> {
        match self {
            Tally::Plurality(p) => p.pack(),
            Tally::Irv(i) => i.pack(),
        }
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let method_tag = *bytes.get(1).ok_or(FramingError::TooShort { len: bytes.len() })?;
        match ElectionMethod::from_proposal_tag(method_tag) {
            Some(ElectionMethod::Plurality) => {
                Ok(Tally::Plurality(PluralityTallyBody::unpack(bytes)?))
            }
            Some(ElectionMethod::Irv) | Some(ElectionMethod::IrvCoombs) => {
                Ok(Tally::Irv(IrvTallyBody::unpack(bytes)?))
            }
            _ => Err(BodyError::UnknownTag(method_tag)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plurality_tally_round_trips() {
        let body = PluralityTallyBody {
            collection_ref_hash: [1u8; 32],
            meets_quorum: true,
            ties: 1,
            valid_ballots: 14,
            invalid_ballots: 0,
            valid_votes: 28,
            invalid_votes: 0,
            winners: vec![[b'G'; 32]],
            candidate_tally: vec![([b'G'; 32], 14), ([b'J'; 32], 7), ([b'O'; 32], 7), ([b'T'; 32], 2)],
        };
        let packed = body.pack();
        assert_eq!(packed[0], tag::TALLY_OF_VOTES);
        let unpacked = PluralityTallyBody::unpack(&packed).unwrap();
        assert_eq!(unpacked, body);
    }

    #[test]
    fn irv_tally_round_trips_without_lowest_map() {
        let body = IrvTallyBody {
            coombs: false,
            collection_ref_hash: [2u8; 32],
            meets_quorum: true,
            valid_ballots: 20,
            invalid_ballots: 0,
            exhausted_ballots: 1,
            winner: [b'G'; 32],
            rounds: vec![IrvRoundBody {
                highest: vec![([b'G'; 32], 11), ([b'J'; 32], 9)],
                lowest: None,
            }],
        };
        let packed = body.pack();
        let unpacked = IrvTallyBody::unpack(&packed).unwrap();
        assert_eq!(unpacked, body);
    }

    #[test]
    fn coombs_tally_round_trips_with_lowest_map() {
        let body = IrvTallyBody {
            coombs: true,
            collection_ref_hash: [3u8; 32],
            meets_quorum: false,
            valid_ballots: 10,
            invalid_ballots: 2,
            exhausted_ballots: 0,
            winner: NO_WINNER,
            rounds: vec![IrvRoundBody {
                highest: vec![([b'G'; 32], 5), ([b'J'; 32], 5)],
                lowest: Some(vec![([b'G'; 32], 1), ([b'J'; 32], 9)]),
            }],
        };
        let packed = body.pack();
        let unpacked = IrvTallyBody::unpack(&packed).unwrap();
        assert_eq!(unpacked, body);
    }

    #[test]
    fn tally_dispatches_on_method_tag() {
        let plurality = PluralityTallyBody {
            collection_ref_hash: [0u8; 32],
            meets_quorum: true,
            ties: 0,
            valid_ballots: 1,
            invalid_ballots: 0,
            valid_votes: 1,
            invalid_votes: 0,
            winners: vec![[1u8; 32]],
            candidate_tally: vec![([1u8; 32], 1)],
        };
        let action = Tally::Plurality(plurality.clone());
        assert_eq!(Tally::unpack(&action.pack()).unwrap(), action);
    }
}
