//! Body codec (C6): tagged encoding/decoding of governance actions keyed by
//! a 1-byte control character.
//!
//! The tag registry below is the canonical assignment from the control-
//! character registry: the corpus carries two partially-conflicting
//! tables, and this one is the one actually implemented.

pub mod ballot;
pub mod broadcast;
pub mod collection;
pub mod nominate;
pub mod party;
pub mod proposal;
pub mod tally;

use crate::error::{BodyError, FramingError};

/// Control-character tag bytes.
pub mod tag {
    pub const PROPOSAL_PLURALITY: u8 = 0x00;
    pub const PROPOSAL_IRV: u8 = 0x01;
    pub const PROPOSAL_IRV_COOMBS: u8 = 0x02;
    pub const PROPOSAL_STV_DROOP: u8 = 0x03;
    pub const PROPOSAL_STV_HARE: u8 = 0x04;
    pub const PROPOSAL_APPROVAL: u8 = 0x05;
    pub const PROPOSAL_CAV: u8 = 0x06;
    pub const PROPOSAL_BORDA: u8 = 0x07;
    pub const PROPOSAL_DOWDALL: u8 = 0x08;
    pub const PROPOSAL_BUCKLIN: u8 = 0x09;
    pub const PROPOSAL_SCORE: u8 = 0x0A;
    pub const PROPOSAL_STAR: u8 = 0x0B;
    pub const PROPOSAL_COPELAND: u8 = 0x0C;
    pub const PROPOSAL_SCHULZE: u8 = 0x0D;
    pub const PROPOSAL_SORTITION: u8 = 0x0E;
    pub const PROPOSAL_MMP: u8 = 0x0F;
    pub const BALLOT_PLURALITY: u8 = 0x10;
    pub const BALLOT_RANKED: u8 = 0x11;
    pub const BALLOT_APPROVAL: u8 = 0x12;
    pub const BALLOT_SCORE: u8 = 0x13;
    pub const BALLOT_MMP: u8 = 0x14;
    pub const NOMINATE: u8 = 0x15;
    pub const COLLECT_BALLOTS: u8 = 0x16;
    pub const TALLY_OF_VOTES: u8 = 0x17;
    pub const TALLY_NEW_ALG: u8 = 0x18;
    pub const DECLARE_PARTY: u8 = 0x19;
    pub const PARTY_MATTER: u8 = 0x1A;
    pub const MESSAGE: u8 = 0x1B;
    pub const BROADCAST: u8 = 0x1C;
    pub const REFERENCE: u8 = 0x1D;
    pub const OTHER: u8 = 0x1F;
    pub const PAY_RESPECTS: u8 = 0x46;
}

/// Election method, encoded in the proposal/tally tag byte rather than the
/// body itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElectionMethod {
    Plurality,
    Irv,
    IrvCoombs,
    StvDroop,
    StvHare,
    Approval,
    Cav,
    Borda,
    Dowdall,
    Bucklin,
    Score,
    Star,
    Copeland,
    Schulze,
    Sortition,
    Mmp,
}

impl ElectionMethod {
    /// The tag byte a `PROPOSAL_*` action uses for this method.
    pub fn proposal_tag(self) -> u8 {
        use tag::*;
        match self {
            ElectionMethod::Plurality => PROPOSAL_PLURALITY,
            ElectionMethod::Irv => PROPOSAL_IRV,
            ElectionMethod::IrvCoombs => PROPOSAL_IRV_COOMBS,
            ElectionMethod::StvDroop => PROPOSAL_STV_DROOP,
            ElectionMethod::StvHare => PROPOSAL_STV_HARE,
            ElectionMethod::Approval => PROPOSAL_APPROVAL,
            ElectionMethod::Cav => PROPOSAL_CAV,
            ElectionMethod::Borda => PROPOSAL_BORDA,
            ElectionMethod::Dowdall => PROPOSAL_DOWDALL,
            ElectionMethod::Bucklin => PROPOSAL_BUCKLIN,
            ElectionMethod::Score => PROPOSAL_SCORE,
            ElectionMethod::Star => PROPOSAL_STAR,
            ElectionMethod::Copeland => PROPOSAL_COPELAND,
            ElectionMethod::Schulze => PROPOSAL_SCHULZE,
            ElectionMethod::Sortition => PROPOSAL_SORTITION,
            ElectionMethod::Mmp => PROPOSAL_MMP,
        }
    }

    pub fn from_proposal_tag(t: u8) -> Option<Self> {
        use tag::*;
        Some(match t {
            PROPOSAL_PLURALITY => ElectionMethod::Plurality,
            PROPOSAL_IRV => ElectionMethod::Irv,
            PROPOSAL_IRV_COOMBS => ElectionMethod::IrvCoombs,
            PROPOSAL_STV_DROOP => ElectionMethod::StvDroop,
            PROPOSAL_STV_HARE => ElectionMethod::StvHare,
            PROPOSAL_APPROVAL => ElectionMethod::Approval,
            PROPOSAL_CAV => ElectionMethod::Cav,
            PROPOSAL_BORDA => ElectionMethod::Borda,
            PROPOSAL_DOWDALL => ElectionMethod::Dowdall,
            PROPOSAL_BUCKLIN => ElectionMethod::Bucklin,
            PROPOSAL_SCORE => ElectionMethod::Score,
            PROPOSAL_STAR => ElectionMethod::Star,
            PROPOSAL_COPELAND => ElectionMethod::Copeland,
            PROPOSAL_SCHULZE => ElectionMethod::Schulze,
            PROPOSAL_SORTITION => ElectionMethod::Sortition,
            PROPOSAL_MMP => ElectionMethod::Mmp,
            _ => return None,
        })
    }

    /// Whether this method's proposal body carries `number_of_winners`.
    ///
    /// Grounded on the reference implementation's `pack_irv_proposal`/
    /// `pack_irv_coombs_proposal`, which omit the field entirely (the body
    /// goes straight from `quorum_requirement` to `number_of_candidates`).
    /// No other method has a source function that drops the field, so the
    /// omission is not extended beyond IRV and IRV-Coombs.
    pub fn has_number_of_winners(self) -> bool {
        !matches!(self, ElectionMethod::Irv | ElectionMethod::IrvCoombs)
    }
}

pub(crate) fn write_u16_prefixed(buf: &mut Vec<u8>, data: &[u8]) -> Result<(), BodyError> {
    if data.len() > u16::MAX as usize {
        return Err(BodyError::IntroTooLong(data.len()));
    }
    buf.extend_from_slice(&(data.len() as u16).to_be_bytes());
    buf.extend_from_slice(data);
    Ok(())
}

pub(crate) fn read_u16_prefixed<'a>(
    bytes: &'a [u8],
    pos: &mut usize,
    field: &'static str,
) -> Result<&'a [u8], FramingError> {
    let len = read_u16(bytes, pos, field)? as usize;
    let start = *pos;
    let end = start
        .checked_add(len)
        .ok_or(FramingError::TruncatedField(field))?;
    if end > bytes.len() {
        return Err(FramingError::TruncatedField(field));
    }
    *pos = end;
    Ok(&bytes[start..end])
}

pub(crate) fn read_u16(
    bytes: &[u8],
    pos: &mut usize,
    field: &'static str,
) -> Result<u16, FramingError> {
    if *pos + 2 > bytes.len() {
        return Err(FramingError::TruncatedField(field));
    }
    let value = u16::from_be_bytes([bytes[*pos], bytes[*pos + 1]]);
    *pos += 2;
    Ok(value)
}

pub(crate) fn read_u32(
    bytes: &[u8],
    pos: &mut usize,
    field: &'static str,
) -> Result<u32, FramingError> {
    if *pos + 4 > bytes.len() {
        return Err(FramingError::TruncatedField(field));
    }
    let value = u32::from_be_bytes(bytes[*pos..*pos + 4].try_into().unwrap());
    *pos += 4;
    Ok(value)
}

pub(crate) fn read_u8(bytes: &[u8], pos: &mut usize, field: &'static str) -> Result<u8, FramingError> {
    if *pos + 1 > bytes.len() {
        return Err(FramingError::TruncatedField(field));
    }
    let value = bytes[*pos];
    *pos += 1;
    Ok(value)
}

pub(crate) fn read_hash(
    bytes: &[u8],
    pos: &mut usize,
    field: &'static str,
) -> Result<[u8; 32], FramingError> {
    if *pos + 32 > bytes.len() {
        return Err(FramingError::TruncatedField(field));
    }
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&bytes[*pos..*pos + 32]);
    *pos += 32;
    Ok(hash)
}

/// A governance action, decoded from a body. `PartyMatter` recurses into
/// another `Action`, per the body codec's "prefix; recurse" rule for tag
/// `0x1A`.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Proposal(proposal::Proposal),
    Ballot(ballot::Ballot),
    Nominate(nominate::Nominate),
    CollectBallots(collection::CollectBallots),
    TallyOfVotes(tally::Tally),
    TallyNewAlg(broadcast::TallyNewAlg),
    DeclareParty(party::DeclareParty),
    PartyMatter(party::PartyMatter),
    Message(broadcast::Message),
    Broadcast(broadcast::Broadcast),
    Reference(broadcast::Reference),
    PayRespects(broadcast::PayRespects),
}

impl Action {
    /// Packs this action back into its tagged byte representation.
    pub fn pack(&self) -> Vec<u8> {
        match self {
            Action::Proposal(p) => p.pack(),
            Action::Ballot(b) => b.pack(),
            Action::Nominate(n) => n.pack(),
            Action::CollectBallots(c) => c.pack(),
            Action::TallyOfVotes(t) => t.pack(),
            Action::TallyNewAlg(t) => t.pack(),
            Action::DeclareParty(d) => d.pack(),
            Action::PartyMatter(p) => p.pack(),
            Action::Message(m) => m.pack(),
            Action::Broadcast(b) => b.pack(),
            Action::Reference(r) => r.pack(),
            Action::PayRespects(p) => p.pack(),
        }
    }

    /// Decodes a tagged body into the matching action. Dispatches on the
    /// first byte per the control-character registry.
    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let &first = bytes.first().ok_or(FramingError::TooShort { len: 0 })?;
        match first {
            t if proposal::is_proposal_tag(t) => Ok(Action::Proposal(proposal::Proposal::unpack(bytes)?)),
            t if ballot::is_ballot_tag(t) => Ok(Action::Ballot(ballot::Ballot::unpack(bytes)?)),
            tag::NOMINATE => Ok(Action::Nominate(nominate::Nominate::unpack(bytes)?)),
            tag::COLLECT_BALLOTS => {
                Ok(Action::CollectBallots(collection::CollectBallots::unpack(bytes)?))
            }
            tag::TALLY_OF_VOTES => Ok(Action::TallyOfVotes(tally::Tally::unpack(bytes)?)),
            tag::TALLY_NEW_ALG => Ok(Action::TallyNewAlg(broadcast::TallyNewAlg::unpack(bytes)?)),
            tag::DECLARE_PARTY => Ok(Action::DeclareParty(party::DeclareParty::unpack(bytes)?)),
            tag::PARTY_MATTER => Ok(Action::PartyMatter(party::PartyMatter::unpack(bytes)?)),
            tag::MESSAGE => Ok(Action::Message(broadcast::Message::unpack(bytes)?)),
            tag::BROADCAST => Ok(Action::Broadcast(broadcast::Broadcast::unpack(bytes)?)),
            tag::REFERENCE => Ok(Action::Reference(broadcast::Reference::unpack(bytes)?)),
            tag::PAY_RESPECTS => Ok(Action::PayRespects(broadcast::PayRespects::unpack(bytes)?)),
            other => Err(BodyError::UnknownTag(other)),
        }
    }
}
