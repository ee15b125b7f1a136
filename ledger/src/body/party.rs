//! DECLARE_PARTY and PARTY_MATTER bodies.

use super::{read_hash, read_u16_prefixed, read_u8, tag, write_u16_prefixed, Action};
use crate::error::{BodyError, FramingError};

/// `tag ‖ party_name_hash:32 ‖ len(party_name):u16 ‖ party_name`.
///
/// The first declarer for a given party hash is, by chain-order
/// convention, the one who decided the party's election method — but that
/// adjudication is a caller concern; the body codec only encodes/decodes
/// the declaration itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclareParty {
    pub party_name_hash: [u8; 32],
    pub party_name: Vec<u8>,
}

impl DeclareParty {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(tag::DECLARE_PARTY);
        buf.extend_from_slice(&self.party_name_hash);
        write_u16_prefixed(&mut buf, &self.party_name).expect("caller-bounded length");
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let t = read_u8(bytes, &mut pos, "tag")?;
        if t != tag::DECLARE_PARTY {
            return Err(BodyError::UnknownTag(t));
        }
        let party_name_hash = read_hash(bytes, &mut pos, "party_name_hash")?;
        let party_name = read_u16_prefixed(bytes, &mut pos, "party_name")?.to_vec();
        if pos != bytes.len() {
            return Err(FramingError::TrailingBytes.into());
        }
        Ok(DeclareParty {
            party_name_hash,
            party_name,
        })
    }
}

/// `tag ‖ party_name_hash:32 ‖ inner_tag ‖ inner_body`: recurses into the
/// general body codec for the wrapped action.
#[derive(Clone, Debug, PartialEq)]
pub struct PartyMatter {
    pub party_name_hash: [u8; 32],
    pub inner: Box<Action>,
}

impl PartyMatter {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(tag::PARTY_MATTER);
        buf.extend_from_slice(&self.party_name_hash);
        buf.extend_from_slice(&self.inner.pack());
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let t = read_u8(bytes, &mut pos, "tag")?;
        if t != tag::PARTY_MATTER {
            return Err(BodyError::UnknownTag(t));
        }
        let party_name_hash = read_hash(bytes, &mut pos, "party_name_hash")?;
        let inner = Action::unpack(&bytes[pos..])?;
        Ok(PartyMatter {
            party_name_hash,
            inner: Box::new(inner),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::nominate::Nominate;

    #[test]
    fn declare_party_round_trips() {
        let d = DeclareParty {
            party_name_hash: [1u8; 32],
            party_name: b"Reformists".to_vec(),
        };
        assert_eq!(DeclareParty::unpack(&d.pack()).unwrap(), d);
    }

    #[test]
    fn party_matter_recurses_into_inner_action() {
        let inner = Action::Nominate(Nominate {
            proposal_ref_hash: [2u8; 32],
        });
        let matter = PartyMatter {
            party_name_hash: [3u8; 32],
            inner: Box::new(inner),
        };
        let packed = matter.pack();
        let unpacked = PartyMatter::unpack(&packed).unwrap();
        assert_eq!(unpacked, matter);
    }
}
