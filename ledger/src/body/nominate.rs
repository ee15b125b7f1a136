//! NOMINATE bodies: a bare reference to a prior PROPOSAL block.

use super::{read_hash, read_u8, tag};
use crate::error::{BodyError, FramingError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nominate {
    pub proposal_ref_hash: [u8; 32],
}

impl Nominate {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(33);
        buf.push(tag::NOMINATE);
        buf.extend_from_slice(&self.proposal_ref_hash);
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let t = read_u8(bytes, &mut pos, "tag")?;
        if t != tag::NOMINATE {
            return Err(BodyError::UnknownTag(t));
        }
        let proposal_ref_hash = read_hash(bytes, &mut pos, "proposal_ref_hash")?;
        if pos != bytes.len() {
            return Err(FramingError::TrailingBytes.into());
        }
        Ok(Nominate { proposal_ref_hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominate_round_trips() {
        let n = Nominate {
            proposal_ref_hash: [7u8; 32],
        };
        assert_eq!(Nominate::unpack(&n.pack()).unwrap(), n);
    }
}
