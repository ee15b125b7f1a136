//! MESSAGE, BROADCAST, REFERENCE, PAY_RESPECTS, and TALLY_NEW_ALG bodies.
//!
//! Only framing is implemented here; sealed-box encryption/decryption of a
//! MESSAGE's ciphertext is out of scope — the envelope round-trips, the
//! payload is opaque bytes.

use super::{read_hash, read_u16_prefixed, read_u8, tag, write_u16_prefixed};
use crate::error::{BodyError, FramingError};

/// `tag ‖ recipient_address:32 ‖ len(ciphertext):u16 ‖ ciphertext`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub recipient_address: [u8; 32],
    pub ciphertext: Vec<u8>,
}

impl Message {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(tag::MESSAGE);
        buf.extend_from_slice(&self.recipient_address);
        write_u16_prefixed(&mut buf, &self.ciphertext).expect("caller-bounded length");
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let t = read_u8(bytes, &mut pos, "tag")?;
        if t != tag::MESSAGE {
            return Err(BodyError::UnknownTag(t));
        }
        let recipient_address = read_hash(bytes, &mut pos, "recipient_address")?;
        let ciphertext = read_u16_prefixed(bytes, &mut pos, "ciphertext")?.to_vec();
        if pos != bytes.len() {
            return Err(FramingError::TrailingBytes.into());
        }
        Ok(Message {
            recipient_address,
            ciphertext,
        })
    }
}

/// `tag ‖ len(message):u16 ‖ message`: public, plaintext, on the signer's
/// own chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Broadcast {
    pub message: Vec<u8>,
}

impl Broadcast {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(tag::BROADCAST);
        write_u16_prefixed(&mut buf, &self.message).expect("caller-bounded length");
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let t = read_u8(bytes, &mut pos, "tag")?;
        if t != tag::BROADCAST {
            return Err(BodyError::UnknownTag(t));
        }
        let message = read_u16_prefixed(bytes, &mut pos, "message")?.to_vec();
        if pos != bytes.len() {
            return Err(FramingError::TrailingBytes.into());
        }
        Ok(Broadcast { message })
    }
}

/// `tag ‖ referenced_chain_address:32 ‖ referenced_block_hash:32 ‖
/// len(comment):u16 ‖ comment`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub referenced_chain_address: [u8; 32],
    pub referenced_block_hash: [u8; 32],
    pub comment: Vec<u8>,
}

impl Reference {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(tag::REFERENCE);
        buf.extend_from_slice(&self.referenced_chain_address);
        buf.extend_from_slice(&self.referenced_block_hash);
        write_u16_prefixed(&mut buf, &self.comment).expect("caller-bounded length");
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let t = read_u8(bytes, &mut pos, "tag")?;
        if t != tag::REFERENCE {
            return Err(BodyError::UnknownTag(t));
        }
        let referenced_chain_address = read_hash(bytes, &mut pos, "referenced_chain_address")?;
        let referenced_block_hash = read_hash(bytes, &mut pos, "referenced_block_hash")?;
        let comment = read_u16_prefixed(bytes, &mut pos, "comment")?.to_vec();
        if pos != bytes.len() {
            return Err(FramingError::TrailingBytes.into());
        }
        Ok(Reference {
            referenced_chain_address,
            referenced_block_hash,
            comment,
        })
    }
}

/// `tag ‖ tally_ref_hash:32`, sent in reply to a quorum-failing
/// TALLY_OF_VOTES block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayRespects {
    pub tally_ref_hash: [u8; 32],
}

impl PayRespects {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(33);
        buf.push(tag::PAY_RESPECTS);
        buf.extend_from_slice(&self.tally_ref_hash);
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let t = read_u8(bytes, &mut pos, "tag")?;
        if t != tag::PAY_RESPECTS {
            return Err(BodyError::UnknownTag(t));
        }
        let tally_ref_hash = read_hash(bytes, &mut pos, "tally_ref_hash")?;
        if pos != bytes.len() {
            return Err(FramingError::TrailingBytes.into());
        }
        Ok(PayRespects { tally_ref_hash })
    }
}

/// `tag ‖ method_descriptor:[u8; 10] ‖ prior_tally_ref_hash:32`: a new,
/// not-yet-standardized tally method that supersedes a prior tally block's
/// result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyNewAlg {
    pub method_descriptor: [u8; 10],
    pub prior_tally_ref_hash: [u8; 32],
}

impl TallyNewAlg {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + 10 + 32);
        buf.push(tag::TALLY_NEW_ALG);
        buf.extend_from_slice(&self.method_descriptor);
        buf.extend_from_slice(&self.prior_tally_ref_hash);
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, BodyError> {
        let mut pos = 0;
        let t = read_u8(bytes, &mut pos, "tag")?;
        if t != tag::TALLY_NEW_ALG {
            return Err(BodyError::UnknownTag(t));
        }
        if bytes.len() < pos + 10 {
            return Err(FramingError::TruncatedField("method_descriptor").into());
        }
        let mut method_descriptor = [0u8; 10];
        method_descriptor.copy_from_slice(&bytes[pos..pos + 10]);
        pos += 10;
        let prior_tally_ref_hash = read_hash(bytes, &mut pos, "prior_tally_ref_hash")?;
        if pos != bytes.len() {
            return Err(FramingError::TrailingBytes.into());
        }
        Ok(TallyNewAlg {
            method_descriptor,
            prior_tally_ref_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_round_trips() {
        let m = Message {
            recipient_address: [1u8; 32],
            ciphertext: vec![0xAB; 40],
        };
        assert_eq!(Message::unpack(&m.pack()).unwrap(), m);
    }

    #[test]
    fn broadcast_round_trips() {
        let b = Broadcast {
            message: b"quorum met, proposal 7 passes".to_vec(),
        };
        assert_eq!(Broadcast::unpack(&b.pack()).unwrap(), b);
    }

    #[test]
    fn reference_round_trips() {
        let r = Reference {
            referenced_chain_address: [2u8; 32],
            referenced_block_hash: [3u8; 32],
            comment: b"see also".to_vec(),
        };
        assert_eq!(Reference::unpack(&r.pack()).unwrap(), r);
    }

    #[test]
    fn pay_respects_round_trips() {
        let p = PayRespects {
            tally_ref_hash: [4u8; 32],
        };
        assert_eq!(PayRespects::unpack(&p.pack()).unwrap(), p);
    }

    #[test]
    fn tally_new_alg_round_trips() {
        let t = TallyNewAlg {
            method_descriptor: *b"condorcet+",
            prior_tally_ref_hash: [5u8; 32],
        };
        assert_eq!(TallyNewAlg::unpack(&t.pack()).unwrap(), t);
    }
}
