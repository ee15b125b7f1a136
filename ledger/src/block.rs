//! Block codec (C3): byte-exact framing for normal and genesis blocks.

use crate::error::FramingError;

/// Minimum length of any block frame (the fixed header).
pub const HEADER_LEN: usize = 144;

/// A normal (non-genesis) block, decoded from its fixed-layout frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub signature: [u8; 64],
    pub address: [u8; 32],
    pub previous_hash: [u8; 32],
    pub nonce: [u8; 16],
    pub body: Vec<u8>,
}

impl Block {
    /// The preimage signed over by a normal block: `previous_hash ‖ nonce ‖ body`.
    pub fn preimage(previous_hash: &[u8; 32], nonce: &[u8; 16], body: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(32 + 16 + body.len());
        buf.extend_from_slice(previous_hash);
        buf.extend_from_slice(nonce);
        buf.extend_from_slice(body);
        buf
    }

    /// This block's identifier: `SHA256(signature)`.
    pub fn hash(&self) -> [u8; 32] {
        crate::crypto::sha256(&self.signature)
    }

    /// Packs this block into its framed byte representation.
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.body.len());
        buf.extend_from_slice(&self.signature);
        buf.extend_from_slice(&self.address);
        buf.extend_from_slice(&self.previous_hash);
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&self.body);
        buf
    }

    /// Unpacks a normal block frame. Does not validate cryptographically —
    /// that is C5's job.
    pub fn unpack(bytes: &[u8]) -> Result<Self, FramingError> {
        if bytes.len() < HEADER_LEN {
            return Err(FramingError::TooShort { len: bytes.len() });
        }
        let mut signature = [0u8; 64];
        signature.copy_from_slice(&bytes[0..64]);
        let mut address = [0u8; 32];
        address.copy_from_slice(&bytes[64..96]);
        let mut previous_hash = [0u8; 32];
        previous_hash.copy_from_slice(&bytes[96..128]);
        let mut nonce = [0u8; 16];
        nonce.copy_from_slice(&bytes[128..144]);
        let body = bytes[144..].to_vec();
        Ok(Block {
            signature,
            address,
            previous_hash,
            nonce,
            body,
        })
    }
}

/// A genesis block: the first block of a node's chain, signed by the
/// genesis authority. Its body is exactly the node's Curve25519 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisBlock {
    pub signature: [u8; 64],
    /// The declared genesis-authority address (signer of this block).
    pub address: [u8; 32],
    /// The new node's Ed25519 address.
    pub node_address: [u8; 32],
    pub nonce: [u8; 16],
    pub public_key: [u8; 32],
}

impl GenesisBlock {
    /// The preimage signed over by a genesis block: `node_address ‖ nonce ‖ public_key`.
    pub fn preimage(node_address: &[u8; 32], nonce: &[u8; 16], public_key: &[u8; 32]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(32 + 16 + 32);
        buf.extend_from_slice(node_address);
        buf.extend_from_slice(nonce);
        buf.extend_from_slice(public_key);
        buf
    }

    /// This block's identifier: `SHA256(signature)`.
    pub fn hash(&self) -> [u8; 32] {
        crate::crypto::sha256(&self.signature)
    }

    /// Packs this genesis block into its framed byte representation.
    /// Always exactly 176 bytes (144 header + 32 public key).
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + 32);
        buf.extend_from_slice(&self.signature);
        buf.extend_from_slice(&self.address);
        buf.extend_from_slice(&self.node_address);
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&self.public_key);
        buf
    }

    /// Unpacks a genesis block frame. The same 144-byte prefix as a normal
    /// block is reinterpreted: bytes 96..128 are `node_address` rather than
    /// `previous_hash`, and the body region must be exactly 32 bytes (the
    /// node's Curve25519 public key), not an arbitrary-length body.
    pub fn unpack(bytes: &[u8]) -> Result<Self, FramingError> {
        if bytes.len() < HEADER_LEN {
            return Err(FramingError::TooShort { len: bytes.len() });
        }
        let body = &bytes[144..];
        if body.len() != 32 {
            return Err(FramingError::TrailingBytes);
        }
        let mut signature = [0u8; 64];
        signature.copy_from_slice(&bytes[0..64]);
        let mut address = [0u8; 32];
        address.copy_from_slice(&bytes[64..96]);
        let mut node_address = [0u8; 32];
        node_address.copy_from_slice(&bytes[96..128]);
        let mut nonce = [0u8; 16];
        nonce.copy_from_slice(&bytes[128..144]);
        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(body);
        Ok(GenesisBlock {
            signature,
            address,
            node_address,
            nonce,
            public_key,
        })
    }
}
