//! Block builder (C4): assembles and proof-of-works a new block.

use crate::block::{Block, GenesisBlock};
use crate::crypto;
use crate::difficulty;
use rand::RngCore;
use rand_core::OsRng;

/// Either a previously-built block's raw bytes or an already-unpacked
/// record. The builder accepts both so a caller holding either form doesn't
/// have to pack/unpack just to chain a new block onto it.
pub enum PreviousBlock<'a> {
    Raw(&'a [u8]),
    Parsed(&'a Block),
}

impl<'a> PreviousBlock<'a> {
    fn hash(&self) -> Result<[u8; 32], crate::error::FramingError> {
        match self {
            PreviousBlock::Raw(bytes) => Ok(Block::unpack(bytes)?.hash()),
            PreviousBlock::Parsed(block) => Ok(block.hash()),
        }
    }
}

/// A previous *genesis* block, for building the first normal block of a
/// chain directly on top of the genesis block.
pub enum PreviousGenesis<'a> {
    Raw(&'a [u8]),
    Parsed(&'a GenesisBlock),
}

impl<'a> PreviousGenesis<'a> {
    fn hash(&self) -> Result<[u8; 32], crate::error::FramingError> {
        match self {
            PreviousGenesis::Raw(bytes) => Ok(GenesisBlock::unpack(bytes)?.hash()),
            PreviousGenesis::Parsed(block) => Ok(block.hash()),
        }
    }
}

fn random_nonce() -> [u8; 16] {
    let mut nonce = [0u8; 16];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Builds a normal block on top of `previous`, searching for a nonce that
/// satisfies `d`. `previous` is the immediately preceding *normal* block.
pub fn create_block(
    seed: &[u8; 32],
    previous: PreviousBlock<'_>,
    body: Vec<u8>,
    d: u8,
) -> Result<Vec<u8>, crate::error::FramingError> {
    let previous_hash = previous.hash()?;
    let address = crypto::address_from_seed(seed);
    let (nonce, signature) = difficulty::search(
        d,
        random_nonce,
        |nonce| crypto::sign(seed, &Block::preimage(&previous_hash, nonce, &body)),
    );
    Ok(Block {
        signature,
        address,
        previous_hash,
        nonce,
        body,
    }
    .pack())
}

/// Builds a normal block directly on top of a genesis block (the chain's
/// second block).
pub fn create_block_on_genesis(
    seed: &[u8; 32],
    previous_genesis: PreviousGenesis<'_>,
    body: Vec<u8>,
    d: u8,
) -> Result<Vec<u8>, crate::error::FramingError> {
    let previous_hash = previous_genesis.hash()?;
    let address = crypto::address_from_seed(seed);
    let (nonce, signature) = difficulty::search(
        d,
        random_nonce,
        |nonce| crypto::sign(seed, &Block::preimage(&previous_hash, nonce, &body)),
    );
    Ok(Block {
        signature,
        address,
        previous_hash,
        nonce,
        body,
    }
    .pack())
}

/// Builds a genesis block admitting a new node to the federation.
///
/// `genesis_seed` is the genesis authority's seed (held once, at bootstrap);
/// `node_address`/`node_public_key` are the admitted node's Ed25519 address
/// and Curve25519 public key.
pub fn create_genesis_block(
    genesis_seed: &[u8; 32],
    node_address: [u8; 32],
    node_public_key: [u8; 32],
    d: u8,
) -> Vec<u8> {
    let genesis_address = crypto::address_from_seed(genesis_seed);
    let (nonce, signature) = difficulty::search(
        d,
        random_nonce,
        |nonce| {
            crypto::sign(
                genesis_seed,
                &GenesisBlock::preimage(&node_address, nonce, &node_public_key),
            )
        },
    );
    GenesisBlock {
        signature,
        address: genesis_address,
        node_address,
        nonce,
        public_key: node_public_key,
    }
    .pack()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;

    #[test]
    fn genesis_block_meets_difficulty_and_round_trips() {
        let genesis_identity = Identity::from_seed([1u8; 32]);
        let node_identity = Identity::from_seed([2u8; 32]);
        let raw = create_genesis_block(
            genesis_identity.seed(),
            *node_identity.address(),
            *node_identity.curve25519_public(),
            1,
        );
        let genesis = GenesisBlock::unpack(&raw).expect("unpack");
        assert_eq!(genesis.address, *genesis_identity.address());
        assert_eq!(genesis.node_address, *node_identity.address());
        assert!(difficulty::meets_difficulty(&genesis.signature, 1));
    }

    #[test]
    fn create_block_on_genesis_links_to_genesis_hash() {
        let genesis_identity = Identity::from_seed([3u8; 32]);
        let node_identity = Identity::from_seed([4u8; 32]);
        let raw_genesis = create_genesis_block(
            genesis_identity.seed(),
            *node_identity.address(),
            *node_identity.curve25519_public(),
            1,
        );
        let genesis = GenesisBlock::unpack(&raw_genesis).expect("unpack");
        let raw_block = create_block_on_genesis(
            node_identity.seed(),
            PreviousGenesis::Parsed(&genesis),
            b"hello".to_vec(),
            1,
        )
        .expect("build");
        let block = Block::unpack(&raw_block).expect("unpack");
        assert_eq!(block.previous_hash, genesis.hash());
        assert_eq!(block.address, *node_identity.address());
        assert!(difficulty::meets_difficulty(&block.signature, 1));
    }

    #[test]
    fn create_block_accepts_raw_previous_bytes() {
        let genesis_identity = Identity::from_seed([5u8; 32]);
        let node_identity = Identity::from_seed([6u8; 32]);
        let raw_genesis = create_genesis_block(
            genesis_identity.seed(),
            *node_identity.address(),
            *node_identity.curve25519_public(),
            1,
        );
        let raw_block_1 = create_block_on_genesis(
            node_identity.seed(),
            PreviousGenesis::Raw(&raw_genesis),
            vec![],
            1,
        )
        .expect("build");
        let raw_block_2 = create_block(
            node_identity.seed(),
            PreviousBlock::Raw(&raw_block_1),
            vec![1, 2, 3],
            1,
        )
        .expect("build");
        let block_2 = Block::unpack(&raw_block_2).expect("unpack");
        let block_1 = Block::unpack(&raw_block_1).expect("unpack");
        assert_eq!(block_2.previous_hash, block_1.hash());
    }
}
