//! Chain validator (C5): per-block and whole-chain verification.
//!
//! Every public function here returns a plain `bool`. Per the error
//! handling design, no structured error escapes this boundary — a
//! malformed frame is just as invalid as a bad signature.

use crate::block::{Block, GenesisBlock};
use crate::crypto;
use crate::difficulty::{coerce_difficulty, meets_difficulty};
use tracing::warn;

/// Verifies a single normal block: signature validity (I1) and difficulty
/// (I2). Does not check chain linkage — that is only meaningful in context,
/// see [`verify_chain`].
pub fn verify_block(bytes: &[u8], d: u8) -> bool {
    let Ok(block) = Block::unpack(bytes) else {
        warn!("block failed to unpack");
        return false;
    };
    verify_block_parsed(&block, d)
}

fn verify_block_parsed(block: &Block, d: u8) -> bool {
    let d = coerce_difficulty(d);
    let preimage = Block::preimage(&block.previous_hash, &block.nonce, &block.body);
    if !crypto::verify(&block.address, &preimage, &block.signature) {
        warn!("I1 violated: block signature does not verify");
        return false;
    }
    if !meets_difficulty(&block.signature, d) {
        warn!("I2 violated: block signature does not meet difficulty floor");
        return false;
    }
    true
}

/// Verifies a genesis block: signature validity (I1), difficulty (I2), and
/// that its declared address matches `genesis_address` (I3).
pub fn verify_genesis_block(bytes: &[u8], genesis_address: &[u8; 32], d: u8) -> bool {
    let Ok(genesis) = GenesisBlock::unpack(bytes) else {
        warn!("genesis block failed to unpack");
        return false;
    };
    verify_genesis_block_parsed(&genesis, genesis_address, d)
}

fn verify_genesis_block_parsed(genesis: &GenesisBlock, genesis_address: &[u8; 32], d: u8) -> bool {
    let d = coerce_difficulty(d);
    let preimage =
        GenesisBlock::preimage(&genesis.node_address, &genesis.nonce, &genesis.public_key);
    if !crypto::verify(&genesis.address, &preimage, &genesis.signature) {
        warn!("I1 violated: genesis block signature does not verify");
        return false;
    }
    if genesis.address != *genesis_address {
        warn!("I3 violated: genesis block signer is not the configured genesis authority");
        return false;
    }
    if !meets_difficulty(&genesis.signature, d) {
        warn!("I2 violated: genesis block signature does not meet difficulty floor");
        return false;
    }
    true
}

/// Verifies a whole chain: `blocks[0]` must be a genesis block, the rest
/// normal blocks. Checks I1–I5 as specified; any decoding failure anywhere
/// in the chain is treated as a validation failure, not propagated.
pub fn verify_chain(blocks: &[Vec<u8>], genesis_address: &[u8; 32], d: u8) -> bool {
    if blocks.is_empty() {
        warn!("empty chain has no genesis block");
        return false;
    }

    let Ok(genesis) = GenesisBlock::unpack(&blocks[0]) else {
        warn!("chain[0] failed to unpack as a genesis block");
        return false;
    };
    if !verify_genesis_block_parsed(&genesis, genesis_address, d) {
        return false;
    }

    let mut previous_hash = genesis.hash();
    let mut previous_address = genesis.node_address;

    for (i, raw) in blocks.iter().enumerate().skip(1) {
        let Ok(block) = Block::unpack(raw) else {
            warn!(index = i, "block failed to unpack");
            return false;
        };
        if !verify_block_parsed(&block, d) {
            return false;
        }
        if block.previous_hash != previous_hash {
            warn!(index = i, "I4 violated: previous_hash does not match predecessor");
            return false;
        }
        if i >= 2 && block.address != previous_address {
            warn!(index = i, "I5 violated: chain signer changed mid-chain");
            return false;
        }
        previous_hash = block.hash();
        previous_address = block.address;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{create_block, create_block_on_genesis, create_genesis_block, PreviousBlock, PreviousGenesis};
    use crate::identity::Identity;

    fn dummy_chain(genesis_seed: u8, node_seed: u8, n_blocks: usize) -> (Vec<Vec<u8>>, [u8; 32]) {
        let genesis_identity = Identity::from_seed([genesis_seed; 32]);
        let node_identity = Identity::from_seed([node_seed; 32]);
        let raw_genesis = create_genesis_block(
            genesis_identity.seed(),
            *node_identity.address(),
            *node_identity.curve25519_public(),
            1,
        );
        let mut blocks = vec![raw_genesis.clone()];
        if n_blocks > 0 {
            let genesis = GenesisBlock::unpack(&raw_genesis).unwrap();
            let mut raw = create_block_on_genesis(
                node_identity.seed(),
                PreviousGenesis::Parsed(&genesis),
                vec![0u8],
                1,
            )
            .unwrap();
            blocks.push(raw.clone());
            for i in 1..n_blocks {
                raw = create_block(
                    node_identity.seed(),
                    PreviousBlock::Raw(&raw),
                    vec![i as u8],
                    1,
                )
                .unwrap();
                blocks.push(raw.clone());
            }
        }
        (blocks, *genesis_identity.address())
    }

    #[test]
    fn fresh_chain_verifies() {
        let (blocks, genesis_address) = dummy_chain(10, 20, 3);
        assert!(verify_chain(&blocks, &genesis_address, 1));
    }

    #[test]
    fn tampering_with_body_breaks_verification() {
        let (mut blocks, genesis_address) = dummy_chain(11, 21, 3);
        let last = blocks.last_mut().unwrap();
        *last.last_mut().unwrap() ^= 0xFF;
        assert!(!verify_chain(&blocks, &genesis_address, 1));
    }

    #[test]
    fn tampering_with_signature_breaks_verification() {
        let (mut blocks, genesis_address) = dummy_chain(12, 22, 2);
        blocks[1][0] ^= 0xFF;
        assert!(!verify_chain(&blocks, &genesis_address, 1));
    }

    #[test]
    fn swapping_blocks_breaks_verification() {
        let (mut blocks, genesis_address) = dummy_chain(13, 23, 3);
        blocks.swap(1, 2);
        assert!(!verify_chain(&blocks, &genesis_address, 1));
    }

    #[test]
    fn genesis_isolation_rejects_wrong_authority() {
        let (blocks, _) = dummy_chain(14, 24, 1);
        let other_identity = Identity::from_seed([99u8; 32]);
        assert!(!verify_chain(&blocks, other_identity.address(), 1));
    }

    #[test]
    fn address_continuity_rejects_hostile_takeover() {
        let (mut blocks, genesis_address) = dummy_chain(15, 25, 2);
        let intruder = Identity::from_seed([77u8; 32]);
        let tip = Block::unpack(blocks.last().unwrap()).unwrap();
        let hijacked = create_block(
            intruder.seed(),
            PreviousBlock::Parsed(&tip),
            b"hostile".to_vec(),
            1,
        )
        .unwrap();
        blocks.push(hijacked);
        assert!(!verify_chain(&blocks, &genesis_address, 1));
    }

    #[test]
    fn single_block_verify_helpers_accept_valid_blocks() {
        let (blocks, genesis_address) = dummy_chain(16, 26, 1);
        assert!(verify_genesis_block(&blocks[0], &genesis_address, 1));
        assert!(verify_block(&blocks[1], 1));
    }
}
