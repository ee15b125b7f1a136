//! Node-local configuration.
//!
//! This module aggregates configuration for:
//!
//! - proof-of-work difficulty (`DifficultyFloor`),
//! - the write-in/unranked placeholder the tally normalizer appends,
//! - the on-disk chain directory a caller-provided daemon reads blocks from.
//!
//! The goal is a single `NodeConfig` struct that a caller can construct from
//! defaults, a config file, or environment variables.

use std::path::PathBuf;

use crate::difficulty::{coerce_difficulty, MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::tally::DEFAULT_PLACEHOLDER;

/// Mild proof-of-work difficulty, clamped to `[MIN_DIFFICULTY, MAX_DIFFICULTY]`.
///
/// Values outside the range are coerced to [`MIN_DIFFICULTY`] rather than
/// rejected, matching [`coerce_difficulty`]'s behavior at the block-builder
/// boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultyFloor(u8);

impl DifficultyFloor {
    pub fn new(requested: u8) -> Self {
        DifficultyFloor(coerce_difficulty(requested))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for DifficultyFloor {
    fn default() -> Self {
        DifficultyFloor(MIN_DIFFICULTY)
    }
}

/// Top-level configuration for a chain node.
///
/// This aggregates the tuning a caller-provided daemon or CLI needs to drive
/// the block builder, chain validator, and tally normalizer; the ledger core
/// itself has no daemon or CLI.
#[derive(Clone, Debug)]
pub struct NodeConfig {
    /// Minimum proof-of-work difficulty new blocks on this node are built at.
    pub difficulty: DifficultyFloor,
    /// Placeholder candidate label the tally normalizer appends to ballots
    /// that didn't rank every known candidate.
    pub write_in_placeholder: Vec<u8>,
    /// Directory `write_block_file`/`read_chain_dir` operate on.
    pub chain_dir: PathBuf,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            difficulty: DifficultyFloor::default(),
            write_in_placeholder: DEFAULT_PLACEHOLDER.to_vec(),
            chain_dir: PathBuf::from("data/chain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_floor_clamps_out_of_range_to_minimum() {
        assert_eq!(DifficultyFloor::new(0).get(), MIN_DIFFICULTY);
        assert_eq!(DifficultyFloor::new(255).get(), MIN_DIFFICULTY);
        assert_eq!(DifficultyFloor::new(MAX_DIFFICULTY).get(), MAX_DIFFICULTY);
    }

    #[test]
    fn node_config_default_matches_spec_defaults() {
        let cfg = NodeConfig::default();
        assert_eq!(cfg.difficulty.get(), MIN_DIFFICULTY);
        assert_eq!(cfg.write_in_placeholder, DEFAULT_PLACEHOLDER);
    }
}
