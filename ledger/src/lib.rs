//! Ledger core: an append-only, signed, hash-linked chain of
//! governance-action blocks, plus the deterministic tally engine that
//! interprets ballot collections into results.
//!
//! This crate provides:
//!
//! - cryptographic primitives (`crypto`, `identity`) — Ed25519 sign/verify,
//!   SHA-256 hashing, Ed25519→Curve25519 key derivation,
//! - a mild proof-of-work difficulty predicate (`difficulty`),
//! - block framing and the block builder (`block`, `builder`),
//! - a chain validator enforcing the link/ownership invariants (`chain`),
//! - the tagged governance-action body codec (`body`),
//! - the ballot normalizer and tally algorithms (`tally`),
//! - on-disk chain layout helpers (`storage`),
//! - node-local configuration (`config`).
//!
//! There is no binary, network transport, or CLI in this crate — a caller
//! (daemon, CLI, test harness) composes these pieces.

pub mod block;
pub mod body;
pub mod builder;
pub mod chain;
pub mod config;
pub mod crypto;
pub mod difficulty;
pub mod error;
pub mod identity;
pub mod storage;
pub mod tally;

pub use block::{Block, GenesisBlock};
pub use builder::{create_block, create_block_on_genesis, create_genesis_block, PreviousBlock, PreviousGenesis};
pub use chain::{verify_block, verify_chain, verify_genesis_block};
pub use config::{DifficultyFloor, NodeConfig};
pub use crypto::{address_from_seed, derive_curve25519_private, derive_curve25519_public, sha256, sign, verify, Address, RawSignature};
pub use difficulty::{coerce_difficulty, meets_difficulty, MAX_DIFFICULTY, MIN_DIFFICULTY};
pub use error::{BodyError, FramingError, TallyError};
pub use identity::Identity;

pub use body::ballot::Ballot;
pub use body::broadcast::{Broadcast, Message, PayRespects, Reference, TallyNewAlg};
pub use body::collection::CollectBallots;
pub use body::nominate::Nominate;
pub use body::party::{DeclareParty, PartyMatter};
pub use body::proposal::{Candidate, Proposal};
pub use body::tally::{IrvTallyBody, PluralityTallyBody, Tally};
pub use body::{Action, ElectionMethod};

pub use tally::{
    irv, irv_coombs, normalize_ranked_ballots, plurality, stv_droop, IrvResult, PluralityResult,
    RankGroup, RankedBallot, StvResult, DEFAULT_PLACEHOLDER,
};

pub use storage::{read_chain_dir, write_block_file, ChainStore, FileChainStore, InMemoryChainStore, StorageError};
