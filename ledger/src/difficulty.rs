//! Difficulty predicate (C2): a mild proof-of-work target over a
//! signature's SHA-256.

use crate::crypto::sha256;
use tracing::trace;

/// Lowest accepted difficulty (coercion floor/ceiling, see [`coerce_difficulty`]).
pub const MIN_DIFFICULTY: u8 = 1;
/// Highest accepted difficulty.
pub const MAX_DIFFICULTY: u8 = 4;

/// Coerces a supplied difficulty into the valid `1..=4` range.
///
/// Per spec, `0` and any value `>= 5` are coerced to `1`; values in
/// `1..=4` pass through unchanged.
pub fn coerce_difficulty(d: u8) -> u8 {
    if d == 0 || d > MAX_DIFFICULTY {
        MIN_DIFFICULTY
    } else {
        d
    }
}

/// Tests whether `signature`'s SHA-256 hash has at least `d` leading zero
/// bytes. `d == 0` is vacuously true.
pub fn meets_difficulty(signature: &[u8], d: u8) -> bool {
    if d == 0 {
        return true;
    }
    let digest = sha256(signature);
    let d = d as usize;
    digest[..d.min(digest.len())].iter().all(|&b| b == 0)
}

/// Draws nonces via `next_nonce` and signs via `sign` until the resulting
/// signature meets `d`, returning the winning `(nonce, signature)` pair.
///
/// Shared by the normal and genesis block builders (C4); kept here since it
/// is purely the difficulty predicate applied in a loop.
pub fn search<N, S>(d: u8, mut next_nonce: N, mut sign: S) -> ([u8; 16], [u8; 64])
where
    N: FnMut() -> [u8; 16],
    S: FnMut(&[u8; 16]) -> [u8; 64],
{
    let d = coerce_difficulty(d);
    let mut attempts: u64 = 0;
    loop {
        let nonce = next_nonce();
        let signature = sign(&nonce);
        attempts += 1;
        if meets_difficulty(&signature, d) {
            trace!(attempts, difficulty = d, "nonce search succeeded");
            return (nonce, signature);
        }
        trace!(attempts, difficulty = d, "nonce rejected by difficulty predicate");
    }
}
