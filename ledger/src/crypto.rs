//! Cryptographic primitives (C1): Ed25519 sign/verify, SHA-256 hashing, and
//! Ed25519 -> Curve25519 key derivation.
//!
//! All outputs are raw bytes, never hex or base64 — callers that want a
//! human-readable form reach for the `hex` crate themselves.

use curve25519_dalek::edwards::CompressedEdwardsY;
use curve25519_dalek::scalar::Scalar;
use ed25519_dalek::{Keypair, PublicKey as EdPublicKey, SecretKey, Signature as EdSignature};
use sha2::{Digest, Sha256, Sha512};

/// A 32-byte Ed25519 verify key, also used as a node/genesis address.
pub type Address = [u8; 32];
/// A raw 64-byte Ed25519 signature.
pub type RawSignature = [u8; 64];

/// Hashes `data` with SHA-256.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Signs `message` with the Ed25519 keypair derived from `seed`.
///
/// `seed` is the raw 32-byte Ed25519 seed; the verify key is rederived from
/// it so callers only ever need to hold the seed.
pub fn sign(seed: &[u8; 32], message: &[u8]) -> RawSignature {
    let keypair = keypair_from_seed(seed);
    let sig: EdSignature = ed25519_dalek::Signer::sign(&keypair, message);
    sig.to_bytes()
}

/// Verifies a 64-byte Ed25519 signature over `message` under `address`.
///
/// A malformed address or signature is treated the same as a failed
/// verification: this function never panics and always collapses to a
/// plain boolean, never leaking why verification failed.
pub fn verify(address: &Address, message: &[u8], signature: &RawSignature) -> bool {
    let Ok(public) = EdPublicKey::from_bytes(address) else {
        return false;
    };
    let Ok(sig) = EdSignature::from_bytes(signature) else {
        return false;
    };
    ed25519_dalek::Verifier::verify(&public, message, &sig).is_ok()
}

fn keypair_from_seed(seed: &[u8; 32]) -> Keypair {
    let secret = SecretKey::from_bytes(seed).expect("32-byte seed is always a valid SecretKey");
    let public = EdPublicKey::from(&secret);
    Keypair { secret, public }
}

/// Derives the Ed25519 address (verify key) for a signing seed.
pub fn address_from_seed(seed: &[u8; 32]) -> Address {
    keypair_from_seed(seed).public.to_bytes()
}

/// Derives the Curve25519 (X25519) public key corresponding to an Ed25519
/// address, by converting the Edwards point to its Montgomery form.
///
/// This is the same conversion `VerifyKey.to_curve25519_public_key()`
/// performs in the reference implementation.
pub fn derive_curve25519_public(address: &Address) -> Option<[u8; 32]> {
    let point = CompressedEdwardsY(*address).decompress()?;
    Some(point.to_montgomery().to_bytes())
}

/// Derives the Curve25519 (X25519) private scalar corresponding to an
/// Ed25519 signing seed.
///
/// Mirrors `SigningKey.to_curve25519_private_key()`: hash the seed with
/// SHA-512, take the low 32 bytes, and apply standard X25519 clamping
/// (clear the low 3 bits of byte 0, clear the top bit and set bit 6 of byte
/// 31).
pub fn derive_curve25519_private(seed: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha512::new();
    hasher.update(seed);
    let digest = hasher.finalize();

    let mut scalar_bytes = [0u8; 32];
    scalar_bytes.copy_from_slice(&digest[..32]);
    scalar_bytes[0] &= 248;
    scalar_bytes[31] &= 127;
    scalar_bytes[31] |= 64;

    // Route through curve25519-dalek's Scalar so the clamped bytes are
    // confirmed to form a valid scalar representation before handing them
    // back; the byte layout is unchanged by this round-trip.
    let scalar = Scalar::from_bits(scalar_bytes);
    scalar.to_bytes()
}
