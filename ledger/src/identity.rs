//! Node identity: everything derivable from a 32-byte Ed25519 seed.

use crate::crypto::{self, Address};

/// A node's full key material, derived entirely from its 32-byte seed.
///
/// `address == verify_key`; both names are kept since "address" is used
/// when talking about chain linkage and "verify key" when talking about
/// the underlying Ed25519 primitive.
#[derive(Clone)]
pub struct Identity {
    seed: [u8; 32],
    address: Address,
    curve25519_public: [u8; 32],
    curve25519_private: [u8; 32],
}

impl Identity {
    /// Derives a full identity record from a raw 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let address = crypto::address_from_seed(&seed);
        let curve25519_public =
            crypto::derive_curve25519_public(&address).expect("Ed25519 address is a valid point");
        let curve25519_private = crypto::derive_curve25519_private(&seed);
        Identity {
            seed,
            address,
            curve25519_public,
            curve25519_private,
        }
    }

    /// Returns the raw signing seed. Per the ownership model, this must
    /// never leave the node process; callers that persist it are
    /// responsible for the `<name>.seed` file permissions.
    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }

    /// The node's Ed25519 verify key / chain address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The node's Curve25519 public key, as declared in its genesis body.
    pub fn curve25519_public(&self) -> &[u8; 32] {
        &self.curve25519_public
    }

    /// The node's Curve25519 private scalar, for ECDHE key agreement.
    pub fn curve25519_private(&self) -> &[u8; 32] {
        &self.curve25519_private
    }

    /// Signs `message` under this identity's seed.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        crypto::sign(&self.seed, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_seed(byte: u8) -> [u8; 32] {
        [byte; 32]
    }

    #[test]
    fn identity_derivation_is_deterministic() {
        let a = Identity::from_seed(dummy_seed(5));
        let b = Identity::from_seed(dummy_seed(5));
        assert_eq!(a.address(), b.address());
        assert_eq!(a.curve25519_public(), b.curve25519_public());
        assert_eq!(a.curve25519_private(), b.curve25519_private());
    }

    #[test]
    fn different_seeds_yield_different_addresses() {
        let a = Identity::from_seed(dummy_seed(1));
        let b = Identity::from_seed(dummy_seed(2));
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn signature_verifies_under_own_address() {
        let id = Identity::from_seed(dummy_seed(42));
        let sig = id.sign(b"hello chain");
        assert!(crypto::verify(id.address(), b"hello chain", &sig));
    }
}
