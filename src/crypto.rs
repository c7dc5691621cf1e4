//! The signing engine: keys as truncated point hashes, verification by
//! public-key recovery.

use p192::NistP192;
use p256::NistP256;
use rand_core::CryptoRngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::ec;
use crate::error::Result;
use crate::suite::Suite;

/// A private key: the secret exponent as a minimal hex scalar, `0 < x < n`.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    /// Private exponent.
    pub x: String,
}

/// A public key.
///
/// Not the curve point: the SHA-256 hash of the canonical `"x:y"` point
/// string, truncated to the curve bit length (`curve_bits / 4` hex
/// characters). Half the size of a compressed point, at the cost of verifying
/// by recovery-and-compare instead of point arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// Truncated hash of the canonical point string.
    pub hash: String,
}

/// An ECDSA signature with its public key recovery parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// First signature scalar, minimal hex mod the curve order.
    pub r: String,
    /// Second signature scalar, minimal hex mod the curve order.
    pub s: String,
    /// Recovery parameter in `[0, 3]`, selecting which candidate point with
    /// x-coordinate derived from `r` was used.
    pub j: u8,
}

/// Wraps one immutable [`Suite`] and performs all curve and hash operations.
///
/// Engines hold no mutable state; the entropy source for key generation is
/// passed per call, so any number of engines (or calls) may run concurrently.
#[derive(Debug, Clone, Copy)]
pub struct CryptoEngine {
    suite: Suite,
}

impl CryptoEngine {
    /// Creates an engine bound to the given suite.
    pub fn new(suite: Suite) -> Self {
        Self { suite }
    }

    /// The suite this engine was constructed with.
    pub fn suite(&self) -> Suite {
        self.suite
    }

    /// Generates a private key from the supplied entropy source, retrying on
    /// the (negligible) out-of-range draw as standard EC keygen requires.
    pub fn generate_private_key(&self, rng: &mut impl CryptoRngCore) -> PrivateKey {
        let x = match self.suite {
            Suite::P192Sha256 => ec::generate_scalar_hex::<NistP192>(rng),
            Suite::P256Sha256 => ec::generate_scalar_hex::<NistP256>(rng),
        };
        PrivateKey { x }
    }

    /// Builds a private key whose exponent *is* the supplied hex secret, with
    /// no key-derivation hashing whatsoever.
    ///
    /// Test and debugging use only: production key material must come from
    /// [`CryptoEngine::generate_private_key`].
    pub fn private_key_from_secret(&self, secret: &str) -> Result<PrivateKey> {
        let x = match self.suite {
            Suite::P192Sha256 => ec::normalize_scalar_hex::<NistP192>(secret)?,
            Suite::P256Sha256 => ec::normalize_scalar_hex::<NistP256>(secret)?,
        };
        Ok(PrivateKey { x })
    }

    /// Derives the public key: hash of the canonical string of `x·G`.
    pub fn public_from_private(&self, private_key: &PrivateKey) -> Result<PublicKey> {
        let point = match self.suite {
            Suite::P192Sha256 => ec::public_point_string::<NistP192>(&private_key.x)?,
            Suite::P256Sha256 => ec::public_point_string::<NistP256>(&private_key.x)?,
        };
        Ok(PublicKey {
            hash: self.hash_message(point.as_bytes()),
        })
    }

    /// Signs a message, capturing the recovery parameter.
    ///
    /// The digest is the message hash truncated exactly as on the public-key
    /// path; the nonce is deterministic (RFC 6979), so signing consumes no
    /// entropy.
    pub fn sign(&self, message: &[u8], private_key: &PrivateKey) -> Result<Signature> {
        let digest = self.digest_bytes(message);
        let (r, s, j) = match self.suite {
            Suite::P192Sha256 => ec::sign_digest::<NistP192>(&digest, &private_key.x)?,
            Suite::P256Sha256 => ec::sign_digest::<NistP256>(&digest, &private_key.x)?,
        };
        Ok(Signature { r, s, j })
    }

    /// Recovers the public key that produced `signature` over `message`,
    /// canonicalized and hashed exactly as [`CryptoEngine::public_from_private`].
    pub fn recover_public_key(&self, message: &[u8], signature: &Signature) -> Result<PublicKey> {
        let digest = self.digest_bytes(message);
        let point = match self.suite {
            Suite::P192Sha256 => ec::recover_point_string::<NistP192>(
                &digest,
                &signature.r,
                &signature.s,
                signature.j,
            )?,
            Suite::P256Sha256 => ec::recover_point_string::<NistP256>(
                &digest,
                &signature.r,
                &signature.s,
                signature.j,
            )?,
        };
        Ok(PublicKey {
            hash: self.hash_message(point.as_bytes()),
        })
    }

    /// Verifies by recovering the signer's key and comparing hashes in
    /// constant time. Any recovery failure is an ordinary `false`.
    pub fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        match self.recover_public_key(message, signature) {
            Ok(recovered) => recovered.constant_time_eq(public_key),
            Err(_) => false,
        }
    }

    /// Message hash truncated to the curve bit length, as lowercase hex.
    pub(crate) fn hash_message(&self, message: &[u8]) -> String {
        hex::encode(&Sha256::digest(message)[..self.suite.field_bytes()])
    }

    /// The same truncated hash as raw bytes, for use as the signing digest.
    fn digest_bytes(&self, message: &[u8]) -> Vec<u8> {
        Sha256::digest(message)[..self.suite.field_bytes()].to_vec()
    }
}

impl PublicKey {
    /// Constant-time hash comparison. Length is public (fixed per suite), so
    /// only equal-length hashes are compared bytewise.
    pub(crate) fn constant_time_eq(&self, other: &PublicKey) -> bool {
        self.hash.len() == other.hash.len()
            && bool::from(self.hash.as_bytes().ct_eq(other.hash.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engines() -> Vec<CryptoEngine> {
        Suite::ALL.into_iter().map(CryptoEngine::new).collect()
    }

    #[test]
    fn public_key_hash_has_curve_bit_length() {
        for engine in engines() {
            let private_key = engine.private_key_from_secret("aa").unwrap();
            let public_key = engine.public_from_private(&private_key).unwrap();
            assert_eq!(public_key.hash.len(), engine.suite().hash_hex_len());
        }
    }

    #[test]
    fn secret_scalar_is_used_unhashed() {
        let engine = CryptoEngine::new(Suite::P192Sha256);
        let private_key = engine.private_key_from_secret("aa").unwrap();
        assert_eq!(private_key.x, "aa");
    }

    #[test]
    fn recovered_key_matches_derived_key() {
        for engine in engines() {
            let private_key = engine.private_key_from_secret("aa").unwrap();
            let public_key = engine.public_from_private(&private_key).unwrap();

            let message = b"blablabla";
            let signature = engine.sign(message, &private_key).unwrap();
            let recovered = engine.recover_public_key(message, &signature).unwrap();
            assert_eq!(recovered, public_key);
        }
    }

    #[test]
    fn signature_recovery_parameter_in_range() {
        for engine in engines() {
            let private_key = engine.private_key_from_secret("0123456789abcdef").unwrap();
            let signature = engine.sign(b"foobar", &private_key).unwrap();
            assert!(signature.j <= 3);
        }
    }

    #[test]
    fn tampered_message_fails_verification() {
        for engine in engines() {
            let mut rng = rand_core::OsRng;
            let private_key = engine.generate_private_key(&mut rng);
            let public_key = engine.public_from_private(&private_key).unwrap();

            let signature = engine.sign(b"foobar", &private_key).unwrap();
            assert!(engine.verify(b"foobar", &signature, &public_key));
            assert!(!engine.verify(b"notfoobar", &signature, &public_key));
        }
    }

    #[test]
    fn wrong_key_fails_verification() {
        let engine = CryptoEngine::new(Suite::P256Sha256);
        let mut rng = rand_core::OsRng;
        let private_key = engine.generate_private_key(&mut rng);
        let other_public = {
            let other = engine.generate_private_key(&mut rng);
            engine.public_from_private(&other).unwrap()
        };

        let signature = engine.sign(b"foobar", &private_key).unwrap();
        assert!(!engine.verify(b"foobar", &signature, &other_public));
    }
}
