//! Certificate issuance and verification.
//!
//! A certificate binds a subject name and validity window to a public key
//! *without storing the key*: the signed data includes the subject's key
//! hash, but the certificate record carries only `{version, subject,
//! validity, signature}`. At verification time the subject's key is recovered
//! from the end-entity's own authentication signature and fed into the
//! certificate-signature recovery step. This is the scheme's central
//! space-saving decision.

use crate::crypto::{CryptoEngine, PrivateKey, PublicKey, Signature};
use crate::error::Result;

/// Certificate format version, reserved for future use.
pub const VERSION: u32 = 0;

/// The inclusive `[start, end]` unix-time interval in which a certificate is
/// valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePeriod {
    pub start: i64,
    pub end: i64,
}

/// A minimal certificate.
///
/// Deliberately has no subject-public-key field; see the module docs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The version number, can be used in the future.
    pub version: u32,
    /// The name of the user which holds the public key belonging to this
    /// certificate.
    pub subject: String,
    /// The time period in which the certificate is valid.
    pub validity: TimePeriod,
    /// The CA's signature over the canonical certificate data.
    pub signature: Signature,
}

impl Certificate {
    /// Issues a certificate: signs the canonical encoding of
    /// `(version, subject, subject key hash, validity)` with the issuer key.
    pub fn issue(
        engine: &CryptoEngine,
        subject: &str,
        subject_public_key: &PublicKey,
        validity: TimePeriod,
        issuer_private_key: &PrivateKey,
    ) -> Result<Certificate> {
        let signed_data =
            canonical_certificate_data(VERSION, subject, &subject_public_key.hash, &validity);
        let signature = engine.sign(&signed_data, issuer_private_key)?;

        Ok(Certificate {
            version: VERSION,
            subject: subject.to_string(),
            validity,
            signature,
        })
    }

    /// The trust decision. Authenticates "`message` was signed by whoever held
    /// the key certified under `subject_name` by a trusted CA, within the
    /// stated validity window".
    ///
    /// 1. Fail closed when `now` lies outside the validity window.
    /// 2. Recover the claimed signer's key purely from the authentication
    ///    signature.
    /// 3. Rebuild the canonical certificate data with that key's hash.
    /// 4. Recover the issuer key from the certificate signature.
    /// 5. Accept iff the issuer key is in the trust anchor set.
    ///
    /// Every failure mode — expiry, wrong subject, altered message, tampered
    /// signature, untrusted issuer — yields the same plain `false`.
    pub fn verify_signature(
        &self,
        engine: &CryptoEngine,
        subject_name: &str,
        message: &[u8],
        signature: &Signature,
        trusted_ca_public_keys: &[PublicKey],
        now: i64,
    ) -> bool {
        if now < self.validity.start || now > self.validity.end {
            return false;
        }

        let Ok(recovered_subject_key) = engine.recover_public_key(message, signature) else {
            return false;
        };

        let signed_data = canonical_certificate_data(
            self.version,
            subject_name,
            &recovered_subject_key.hash,
            &self.validity,
        );

        let Ok(recovered_issuer_key) = engine.recover_public_key(&signed_data, &self.signature)
        else {
            return false;
        };

        // Scan the whole trust set without early exit.
        trusted_ca_public_keys
            .iter()
            .fold(false, |found, anchor| {
                found | recovered_issuer_key.constant_time_eq(anchor)
            })
    }

    /// Verifies against the certificate's own subject name and returns that
    /// name on success.
    pub fn authentic_signer(
        &self,
        engine: &CryptoEngine,
        message: &[u8],
        signature: &Signature,
        trusted_ca_public_keys: &[PublicKey],
        now: i64,
    ) -> Option<String> {
        if self.verify_signature(
            engine,
            &self.subject,
            message,
            signature,
            trusted_ca_public_keys,
            now,
        ) {
            Some(self.subject.clone())
        } else {
            None
        }
    }
}

/// Unambiguous encoding of the signed certificate fields.
///
/// Variable-length fields are length-prefixed so that no subject string can
/// shift field boundaries: `version · u32-be ‖ len(subject) · u32-be ‖
/// subject ‖ len(hash) · u32-be ‖ hash ‖ start · i64-be ‖ end · i64-be`.
fn canonical_certificate_data(
    version: u32,
    subject: &str,
    subject_key_hash: &str,
    validity: &TimePeriod,
) -> Vec<u8> {
    let mut data = Vec::with_capacity(28 + subject.len() + subject_key_hash.len());
    data.extend_from_slice(&version.to_be_bytes());
    data.extend_from_slice(&(subject.len() as u32).to_be_bytes());
    data.extend_from_slice(subject.as_bytes());
    data.extend_from_slice(&(subject_key_hash.len() as u32).to_be_bytes());
    data.extend_from_slice(subject_key_hash.as_bytes());
    data.extend_from_slice(&validity.start.to_be_bytes());
    data.extend_from_slice(&validity.end.to_be_bytes());
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_data_is_deterministic() {
        let validity = TimePeriod {
            start: 1_550_741_071,
            end: 1_550_999_999,
        };
        let a = canonical_certificate_data(0, "user", "aabb", &validity);
        let b = canonical_certificate_data(0, "user", "aabb", &validity);
        assert_eq!(a, b);
    }

    #[test]
    fn separator_in_subject_cannot_shift_field_boundaries() {
        // Under the old "+"-joined encoding both of these produced the same
        // canonical string.
        let validity = TimePeriod { start: 1, end: 2 };
        let a = canonical_certificate_data(0, "a+b", "c", &validity);
        let b = canonical_certificate_data(0, "a", "b+c", &validity);
        assert_ne!(a, b);
    }

    #[test]
    fn any_field_change_alters_canonical_data() {
        let validity = TimePeriod { start: 1, end: 2 };
        let base = canonical_certificate_data(0, "user", "aabb", &validity);
        assert_ne!(
            base,
            canonical_certificate_data(1, "user", "aabb", &validity)
        );
        assert_ne!(
            base,
            canonical_certificate_data(0, "userX", "aabb", &validity)
        );
        assert_ne!(
            base,
            canonical_certificate_data(0, "user", "aabc", &validity)
        );
        assert_ne!(
            base,
            canonical_certificate_data(0, "user", "aabb", &TimePeriod { start: 1, end: 3 })
        );
    }
}
