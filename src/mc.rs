//! The string-facing facade over the whole library.
//!
//! Every value crossing this boundary — keys, signatures, certificates — is a
//! printable hex string, ready for whatever storage or transport the caller
//! chooses. Internally the facade deserializes, runs the typed engine and
//! protocol, and serializes the results back.

use rand_core::OsRng;

use crate::certificate::{Certificate, TimePeriod};
use crate::crypto::CryptoEngine;
use crate::error::Result;
use crate::serialization;
use crate::suite::Suite;
use crate::timestamp;

/// A minicert instance bound to one cipher suite.
pub struct MiniCert {
    engine: CryptoEngine,
}

impl MiniCert {
    /// Creates an instance for a suite selector (`"p192"` or `"p256"`).
    /// Unknown selectors fail with [`MiniCertError::UnknownSuite`].
    ///
    /// [`MiniCertError::UnknownSuite`]: crate::error::MiniCertError::UnknownSuite
    pub fn new(suite_name: &str) -> Result<Self> {
        Ok(Self {
            engine: CryptoEngine::new(Suite::from_name(suite_name)?),
        })
    }

    /// The suite this instance was constructed with.
    pub fn suite(&self) -> Suite {
        self.engine.suite()
    }

    /// Generates a fresh private key from the operating system's entropy
    /// source.
    pub fn new_private_key(&self) -> String {
        let key = self.engine.generate_private_key(&mut OsRng);
        serialization::serialize_private_key(&key)
    }

    /// Derives the public key belonging to a private key.
    pub fn compute_public_key_from_private_key(&self, private_key: &str) -> Result<String> {
        let key = serialization::deserialize_private_key(private_key);
        let public_key = self.engine.public_from_private(&key)?;
        Ok(serialization::serialize_public_key(&public_key))
    }

    /// Issues a certificate for `subject_name` over the given validity window
    /// and returns it serialized.
    pub fn sign_certificate(
        &self,
        subject_name: &str,
        subject_public_key: &str,
        validity_start: i64,
        validity_end: i64,
        issuer_private_key: &str,
    ) -> Result<String> {
        let subject_key = serialization::deserialize_public_key(subject_public_key);
        let issuer_key = serialization::deserialize_private_key(issuer_private_key);
        let validity = TimePeriod {
            start: validity_start,
            end: validity_end,
        };

        let certificate = Certificate::issue(
            &self.engine,
            subject_name,
            &subject_key,
            validity,
            &issuer_key,
        )?;
        serialization::serialize_certificate(&certificate)
    }

    /// Signs an arbitrary application message, independent of certificates.
    pub fn sign(&self, message: &str, private_key: &str) -> Result<String> {
        let key = serialization::deserialize_private_key(private_key);
        let signature = self.engine.sign(message.as_bytes(), &key)?;
        serialization::serialize_signature(&signature)
    }

    /// Recovers the public key that produced a signature over a message.
    pub fn recover_signer_public_key(&self, message: &str, signature: &str) -> Result<String> {
        let signature = serialization::deserialize_signature(signature)?;
        let public_key = self.engine.recover_public_key(message.as_bytes(), &signature)?;
        Ok(serialization::serialize_public_key(&public_key))
    }

    /// Verifies a signature against a known public key.
    ///
    /// Structural problems (malformed hex) are errors; the trust decision
    /// itself is the returned boolean.
    pub fn verify_signature_with_public_key(
        &self,
        message: &str,
        signature: &str,
        public_key: &str,
    ) -> Result<bool> {
        let signature = serialization::deserialize_signature(signature)?;
        let public_key = serialization::deserialize_public_key(public_key);
        Ok(self.engine.verify(message.as_bytes(), &signature, &public_key))
    }

    /// Verifies that `message` was signed by the key certified under
    /// `subject_name` by one of the trusted CAs, at the current time.
    pub fn verify_signature_with_certificate(
        &self,
        subject_name: &str,
        message: &str,
        signature: &str,
        certificate: &str,
        trusted_ca_public_keys: &[String],
    ) -> Result<bool> {
        let signature = serialization::deserialize_signature(signature)?;
        let certificate = serialization::deserialize_certificate(certificate)?;
        let trusted: Vec<_> = trusted_ca_public_keys
            .iter()
            .map(|key| serialization::deserialize_public_key(key))
            .collect();

        Ok(certificate.verify_signature(
            &self.engine,
            subject_name,
            message.as_bytes(),
            &signature,
            &trusted,
            timestamp::now(),
        ))
    }

    /// Verifies against the certificate's own subject and returns that name,
    /// or `None` when verification fails.
    pub fn get_authentic_signer(
        &self,
        message: &str,
        signature: &str,
        certificate: &str,
        trusted_ca_public_keys: &[String],
    ) -> Result<Option<String>> {
        let signature = serialization::deserialize_signature(signature)?;
        let certificate = serialization::deserialize_certificate(certificate)?;
        let trusted: Vec<_> = trusted_ca_public_keys
            .iter()
            .map(|key| serialization::deserialize_public_key(key))
            .collect();

        Ok(certificate.authentic_signer(
            &self.engine,
            message.as_bytes(),
            &signature,
            &trusted,
            timestamp::now(),
        ))
    }

    /// The subject name a certificate claims, without any verification.
    pub fn subject_of_certificate(&self, certificate: &str) -> Result<String> {
        Ok(serialization::deserialize_certificate(certificate)?.subject)
    }

    /// The current unix time in seconds.
    pub fn now(&self) -> i64 {
        timestamp::now()
    }

    /// Calendar arithmetic on a unix timestamp; see [`timestamp::plus`].
    #[allow(clippy::too_many_arguments)]
    pub fn plus(
        &self,
        timestamp: i64,
        years: i32,
        months: i32,
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    ) -> Result<i64> {
        timestamp::plus(timestamp, years, months, days, hours, minutes, seconds)
    }
}
