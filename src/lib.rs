//! # minicert - Compact Certificates with Recoverable Signatures
//!
//! minicert is a minimal public-key certificate scheme built entirely with
//! rustcrypto libraries, designed for identity-light authentication over
//! constrained links and on embedded devices, where every byte of a
//! credential counts.
//!
//! Two decisions make the credentials small:
//!
//! - **Public keys are hashes, not points.** A public key is the SHA-256 hash
//!   of the canonical `"x:y"` string of the curve point, truncated to the
//!   curve bit length - half the size of storing the point itself.
//! - **Certificates carry no subject key.** The subject's public key is
//!   recovered at verification time from the end-entity's own authentication
//!   signature (ECDSA public-key recovery), then used to rebuild and check the
//!   certificate signature. A serialized certificate holds only a version, a
//!   subject name, a validity window and the CA signature.
//!
//! The price is that verification is a recovery-and-compare operation rather
//! than standard point-based ECDSA verify.
//!
//! ## Supported Suites
//!
//! - `"p192"`: NIST P-192 with SHA-256
//! - `"p256"`: NIST P-256 with SHA-256
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use minicert::mc::MiniCert;
//!
//! # fn main() -> Result<(), minicert::error::MiniCertError> {
//! let mc = MiniCert::new("p256")?;
//!
//! // Key generation for the CA and a user.
//! let ca_private = mc.new_private_key();
//! let ca_public = mc.compute_public_key_from_private_key(&ca_private)?;
//! let user_private = mc.new_private_key();
//! let user_public = mc.compute_public_key_from_private_key(&user_private)?;
//!
//! // The CA issues a certificate valid for two months.
//! let start = mc.now();
//! let end = mc.plus(start, 0, 2, 0, 0, 0, 0)?;
//! let certificate = mc.sign_certificate("user", &user_public, start, end, &ca_private)?;
//!
//! // The user authenticates by signing a nonce.
//! let nonce = "this is a nonce as a string";
//! let signature = mc.sign(nonce, &user_private)?;
//!
//! // Anyone holding the CA key as a trust anchor can check it.
//! let is_authentic = mc.verify_signature_with_certificate(
//!     "user",
//!     nonce,
//!     &signature,
//!     &certificate,
//!     &[ca_public],
//! )?;
//! assert!(is_authentic);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`mc`]: the string-facing API; everything crossing it is printable hex
//! - [`crypto`]: the signing engine - keygen, signing, public-key recovery
//! - [`certificate`]: issuance and the trust-decision algorithm
//! - [`serialization`]: compact wire formats for keys, signatures, certificates
//! - [`suite`]: the two fixed curve/hash suites
//! - [`timestamp`]: UTC calendar helpers for validity windows
//! - [`error`]: error types and handling
//!
//! Certificate revocation, CA chaining and replay protection of the
//! authenticated message are deliberately out of scope.

pub mod certificate;
pub mod crypto;
mod ec;
pub mod error;
pub mod mc;
pub mod serialization;
pub mod suite;
pub mod timestamp;
