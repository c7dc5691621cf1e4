//! Error types for all fallible operations in the crate.

use thiserror::Error;

/// Represents errors that can occur in the minicert library.
///
/// Trust decisions (expired certificate, tampered message, untrusted issuer,
/// wrong subject) are deliberately *not* errors: verification functions return
/// a uniform `false` so callers cannot distinguish failure reasons. Errors are
/// reserved for structural problems such as malformed hex or unknown suites.
#[derive(Debug, Error, Clone)]
pub enum MiniCertError {
    /// The suite selector given at construction is not one of the two
    /// supported suites.
    #[error("Unknown cipher suite: {0}")]
    UnknownSuite(String),

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// A scalar is zero, out of range for the curve order, or otherwise not a
    /// usable key.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Error while producing or recovering a signature.
    #[error("Signature error: {0}")]
    SignatureError(String),

    /// Error in calendar arithmetic on a validity timestamp.
    #[error("Invalid timestamp: {0}")]
    TimestampError(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MiniCertError>;
