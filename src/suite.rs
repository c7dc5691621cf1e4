use crate::error::{MiniCertError, Result};

/// A cipher suite: one elliptic curve paired with one hash function.
///
/// Exactly two suites are supported, both hashing with SHA-256. The suite is
/// chosen once at construction and is immutable afterwards; every derived
/// value (digest truncation, public key length, signature size) follows from
/// the curve bit length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    /// The NIST P-192 curve with SHA-256 as hash function.
    P192Sha256,
    /// The NIST P-256 curve with SHA-256 as hash function.
    P256Sha256,
}

impl Suite {
    /// All supported suites, used for testing and size reporting.
    pub const ALL: [Suite; 2] = [Suite::P192Sha256, Suite::P256Sha256];

    /// Resolves a suite selector such as `"p192"` or `"p256"`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "p192" => Ok(Suite::P192Sha256),
            "p256" => Ok(Suite::P256Sha256),
            other => Err(MiniCertError::UnknownSuite(other.to_string())),
        }
    }

    /// The selector this suite is constructed from.
    pub fn name(&self) -> &'static str {
        match self {
            Suite::P192Sha256 => "p192",
            Suite::P256Sha256 => "p256",
        }
    }

    /// Bit length of the curve.
    pub fn curve_bits(&self) -> usize {
        match self {
            Suite::P192Sha256 => 192,
            Suite::P256Sha256 => 256,
        }
    }

    /// Byte length of a curve field element, and of a truncated digest.
    pub fn field_bytes(&self) -> usize {
        self.curve_bits() / 8
    }

    /// Length in hex characters of a public key hash and of a message digest.
    /// Same bit length as the curve, half the SHA-256 output.
    pub fn hash_hex_len(&self) -> usize {
        self.curve_bits() / 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_suites() {
        assert_eq!(Suite::from_name("p192").unwrap(), Suite::P192Sha256);
        assert_eq!(Suite::from_name("p256").unwrap(), Suite::P256Sha256);
    }

    #[test]
    fn rejects_unknown_suite() {
        assert!(matches!(
            Suite::from_name("does not exists"),
            Err(MiniCertError::UnknownSuite(_))
        ));
    }

    #[test]
    fn geometry_follows_curve_bits() {
        assert_eq!(Suite::P192Sha256.field_bytes(), 24);
        assert_eq!(Suite::P192Sha256.hash_hex_len(), 48);
        assert_eq!(Suite::P256Sha256.field_bytes(), 32);
        assert_eq!(Suite::P256Sha256.hash_hex_len(), 64);
    }
}
