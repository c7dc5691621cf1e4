//! Conversion of keys, signatures and certificates to and from compact hex
//! wire strings.
//!
//! Certificates are packed into a CBOR map with one-character field tags and
//! the signature scalars stored as trimmed big-endian byte strings, then the
//! whole map is hex-encoded for a printable wire value. Signatures use an even
//! more compact fixed-structure concatenation. Keys are already minimal hex
//! and serialize to themselves.

use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use crate::certificate::{Certificate, TimePeriod};
use crate::crypto::{PrivateKey, PublicKey, Signature};
use crate::ec::{bytes_from_hex, trimmed_hex};
use crate::error::{MiniCertError, Result};

/// Wire form of a certificate. Single-character tags keep the map small.
#[derive(Serialize, Deserialize)]
struct WireCertificate {
    v: u32,
    s: String,
    t: i64,
    e: i64,
    r: ByteBuf,
    u: ByteBuf,
    j: u8,
}

/// Minimal hex scalar to trimmed big-endian bytes (no leading zero bytes).
fn scalar_bytes(hex_str: &str) -> Result<Vec<u8>> {
    let raw = bytes_from_hex(hex_str)?;
    let first = raw
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(raw.len().saturating_sub(1));
    Ok(raw[first..].to_vec())
}

/// Serializes a certificate to its hex wire string.
pub fn serialize_certificate(certificate: &Certificate) -> Result<String> {
    let doc = WireCertificate {
        v: certificate.version,
        s: certificate.subject.clone(),
        t: certificate.validity.start,
        e: certificate.validity.end,
        r: ByteBuf::from(scalar_bytes(&certificate.signature.r)?),
        u: ByteBuf::from(scalar_bytes(&certificate.signature.s)?),
        j: certificate.signature.j,
    };

    let packed = serde_cbor::to_vec(&doc)
        .map_err(|e| MiniCertError::EncodingError(format!("certificate packing failed: {e}")))?;
    Ok(hex::encode(packed))
}

/// Unpacks a serialized certificate, reconstructing the original record.
pub fn deserialize_certificate(serialized: &str) -> Result<Certificate> {
    let packed = hex::decode(serialized)
        .map_err(|e| MiniCertError::DecodingError(format!("invalid hex string: {e}")))?;
    let doc: WireCertificate = serde_cbor::from_slice(&packed)
        .map_err(|e| MiniCertError::DecodingError(format!("certificate unpacking failed: {e}")))?;

    Ok(Certificate {
        version: doc.v,
        subject: doc.s,
        validity: TimePeriod {
            start: doc.t,
            end: doc.e,
        },
        signature: Signature {
            r: trimmed_hex(&doc.r),
            s: trimmed_hex(&doc.u),
            j: doc.j,
        },
    })
}

/// Serializes a signature to its size-optimized wire string `s ‖ r ‖ "0" + j`.
///
/// `r` and `s` are zero-padded to equal even length. Known limitation,
/// reproduced deliberately: a scalar whose minimal hex starts with more than
/// one zero nibble cannot be told apart from its padded form on decode.
pub fn serialize_signature(signature: &Signature) -> Result<String> {
    let mut s = signature.s.clone();
    let mut r = signature.r.clone();

    // Pad hex strings to even length.
    if s.len() % 2 == 1 {
        s.insert(0, '0');
    }
    if r.len() % 2 == 1 {
        r.insert(0, '0');
    }

    if s.len() != r.len() {
        return Err(MiniCertError::EncodingError(
            "signature s has not the same length as r".to_string(),
        ));
    }
    if signature.j > 4 {
        return Err(MiniCertError::EncodingError(
            "invalid signature j".to_string(),
        ));
    }

    Ok(format!("{}{}0{}", s, r, signature.j))
}

/// Unpacks a serialized signature: splits the fixed structure at the midpoint
/// of the non-`j` portion and strips at most one leading zero pad from each
/// scalar.
pub fn deserialize_signature(serialized: &str) -> Result<Signature> {
    if serialized.len() % 2 != 0 {
        return Err(MiniCertError::DecodingError(
            "invalid hex string".to_string(),
        ));
    }
    if serialized.len() < 2 || !serialized.is_ascii() {
        return Err(MiniCertError::DecodingError(
            "signature too short".to_string(),
        ));
    }

    let n = serialized.len();
    let mut s = &serialized[..(n - 2) / 2];
    let mut r = &serialized[(n - 2) / 2..n - 2];
    let j_hex = &serialized[n - 2..];

    // Remove the zero pad, if any.
    if let Some(stripped) = s.strip_prefix('0') {
        s = stripped;
    }
    if let Some(stripped) = r.strip_prefix('0') {
        r = stripped;
    }

    let j = u8::from_str_radix(j_hex, 16)
        .map_err(|e| MiniCertError::DecodingError(format!("invalid signature j: {e}")))?;
    if j > 4 {
        return Err(MiniCertError::DecodingError(
            "invalid signature j".to_string(),
        ));
    }

    Ok(Signature {
        r: r.to_string(),
        s: s.to_string(),
        j,
    })
}

/// Serializes a private key: the hex scalar is already minimal.
pub fn serialize_private_key(key: &PrivateKey) -> String {
    key.x.clone()
}

/// Unpacks a serialized private key.
pub fn deserialize_private_key(serialized: &str) -> PrivateKey {
    PrivateKey {
        x: serialized.to_string(),
    }
}

/// Serializes a public key: the hash string is already minimal.
pub fn serialize_public_key(key: &PublicKey) -> String {
    key.hash.clone()
}

/// Unpacks a serialized public key.
pub fn deserialize_public_key(serialized: &str) -> PublicKey {
    PublicKey {
        hash: serialized.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_signature() -> Signature {
        Signature {
            r: "1a2b3c".to_string(),
            s: "4d5e6f".to_string(),
            j: 1,
        }
    }

    #[test]
    fn signature_round_trip() {
        let signature = sample_signature();
        let wire = serialize_signature(&signature).unwrap();
        assert_eq!(wire, "4d5e6f1a2b3c01");
        assert_eq!(deserialize_signature(&wire).unwrap(), signature);
    }

    #[test]
    fn signature_odd_lengths_are_padded_and_stripped() {
        let signature = Signature {
            r: "a2b3c".to_string(),
            s: "d5e6f".to_string(),
            j: 3,
        };
        let wire = serialize_signature(&signature).unwrap();
        assert_eq!(wire, "0d5e6f0a2b3c03");
        assert_eq!(deserialize_signature(&wire).unwrap(), signature);
    }

    #[test]
    fn signature_length_mismatch_is_an_error() {
        let signature = Signature {
            r: "aabb".to_string(),
            s: "aa".to_string(),
            j: 0,
        };
        assert!(matches!(
            serialize_signature(&signature),
            Err(MiniCertError::EncodingError(_))
        ));
    }

    #[test]
    fn signature_j_out_of_range_is_an_error() {
        let signature = Signature {
            r: "aa".to_string(),
            s: "bb".to_string(),
            j: 5,
        };
        assert!(serialize_signature(&signature).is_err());
    }

    #[test]
    fn signature_odd_wire_length_is_an_error() {
        assert!(deserialize_signature("abc").is_err());
    }

    #[test]
    fn certificate_round_trip() {
        let certificate = Certificate {
            version: 0,
            subject: "user".to_string(),
            validity: TimePeriod {
                start: 1_550_741_071,
                end: 1_550_999_999,
            },
            signature: sample_signature(),
        };
        let wire = serialize_certificate(&certificate).unwrap();
        assert_eq!(deserialize_certificate(&wire).unwrap(), certificate);
    }

    #[test]
    fn certificate_bad_hex_is_an_error() {
        assert!(deserialize_certificate("abc").is_err());
        assert!(deserialize_certificate("zz").is_err());
    }

    #[test]
    fn key_codecs_are_identities() {
        let private_key = PrivateKey {
            x: "deadbeef".to_string(),
        };
        let round_tripped = deserialize_private_key(&serialize_private_key(&private_key));
        assert_eq!(round_tripped.x, private_key.x);

        let public_key = PublicKey {
            hash: "cafe".to_string(),
        };
        assert_eq!(
            deserialize_public_key(&serialize_public_key(&public_key)),
            public_key
        );
    }
}
