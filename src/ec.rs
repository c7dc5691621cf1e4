//! Generic ECDSA primitives built directly on `elliptic-curve` arithmetic.
//!
//! The protocol identifies a public key by the truncated hash of its canonical
//! `"x:y"` point string and verifies by *recovering* a candidate key from the
//! signature, so the stock sign/verify routines of the `ecdsa` crate cannot be
//! used here. This module implements the two primitives the scheme needs over
//! any prime-order curve: signing that captures the recovery parameter `j`,
//! and the standard public-key recovery `Q = r⁻¹·(s·R − e·G)`.
//!
//! Scalars cross this boundary as minimal lowercase hex strings (no leading
//! zero nibbles), which is also the representation stored in [`Signature`]
//! and [`PrivateKey`] records.
//!
//! [`Signature`]: crate::crypto::Signature
//! [`PrivateKey`]: crate::crypto::PrivateKey

use elliptic_curve::bigint::CheckedAdd;
use elliptic_curve::group::Curve as _;
use elliptic_curve::ops::Reduce;
use elliptic_curve::point::DecompressPoint;
use elliptic_curve::sec1::{ModulusSize, ToEncodedPoint};
use elliptic_curve::{
    AffinePoint, Curve, CurveArithmetic, Field, FieldBytes, FieldBytesEncoding, FieldBytesSize,
    Group, NonZeroScalar, PrimeCurve, PrimeField, ProjectivePoint, Scalar,
};
use rand_core::CryptoRngCore;
use sha2::Sha256;
use subtle::Choice;

use crate::error::{MiniCertError, Result};

/// Minimal lowercase hex of a big-endian byte string, as a bignum library
/// would print it: leading zero nibbles stripped, `"0"` for zero.
pub(crate) fn trimmed_hex(bytes: &[u8]) -> String {
    let full = hex::encode(bytes);
    let trimmed = full.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Decodes possibly odd-length minimal hex into big-endian bytes.
pub(crate) fn bytes_from_hex(hex_str: &str) -> Result<Vec<u8>> {
    let padded = if hex_str.len() % 2 == 1 {
        format!("0{hex_str}")
    } else {
        hex_str.to_string()
    };
    hex::decode(padded).map_err(|e| MiniCertError::DecodingError(format!("invalid hex string: {e}")))
}

/// Left-pads minimal hex to the curve's field size.
fn field_bytes_from_hex<C>(hex_str: &str) -> Result<FieldBytes<C>>
where
    C: Curve,
{
    let raw = bytes_from_hex(hex_str)?;
    let mut bytes = FieldBytes::<C>::default();
    let size = bytes.len();
    if raw.len() > size {
        return Err(MiniCertError::InvalidKey(format!(
            "scalar is {} bytes, curve field is {} bytes",
            raw.len(),
            size
        )));
    }
    bytes[size - raw.len()..].copy_from_slice(&raw);
    Ok(bytes)
}

/// Parses a nonzero scalar in canonical range `0 < v < n` from minimal hex.
fn scalar_from_hex<C>(hex_str: &str) -> Result<Scalar<C>>
where
    C: CurveArithmetic,
{
    let bytes = field_bytes_from_hex::<C>(hex_str)?;
    let scalar = Option::<Scalar<C>>::from(Scalar::<C>::from_repr(bytes))
        .ok_or_else(|| MiniCertError::InvalidKey("scalar not below the curve order".to_string()))?;
    if bool::from(scalar.is_zero()) {
        return Err(MiniCertError::InvalidKey("scalar is zero".to_string()));
    }
    Ok(scalar)
}

/// Interprets a truncated digest (exactly one field element wide) as an
/// integer modulo the curve order.
fn digest_scalar<C>(digest: &[u8]) -> Scalar<C>
where
    C: PrimeCurve + CurveArithmetic,
    Scalar<C>: Reduce<C::Uint>,
{
    let bytes = FieldBytes::<C>::clone_from_slice(digest);
    Scalar::<C>::reduce(C::Uint::decode_field_bytes(&bytes))
}

/// Canonical `"x-hex:y-hex"` string of an affine point, the exact input to
/// the public-key hash.
fn canonical_point_string<C>(point: &AffinePoint<C>) -> Result<String>
where
    C: PrimeCurve + CurveArithmetic,
    AffinePoint<C>: ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let encoded = point.to_encoded_point(false);
    let x = encoded
        .x()
        .ok_or_else(|| MiniCertError::SignatureError("point at infinity".to_string()))?;
    let y = encoded
        .y()
        .ok_or_else(|| MiniCertError::SignatureError("point at infinity".to_string()))?;
    Ok(format!("{}:{}", trimmed_hex(x), trimmed_hex(y)))
}

/// Draws a fresh uniformly random nonzero scalar from the supplied entropy
/// source (rejection-sampled internally) and returns it as minimal hex.
pub(crate) fn generate_scalar_hex<C>(rng: &mut impl CryptoRngCore) -> String
where
    C: CurveArithmetic,
{
    let scalar = NonZeroScalar::<C>::random(rng);
    trimmed_hex(&scalar.to_repr())
}

/// Validates a caller-supplied secret scalar and normalizes its hex form.
pub(crate) fn normalize_scalar_hex<C>(hex_str: &str) -> Result<String>
where
    C: CurveArithmetic,
{
    let scalar = scalar_from_hex::<C>(hex_str)?;
    Ok(trimmed_hex(&scalar.to_repr()))
}

/// Canonical point string of the public point `sk·G`.
pub(crate) fn public_point_string<C>(sk_hex: &str) -> Result<String>
where
    C: PrimeCurve + CurveArithmetic,
    AffinePoint<C>: ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let sk = scalar_from_hex::<C>(sk_hex)?;
    let point = (ProjectivePoint::<C>::generator() * sk).to_affine();
    canonical_point_string::<C>(&point)
}

/// ECDSA over a truncated digest with a deterministic RFC 6979 nonce.
///
/// Returns `(r, s, j)` where `j` encodes which of the candidate points a
/// verifier must reconstruct from `r`: bit 0 is the parity of `R.y`, bit 1 is
/// set when `R.x` was reduced modulo the curve order.
pub(crate) fn sign_digest<C>(digest: &[u8], sk_hex: &str) -> Result<(String, String, u8)>
where
    C: PrimeCurve + CurveArithmetic,
    AffinePoint<C>: ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
    Scalar<C>: Reduce<C::Uint>,
{
    let x = scalar_from_hex::<C>(sk_hex)?;
    let e = digest_scalar::<C>(digest);

    // `rfc6979::generate_k` fixes the scalar width to the digest output size,
    // so for curves narrower than SHA-256 (P-192) the same HMAC_DRBG loop is
    // run here at field width; `from_repr` enforces the `0 < k < n` rejection.
    let mut hmac_drbg =
        rfc6979::HmacDrbg::<Sha256>::new(&x.to_repr(), &e.to_repr(), &[]);
    let k = loop {
        let mut k_bytes = FieldBytes::<C>::default();
        hmac_drbg.fill_bytes(&mut k_bytes);
        if let Some(k) = Option::<Scalar<C>>::from(Scalar::<C>::from_repr(k_bytes))
            .filter(|k| !bool::from(k.is_zero()))
        {
            break k;
        }
    };

    let big_r = (ProjectivePoint::<C>::generator() * k).to_affine();
    let encoded = big_r.to_encoded_point(false);
    let (x_bytes, y_bytes) = match (encoded.x(), encoded.y()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(MiniCertError::SignatureError("nonce point at infinity".to_string())),
    };

    let r = Scalar::<C>::reduce(C::Uint::decode_field_bytes(x_bytes));
    if bool::from(r.is_zero()) {
        return Err(MiniCertError::SignatureError("signature r is zero".to_string()));
    }
    let x_is_reduced = r.to_repr().as_slice() != x_bytes.as_slice();
    let y_is_odd = y_bytes[y_bytes.len() - 1] & 1 == 1;

    let k_inv = Option::<Scalar<C>>::from(k.invert())
        .ok_or_else(|| MiniCertError::SignatureError("nonce is not invertible".to_string()))?;
    let s = k_inv * (e + r * x);
    if bool::from(s.is_zero()) {
        return Err(MiniCertError::SignatureError("signature s is zero".to_string()));
    }

    let j = u8::from(y_is_odd) | (u8::from(x_is_reduced) << 1);
    Ok((trimmed_hex(&r.to_repr()), trimmed_hex(&s.to_repr()), j))
}

/// Recovers the signer's public point from `(r, s, j)` and the truncated
/// digest, returning its canonical point string.
///
/// Reconstructs the candidate point `R` selected by `j`, then computes
/// `Q = r⁻¹·(s·R − e·G)`.
pub(crate) fn recover_point_string<C>(
    digest: &[u8],
    r_hex: &str,
    s_hex: &str,
    j: u8,
) -> Result<String>
where
    C: PrimeCurve + CurveArithmetic,
    AffinePoint<C>: DecompressPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
    Scalar<C>: Reduce<C::Uint>,
{
    if j > 3 {
        return Err(MiniCertError::SignatureError(format!(
            "recovery parameter {j} out of range"
        )));
    }

    let r = scalar_from_hex::<C>(r_hex)?;
    let s = scalar_from_hex::<C>(s_hex)?;
    let e = digest_scalar::<C>(digest);

    let x_bytes = if j & 0b10 != 0 {
        let reduced = C::Uint::decode_field_bytes(&r.to_repr());
        let original = Option::<C::Uint>::from(reduced.checked_add(&C::ORDER)).ok_or_else(|| {
            MiniCertError::SignatureError("r exceeds the field with reduced x".to_string())
        })?;
        original.encode_field_bytes()
    } else {
        r.to_repr()
    };
    let y_is_odd = Choice::from(j & 1);

    let big_r = Option::<AffinePoint<C>>::from(AffinePoint::<C>::decompress(&x_bytes, y_is_odd))
        .ok_or_else(|| {
            MiniCertError::SignatureError("signature does not encode a curve point".to_string())
        })?;

    let r_inv = Option::<Scalar<C>>::from(r.invert())
        .ok_or_else(|| MiniCertError::SignatureError("r is not invertible".to_string()))?;
    let u1 = -(r_inv * e);
    let u2 = r_inv * s;
    let q = (ProjectivePoint::<C>::generator() * u1 + ProjectivePoint::<C>::from(big_r) * u2)
        .to_affine();

    canonical_point_string::<C>(&q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::NistP256;

    #[test]
    fn trimmed_hex_strips_leading_zero_nibbles() {
        assert_eq!(trimmed_hex(&[0x00, 0x0a, 0xbc]), "abc");
        assert_eq!(trimmed_hex(&[0x1a, 0x2b]), "1a2b");
        assert_eq!(trimmed_hex(&[0x00, 0x00]), "0");
    }

    #[test]
    fn hex_round_trips_through_bytes() {
        let bytes = bytes_from_hex("abc").unwrap();
        assert_eq!(bytes, vec![0x0a, 0xbc]);
        assert_eq!(trimmed_hex(&bytes), "abc");
    }

    #[test]
    fn rejects_zero_and_oversized_scalars() {
        assert!(scalar_from_hex::<NistP256>("0").is_err());
        let oversized = "ff".repeat(33);
        assert!(scalar_from_hex::<NistP256>(&oversized).is_err());
    }

    #[test]
    fn recovery_rejects_out_of_range_j() {
        let digest = [0x11u8; 32];
        assert!(recover_point_string::<NistP256>(&digest, "1234", "5678", 4).is_err());
    }
}
