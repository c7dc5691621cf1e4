#![allow(dead_code)]

use minicert::error::MiniCertError;
use minicert::mc::MiniCert;

pub const NONCE: &str = "this is a nonce as a string";

pub struct SignedUser {
    pub private_key: String,
    pub public_key: String,
    pub signature: String,
}

pub struct CertifiedUser {
    pub user: SignedUser,
    pub certificate: String,
    pub trusted_keys: Vec<String>,
}

/// Generates a user key pair and an authentication signature over `message`.
///
/// The compact signature format rejects the rare signature whose `r` and `s`
/// trim to different byte lengths, so fresh keys are drawn until it accepts.
pub fn user_with_signature(mc: &MiniCert, message: &str) -> SignedUser {
    loop {
        let private_key = mc.new_private_key();
        let public_key = mc
            .compute_public_key_from_private_key(&private_key)
            .expect("freshly generated key is valid");
        if let Ok(signature) = mc.sign(message, &private_key) {
            return SignedUser {
                private_key,
                public_key,
                signature,
            };
        }
    }
}

/// Full setup: a CA, a certified user, a signature over [`NONCE`] and a trust
/// anchor set containing the issuing CA plus an unrelated one.
pub fn certified_user(mc: &MiniCert) -> Result<CertifiedUser, MiniCertError> {
    let ca_private = mc.new_private_key();
    let ca_public = mc.compute_public_key_from_private_key(&ca_private)?;
    let other_ca_public = mc.compute_public_key_from_private_key(&mc.new_private_key())?;

    let user = user_with_signature(mc, NONCE);

    let start = mc.now();
    let end = mc.plus(start, 0, 2, 0, 0, 0, 0)?;
    let certificate = mc.sign_certificate("user", &user.public_key, start, end, &ca_private)?;

    Ok(CertifiedUser {
        user,
        certificate,
        trusted_keys: vec![other_ca_public, ca_public],
    })
}
