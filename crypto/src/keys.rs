//! secp256k1 key handling.

use feeder_types::{KeyPair, PrivateKey, PublicKey};
use k256::ecdsa::{SigningKey, VerifyingKey};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Zero, or not below the curve order.
    #[error("secret is not a valid secp256k1 scalar")]
    InvalidSecret,

    #[error("public key is not a valid SEC1 point")]
    InvalidPublicKey,
}

pub(crate) fn signing_key(private: &PrivateKey) -> Result<SigningKey, KeyError> {
    SigningKey::from_slice(&private.0).map_err(|_| KeyError::InvalidSecret)
}

pub(crate) fn verifying_key(public: &PublicKey) -> Result<VerifyingKey, KeyError> {
    VerifyingKey::from_sec1_bytes(public.as_bytes()).map_err(|_| KeyError::InvalidPublicKey)
}

fn compressed(key: &VerifyingKey) -> PublicKey {
    let point = key.to_encoded_point(true);
    let mut raw = [0u8; feeder_types::PUBLIC_KEY_LEN];
    raw.copy_from_slice(point.as_bytes());
    PublicKey(raw)
}

/// Compressed public key for a private key.
pub fn public_from_private(private: &PrivateKey) -> Result<PublicKey, KeyError> {
    Ok(compressed(signing_key(private)?.verifying_key()))
}

/// Key pair for a raw 32-byte secret.
pub fn keypair_from_secret(secret: &[u8; 32]) -> Result<KeyPair, KeyError> {
    let private = PrivateKey(*secret);
    let public = public_from_private(&private)?;
    Ok(KeyPair { public, private })
}
