//! secp256k1 ECDSA signing and verification.
//!
//! The message is hashed with SHA-256 and signed with an RFC 6979 nonce; the
//! signature is the 64-byte `r || s` form with low `s`, which is what the
//! chain's ante handler verifies.

use feeder_types::{PrivateKey, PublicKey};
use k256::ecdsa::signature::{Signer as _, Verifier as _};
use k256::ecdsa::Signature;

use crate::keys::{signing_key, verifying_key, KeyError};

pub const SIGNATURE_LEN: usize = 64;

pub fn sign_message(
    message: &[u8],
    private_key: &PrivateKey,
) -> Result<[u8; SIGNATURE_LEN], KeyError> {
    let signature: Signature = signing_key(private_key)?.sign(message);
    let mut out = [0u8; SIGNATURE_LEN];
    out.copy_from_slice(&signature.to_bytes());
    Ok(out)
}

/// Returns `false` for malformed keys as well as bad signatures.
pub fn verify_signature(message: &[u8], signature: &[u8], public_key: &PublicKey) -> bool {
    let Ok(key) = verifying_key(public_key) else {
        return false;
    };
    let Ok(sig) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify(message, &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_secret;

    #[test]
    fn sign_and_verify() {
        let kp = keypair_from_secret(&[3u8; 32]).unwrap();
        let sig = sign_message(b"sign doc", &kp.private).unwrap();
        assert_eq!(sig.len(), SIGNATURE_LEN);
        assert!(verify_signature(b"sign doc", &sig, &kp.public));
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = keypair_from_secret(&[3u8; 32]).unwrap();
        assert_eq!(
            sign_message(b"sign doc", &kp.private).unwrap(),
            sign_message(b"sign doc", &kp.private).unwrap()
        );
    }

    #[test]
    fn signature_has_low_s() {
        let kp = keypair_from_secret(&[3u8; 32]).unwrap();
        for msg in [&b"a"[..], b"b", b"c", b"d", b"e", b"f", b"g", b"h"] {
            let sig = sign_message(msg, &kp.private).unwrap();
            // s <= n/2 means the top bit of s is clear and s < 0x7fff...a0.
            assert!(sig[32] < 0x80, "high s for {msg:?}");
        }
    }

    #[test]
    fn wrong_message_or_key_fails() {
        let kp1 = keypair_from_secret(&[3u8; 32]).unwrap();
        let kp2 = keypair_from_secret(&[4u8; 32]).unwrap();
        let sig = sign_message(b"sign doc", &kp1.private).unwrap();
        assert!(!verify_signature(b"other doc", &sig, &kp1.public));
        assert!(!verify_signature(b"sign doc", &sig, &kp2.public));
    }

    #[test]
    fn truncated_signature_fails() {
        let kp = keypair_from_secret(&[3u8; 32]).unwrap();
        let sig = sign_message(b"sign doc", &kp.private).unwrap();
        assert!(!verify_signature(b"sign doc", &sig[..32], &kp.public));
    }
}
