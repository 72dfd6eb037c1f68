//! BIP39 mnemonic → secp256k1 key, via BIP32 derivation along the Cosmos
//! fundraiser path `m/44'/118'/0'/0/0`.

use bip32::{DerivationPath, XPrv};
use bip39::Mnemonic;
use feeder_types::KeyPair;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::keys::keypair_from_secret;

/// Fundraiser HD path: coin type 118, account 0, address index 0.
pub const HD_PATH: &str = "m/44'/118'/0'/0/0";

#[derive(Debug, Error)]
pub enum MnemonicError {
    #[error("invalid mnemonic phrase: {0}")]
    InvalidMnemonic(String),

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),
}

/// Derive the feeder's key pair from a BIP39 mnemonic (empty passphrase).
pub fn keypair_from_mnemonic(mnemonic: &str) -> Result<KeyPair, MnemonicError> {
    let mnemonic = Mnemonic::parse_normalized(mnemonic)
        .map_err(|e| MnemonicError::InvalidMnemonic(e.to_string()))?;
    let seed = Zeroizing::new(mnemonic.to_seed_normalized(""));

    let path: DerivationPath = HD_PATH
        .parse()
        .map_err(|e: bip32::Error| MnemonicError::DerivationFailed(e.to_string()))?;
    let child = XPrv::derive_from_path(seed.as_slice(), &path)
        .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))?;

    let mut secret = Zeroizing::new([0u8; 32]);
    secret.copy_from_slice(&child.private_key().to_bytes());
    keypair_from_secret(&secret).map_err(|e| MnemonicError::DerivationFailed(e.to_string()))
}

pub fn validate_mnemonic(mnemonic: &str) -> bool {
    Mnemonic::parse_normalized(mnemonic).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const ART: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    #[test]
    fn known_mnemonics_are_valid() {
        assert!(validate_mnemonic(ABOUT));
        assert!(validate_mnemonic(ART));
    }

    #[test]
    fn derives_the_standard_cosmos_key() {
        let kp = keypair_from_mnemonic(ABOUT).unwrap();
        assert_eq!(
            hex::encode(kp.private.0),
            "c4a48e2fce1481cd3294b4490f6678090ea98d3d0e5cd984558ab0968741b104"
        );
        assert_eq!(
            hex::encode(kp.public.as_bytes()),
            "024f4e2ad99c34d60b9ba6283c9431a8418af8673212961f97a77b6377fcd05b62"
        );
    }

    #[test]
    fn twenty_four_word_phrase() {
        let kp = keypair_from_mnemonic(ART).unwrap();
        assert_eq!(
            hex::encode(kp.public.as_bytes()),
            "02ba66a84cf7839af172a13e7fc9f5e7008cb8bca1585f8f3bafb3039eda3c1fdd"
        );
    }

    #[test]
    fn invalid_mnemonic_rejected() {
        assert!(!validate_mnemonic("not a valid mnemonic phrase"));
        assert!(matches!(
            keypair_from_mnemonic("invalid words here"),
            Err(MnemonicError::InvalidMnemonic(_))
        ));
    }
}
