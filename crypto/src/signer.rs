//! The signer capability and its HD-wallet implementation.

use feeder_types::{AccAddress, KeyPair, PubKey};
use thiserror::Error;

use crate::address::derive_acc_address;
use crate::keys::{keypair_from_secret, KeyError};
use crate::mnemonic::{keypair_from_mnemonic, MnemonicError};
use crate::sign::sign_message;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Signs transactions on behalf of the feeder account.
pub trait Signer: Send + Sync {
    /// Account that pays for and signs oracle transactions.
    fn address(&self) -> &AccAddress;

    fn public_key(&self) -> PubKey;

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// secp256k1 signer for the account at `m/44'/118'/0'/0/0` of a mnemonic.
pub struct HdSigner {
    keys: KeyPair,
    address: AccAddress,
}

impl HdSigner {
    pub fn from_mnemonic(phrase: &str, hrp: &str) -> Result<Self, SignerError> {
        Ok(Self::from_keypair(keypair_from_mnemonic(phrase)?, hrp))
    }

    /// Signer for a raw secret scalar, skipping derivation.
    pub fn from_secret(secret: &[u8; 32], hrp: &str) -> Result<Self, SignerError> {
        Ok(Self::from_keypair(keypair_from_secret(secret)?, hrp))
    }

    fn from_keypair(keys: KeyPair, hrp: &str) -> Self {
        let address = derive_acc_address(&keys.public, hrp);
        Self { keys, address }
    }
}

impl Signer for HdSigner {
    fn address(&self) -> &AccAddress {
        &self.address
    }

    fn public_key(&self) -> PubKey {
        PubKey::secp256k1(self.keys.public.as_bytes())
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        Ok(sign_message(message, &self.keys.private)?.to_vec())
    }
}
