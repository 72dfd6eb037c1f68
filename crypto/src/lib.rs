//! Cryptographic primitives for the oracle feeder.
//!
//! - **SHA-256 (truncated to 20 bytes)** for vote commitments
//! - **secp256k1 ECDSA** keys derived along the BIP32 path `m/44'/118'/0'/0/0`
//! - **Bech32** addresses over RIPEMD-160(SHA-256(pubkey))
//! - The [`Signer`] capability and an HD-wallet implementation

pub mod address;
pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod salt;
pub mod sign;
pub mod signer;
pub mod vote_hash;

pub use address::{
    bech32_decode, bech32_encode, derive_acc_address, parse_acc_address, parse_val_address,
    AddressError,
};
pub use hash::{hash160, sha256, sha256_truncated};
pub use keys::{keypair_from_secret, public_from_private, KeyError};
pub use mnemonic::{keypair_from_mnemonic, validate_mnemonic, MnemonicError, HD_PATH};
pub use salt::generate_salt;
pub use sign::{sign_message, verify_signature, SIGNATURE_LEN};
pub use signer::{HdSigner, Signer, SignerError};
pub use vote_hash::{commit_hash, verify_commit};
