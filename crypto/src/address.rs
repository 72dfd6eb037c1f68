//! Account addresses derived from secp256k1 keys.
//!
//! Account address: `bech32(hrp, RIPEMD-160(SHA-256(compressed pubkey)))`,
//! e.g. `terra1...`. Operator addresses use the same bytes under
//! `{hrp}valoper`.

use feeder_types::{AccAddress, PublicKey, ValAddress};

pub use feeder_types::bech32::{bech32_decode, bech32_encode, AddressError};

use crate::hash::hash160;

/// Derive the account address for a public key.
pub fn derive_acc_address(public: &PublicKey, hrp: &str) -> AccAddress {
    AccAddress::new(bech32_encode(hrp, &hash160(public.as_bytes())))
}

fn expect_prefix(s: &str, expected: &str) -> Result<(), AddressError> {
    let (found, _) = bech32_decode(s)?;
    if found != expected {
        return Err(AddressError::WrongPrefix {
            expected: expected.to_string(),
            found,
        });
    }
    Ok(())
}

/// Validate an account address string against the chain prefix.
pub fn parse_acc_address(s: &str, hrp: &str) -> Result<AccAddress, AddressError> {
    expect_prefix(s, hrp)?;
    Ok(AccAddress::new(s))
}

/// Validate an operator address string (`{hrp}valoper...`).
pub fn parse_val_address(s: &str, hrp: &str) -> Result<ValAddress, AddressError> {
    expect_prefix(s, &format!("{hrp}{}", ValAddress::OPERATOR_SUFFIX))?;
    Ok(ValAddress::new(s))
}
