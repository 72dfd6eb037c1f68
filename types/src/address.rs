//! Bech32 account and validator address types.
//!
//! These are thin wrappers over the encoded string: the chain compares and
//! hashes the textual form, so that is what we carry around. The raw 20
//! bytes are only needed for the binary transaction encoding.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bech32::{bech32_decode, bech32_encode, AddressError};

/// An account address (the feeder that signs and pays for oracle transactions).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccAddress(String);

/// An operator address identifying the validator the feeder votes for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValAddress(String);

impl AccAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_bytes(hrp: &str, bytes: &[u8]) -> Self {
        Self(bech32_encode(hrp, bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decoded address bytes; the prefix is not checked.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AddressError> {
        bech32_decode(&self.0).map(|(_, bytes)| bytes)
    }
}

impl ValAddress {
    /// Human-readable part suffix the chain appends for operator addresses.
    pub const OPERATOR_SUFFIX: &'static str = "valoper";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Operator address for `bytes` under `{hrp}valoper`.
    pub fn from_bytes(hrp: &str, bytes: &[u8]) -> Self {
        Self(bech32_encode(&format!("{hrp}{}", Self::OPERATOR_SUFFIX), bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, AddressError> {
        bech32_decode(&self.0).map(|(_, bytes)| bytes)
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ValAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let addr = AccAddress::new("terra1abc");
        assert_eq!(serde_json::to_string(&addr).unwrap(), "\"terra1abc\"");
        let val: ValAddress = serde_json::from_str("\"terravaloper1xyz\"").unwrap();
        assert_eq!(val.as_str(), "terravaloper1xyz");
    }

    #[test]
    fn bytes_round_trip_through_the_prefix() {
        let bytes: Vec<u8> = (0u8..20).collect();
        let val = ValAddress::from_bytes("terra", &bytes);
        assert_eq!(val.as_str(), "terravaloper1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn9a88r2");
        assert_eq!(val.to_bytes().unwrap(), bytes);
        assert!(AccAddress::new("terra1abc").to_bytes().is_err());
    }
}
