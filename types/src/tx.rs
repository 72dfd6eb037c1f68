//! Sign documents and signed transactions.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize, Serializer};

use crate::amino;
use crate::coin::StdFee;
use crate::error::TypesError;
use crate::msg::OracleMsg;

/// Amino type name of a compressed secp256k1 public key.
pub const PUBKEY_SECP256K1_TYPE: &str = "tendermint/PubKeySecp256k1";

/// The document a feeder signs. Fields are in sorted key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StdSignDoc {
    #[serde(with = "amino::u64_string")]
    pub account_number: u64,
    pub chain_id: String,
    pub fee: StdFee,
    pub memo: String,
    pub msgs: Vec<OracleMsg>,
    #[serde(with = "amino::u64_string")]
    pub sequence: u64,
}

impl StdSignDoc {
    /// Canonical bytes handed to the signer.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, TypesError> {
        serde_json::to_vec(self).map_err(|e| TypesError::Serialization(e.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(serialize_with = "as_base64", deserialize_with = "from_base64")]
    pub value: Vec<u8>,
}

impl PubKey {
    pub fn secp256k1(bytes: &[u8]) -> Self {
        Self {
            key_type: PUBKEY_SECP256K1_TYPE.to_string(),
            value: bytes.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: PubKey,
    #[serde(serialize_with = "as_base64", deserialize_with = "from_base64")]
    pub signature: Vec<u8>,
}

/// A signed transaction ready for broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdTx {
    #[serde(rename = "msg")]
    pub msgs: Vec<OracleMsg>,
    pub fee: StdFee,
    pub signatures: Vec<StdSignature>,
    pub memo: String,
}

impl StdTx {
    /// Assemble a transaction from a signed document.
    pub fn from_signed(doc: StdSignDoc, signature: StdSignature) -> Self {
        Self {
            msgs: doc.msgs,
            fee: doc.fee,
            signatures: vec![signature],
            memo: doc.memo,
        }
    }

    /// Length-prefixed amino binary, as `broadcast_tx_sync` expects.
    pub fn encode(&self) -> Result<Vec<u8>, TypesError> {
        amino::binary::encode_std_tx(self)
    }

    /// Inverse of [`StdTx::encode`]; addresses come back under `hrp`.
    pub fn decode(bytes: &[u8], hrp: &str) -> Result<Self, TypesError> {
        amino::binary::decode_std_tx(bytes, hrp)
    }
}

fn as_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(bytes))
}

fn from_base64<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    BASE64.decode(s).map_err(serde::de::Error::custom)
}
