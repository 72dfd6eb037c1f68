//! Oracle module messages.
//!
//! Struct fields are declared in lexicographic order: the sign document is
//! canonical JSON with sorted keys and serde emits fields in declaration order.

use serde::{Deserialize, Serialize};

use crate::address::{AccAddress, ValAddress};
use crate::dec::Dec;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum OracleMsg {
    #[serde(rename = "oracle/MsgPricePrevote")]
    PricePrevote(MsgPricePrevote),
    #[serde(rename = "oracle/MsgPriceVote")]
    PriceVote(MsgPriceVote),
}

/// Commitment to a price: only the hash is public.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgPricePrevote {
    pub denom: String,
    pub feeder: AccAddress,
    pub hash: String,
    pub validator: ValAddress,
}

/// Reveal of a previously committed price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgPriceVote {
    pub denom: String,
    pub feeder: AccAddress,
    pub price: Dec,
    pub salt: String,
    pub validator: ValAddress,
}

impl OracleMsg {
    pub fn denom(&self) -> &str {
        match self {
            OracleMsg::PricePrevote(msg) => &msg.denom,
            OracleMsg::PriceVote(msg) => &msg.denom,
        }
    }

    pub fn is_reveal(&self) -> bool {
        matches!(self, OracleMsg::PriceVote(_))
    }
}
