//! A single committed price claim.

use serde::{Deserialize, Serialize};

use crate::address::{AccAddress, ValAddress};
use crate::dec::Dec;
use crate::msg::{MsgPricePrevote, MsgPriceVote, OracleMsg};

/// One price claim for one denom.
///
/// Created when a prevote is generated, turned into a reveal message in a
/// later period, and dropped once that reveal is accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub price: Dec,
    pub salt: String,
    pub denom: String,
    pub feeder: AccAddress,
    pub validator: ValAddress,
}

impl Vote {
    /// The commit message for this vote. `hash` must be the commit hash of `self`.
    pub fn prevote_msg(&self, hash: String) -> OracleMsg {
        OracleMsg::PricePrevote(MsgPricePrevote {
            denom: self.denom.clone(),
            feeder: self.feeder.clone(),
            hash,
            validator: self.validator.clone(),
        })
    }

    /// The reveal message carrying the plaintext price and salt.
    pub fn reveal_msg(&self) -> OracleMsg {
        OracleMsg::PriceVote(MsgPriceVote {
            denom: self.denom.clone(),
            feeder: self.feeder.clone(),
            price: self.price,
            salt: self.salt.clone(),
            validator: self.validator.clone(),
        })
    }
}
