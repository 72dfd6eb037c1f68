//! Coins and transaction fees.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amino;

/// Gas limit the feeder attaches to every oracle transaction by default.
pub const DEFAULT_GAS: u64 = 50_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    #[serde(with = "amino::u128_string")]
    pub amount: u128,
    pub denom: String,
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            amount,
            denom: denom.into(),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Fee attached to a transaction: the coins paid and the gas limit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    #[serde(with = "amino::u64_string")]
    pub gas: u64,
}

impl StdFee {
    pub fn new(coin: Coin, gas: u64) -> Self {
        Self {
            amount: vec![coin],
            gas,
        }
    }
}
