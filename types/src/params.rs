//! Oracle module parameters and account state as reported by the chain.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;

use crate::amino;
use crate::error::TypesError;

/// Oracle module parameters. Only the vote period drives the feeder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOracleParams", into = "RawOracleParams")]
pub struct OracleParams {
    /// Number of blocks in one voting round.
    pub vote_period: NonZeroU64,
}

#[derive(Serialize, Deserialize)]
struct RawOracleParams {
    #[serde(with = "amino::u64_string")]
    vote_period: u64,
}

impl TryFrom<RawOracleParams> for OracleParams {
    type Error = TypesError;

    fn try_from(raw: RawOracleParams) -> Result<Self, Self::Error> {
        NonZeroU64::new(raw.vote_period)
            .map(|vote_period| Self { vote_period })
            .ok_or_else(|| TypesError::InvalidParams("vote_period must be positive".into()))
    }
}

impl From<OracleParams> for RawOracleParams {
    fn from(params: OracleParams) -> Self {
        Self {
            vote_period: params.vote_period.get(),
        }
    }
}

/// Account number and sequence of the feeder account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(with = "amino::u64_string")]
    pub account_number: u64,
    #[serde(with = "amino::u64_string")]
    pub sequence: u64,
}
