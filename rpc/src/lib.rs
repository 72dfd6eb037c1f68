//! Chain access for the oracle feeder.
//!
//! The feeder talks to a Tendermint node in three ways:
//!
//! - `abci_query` for oracle parameters, active denoms, and account state
//!   ([`OracleQuerier`])
//! - `broadcast_tx_sync` for signed transactions ([`TxBroadcaster`])
//! - a websocket `NewBlock` subscription feeding a channel of [`NewBlock`]s
//!
//! [`TendermintClient`] implements both traits over HTTP JSON-RPC.

pub mod client;
pub mod error;
pub mod subscribe;

use async_trait::async_trait;
use feeder_types::{AccAddress, Account, OracleParams};
use serde::{Deserialize, Serialize};

pub use client::TendermintClient;
pub use error::RpcError;
pub use subscribe::{parse_new_block, subscribe_new_blocks, BLOCK_CHANNEL_CAPACITY};

/// A newly committed block, as far as the feeder cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewBlock {
    pub height: u64,
}

/// Result of `broadcast_tx_sync`. A non-zero `code` means the node rejected
/// the transaction in `CheckTx`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub code: u32,
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub hash: String,
}

impl BroadcastResponse {
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// Read-only queries against the oracle and auth modules.
#[async_trait]
pub trait OracleQuerier: Send + Sync {
    async fn oracle_params(&self) -> Result<OracleParams, RpcError>;

    /// Denoms that need a price this period, in chain order.
    async fn active_denoms(&self) -> Result<Vec<String>, RpcError>;

    async fn account(&self, address: &AccAddress) -> Result<Account, RpcError>;
}

/// Synchronous (CheckTx) broadcast of encoded transactions.
#[async_trait]
pub trait TxBroadcaster: Send + Sync {
    async fn broadcast_tx_sync(&self, tx: Vec<u8>) -> Result<BroadcastResponse, RpcError>;
}
