//! Nullable chain: scripted queries, recorded broadcasts.

use async_trait::async_trait;
use feeder_rpc::{BroadcastResponse, OracleQuerier, RpcError, TxBroadcaster};
use feeder_types::{AccAddress, Account, OracleParams, StdTx};
use std::collections::VecDeque;
use std::num::NonZeroU64;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
enum BroadcastFault {
    Transport,
    Rejected(u32),
}

struct ChainState {
    params: Option<OracleParams>,
    actives: Vec<String>,
    account: Account,
    actives_failures: usize,
    account_failures: usize,
    faults: VecDeque<BroadcastFault>,
    broadcasts: Vec<Vec<u8>>,
    attempts: usize,
    active_queries: usize,
}

/// A test chain that answers queries from scripted state and records every
/// accepted transaction instead of including it in a block.
pub struct NullChain {
    hrp: String,
    state: Mutex<ChainState>,
}

impl NullChain {
    pub fn new(vote_period: u64, actives: &[&str]) -> Self {
        let params = NonZeroU64::new(vote_period).map(|vote_period| OracleParams { vote_period });
        Self {
            hrp: "terra".to_string(),
            state: Mutex::new(ChainState {
                params,
                actives: actives.iter().map(|d| d.to_string()).collect(),
                account: Account {
                    account_number: 1,
                    sequence: 0,
                },
                actives_failures: 0,
                account_failures: 0,
                faults: VecDeque::new(),
                broadcasts: Vec::new(),
                attempts: 0,
                active_queries: 0,
            }),
        }
    }

    /// Address prefix used when decoding recorded transactions.
    pub fn with_hrp(mut self, hrp: &str) -> Self {
        self.hrp = hrp.to_string();
        self
    }

    /// Make the oracle parameter query fail.
    pub fn without_params(self) -> Self {
        self.state.lock().unwrap().params = None;
        self
    }

    pub fn set_actives(&self, actives: &[&str]) {
        self.state.lock().unwrap().actives = actives.iter().map(|d| d.to_string()).collect();
    }

    pub fn set_account(&self, account_number: u64, sequence: u64) {
        self.state.lock().unwrap().account = Account {
            account_number,
            sequence,
        };
    }

    /// Fail the next `n` active denom queries.
    pub fn fail_active_denoms(&self, n: usize) {
        self.state.lock().unwrap().actives_failures = n;
    }

    /// Fail the next `n` account queries.
    pub fn fail_account(&self, n: usize) {
        self.state.lock().unwrap().account_failures = n;
    }

    /// Fail the next `n` broadcasts at the transport level.
    pub fn fail_broadcasts(&self, n: usize) {
        let mut state = self.state.lock().unwrap();
        state.faults.extend(std::iter::repeat(BroadcastFault::Transport).take(n));
    }

    /// Answer the next `n` broadcasts with a non-zero code.
    pub fn reject_broadcasts(&self, n: usize, code: u32) {
        let mut state = self.state.lock().unwrap();
        state.faults.extend(std::iter::repeat(BroadcastFault::Rejected(code)).take(n));
    }

    /// Accepted transactions, decoded from their wire bytes, in broadcast
    /// order.
    pub fn broadcasts(&self) -> Vec<StdTx> {
        self.state
            .lock()
            .unwrap()
            .broadcasts
            .iter()
            .filter_map(|bytes| StdTx::decode(bytes, &self.hrp).ok())
            .collect()
    }

    /// Raw bytes of accepted transactions.
    pub fn broadcast_bytes(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().broadcasts.clone()
    }

    /// Broadcast calls, including failed and rejected ones.
    pub fn broadcast_attempts(&self) -> usize {
        self.state.lock().unwrap().attempts
    }

    pub fn active_denom_queries(&self) -> usize {
        self.state.lock().unwrap().active_queries
    }

    /// Forget recorded broadcasts and counters.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.broadcasts.clear();
        state.attempts = 0;
        state.active_queries = 0;
    }
}

#[async_trait]
impl OracleQuerier for NullChain {
    async fn oracle_params(&self) -> Result<OracleParams, RpcError> {
        self.state
            .lock()
            .unwrap()
            .params
            .ok_or_else(|| RpcError::Transport("null chain: params unavailable".into()))
    }

    async fn active_denoms(&self) -> Result<Vec<String>, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.active_queries += 1;
        if state.actives_failures > 0 {
            state.actives_failures -= 1;
            return Err(RpcError::Transport("null chain: actives unavailable".into()));
        }
        Ok(state.actives.clone())
    }

    async fn account(&self, _address: &AccAddress) -> Result<Account, RpcError> {
        let mut state = self.state.lock().unwrap();
        if state.account_failures > 0 {
            state.account_failures -= 1;
            return Err(RpcError::Transport("null chain: account unavailable".into()));
        }
        Ok(state.account)
    }
}

#[async_trait]
impl TxBroadcaster for NullChain {
    async fn broadcast_tx_sync(&self, tx: Vec<u8>) -> Result<BroadcastResponse, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.attempts += 1;
        match state.faults.pop_front() {
            Some(BroadcastFault::Transport) => {
                Err(RpcError::Transport("null chain: broadcast dropped".into()))
            }
            Some(BroadcastFault::Rejected(code)) => Ok(BroadcastResponse {
                code,
                log: "null chain: rejected".into(),
                hash: String::new(),
            }),
            None => {
                state.broadcasts.push(tx);
                Ok(BroadcastResponse {
                    code: 0,
                    log: String::new(),
                    hash: format!("NULLTX{}", state.broadcasts.len()),
                })
            }
        }
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new(5, &["ukrw"])
    }
}
