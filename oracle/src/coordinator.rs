//! Turns oracle messages into signed, sequenced transactions.
//!
//! Each submission re-reads the account, so a reveal and a prevote sent in
//! the same block use sequence offsets 0 and 1 against the same on-chain
//! sequence.

use feeder_crypto::Signer;
use feeder_rpc::{OracleQuerier, TxBroadcaster};
use feeder_types::{AccAddress, OracleMsg, StdFee, StdSignDoc, StdSignature, StdTx};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::OracleError;

/// Initial wait before the second attempt (ms).
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound on the wait between attempts (ms).
const DEFAULT_MAX_BACKOFF_MS: u64 = 5_000;

/// Bounded retry with exponential backoff for a single submission.
///
/// One attempt by default; failed decisions are then retried only by the
/// next block re-evaluating the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn single_shot() -> Self {
        Self::default()
    }

    pub fn with_attempts(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            ..Self::default()
        }
    }

    /// Wait after the `attempt`-th failure (1-based), doubling each time.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
        }
    }
}

/// An accepted broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// Sequence the transaction was signed with.
    pub sequence: u64,
    pub hash: String,
}

pub struct TxCoordinator {
    querier: Arc<dyn OracleQuerier>,
    broadcaster: Arc<dyn TxBroadcaster>,
    signer: Arc<dyn Signer>,
    chain_id: String,
    fee: StdFee,
    retry: RetryPolicy,
}

impl TxCoordinator {
    pub fn new(
        querier: Arc<dyn OracleQuerier>,
        broadcaster: Arc<dyn TxBroadcaster>,
        signer: Arc<dyn Signer>,
        chain_id: impl Into<String>,
        fee: StdFee,
    ) -> Self {
        Self {
            querier,
            broadcaster,
            signer,
            chain_id: chain_id.into(),
            fee,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Address of the signing (feeder) account.
    pub fn feeder(&self) -> &AccAddress {
        self.signer.address()
    }

    /// Sign and broadcast `msgs` as one transaction at account sequence + `sequence_offset`.
    pub async fn submit(
        &self,
        msgs: Vec<OracleMsg>,
        sequence_offset: u64,
    ) -> Result<TxReceipt, OracleError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.submit_once(&msgs, sequence_offset).await {
                Ok(receipt) => return Ok(receipt),
                Err(e) if attempt < attempts => {
                    let delay = self.retry.backoff_for(attempt);
                    warn!(attempt, ?delay, "submission failed, retrying: {e}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn submit_once(
        &self,
        msgs: &[OracleMsg],
        sequence_offset: u64,
    ) -> Result<TxReceipt, OracleError> {
        let account = self.querier.account(self.signer.address()).await?;
        let sequence = account.sequence + sequence_offset;

        let doc = StdSignDoc {
            account_number: account.account_number,
            chain_id: self.chain_id.clone(),
            fee: self.fee.clone(),
            memo: String::new(),
            msgs: msgs.to_vec(),
            sequence,
        };
        let signature = self.signer.sign(&doc.sign_bytes()?)?;
        let tx = StdTx::from_signed(
            doc,
            StdSignature {
                pub_key: self.signer.public_key(),
                signature,
            },
        );

        let response = self.broadcaster.broadcast_tx_sync(tx.encode()?).await?;
        if !response.is_ok() {
            return Err(OracleError::Rejected {
                code: response.code,
                log: response.log,
            });
        }
        debug!(sequence, hash = %response.hash, msgs = msgs.len(), "transaction accepted");
        Ok(TxReceipt {
            sequence,
            hash: response.hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_single_shot() {
        assert_eq!(RetryPolicy::single_shot().max_attempts, 1);
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let policy = RetryPolicy::with_attempts(10, Duration::from_millis(500));
        assert_eq!(policy.backoff_for(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(1_000));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(2_000));
        assert_eq!(policy.backoff_for(4), Duration::from_millis(4_000));
        assert_eq!(policy.backoff_for(5), Duration::from_millis(5_000));
        assert_eq!(policy.backoff_for(40), Duration::from_millis(5_000));
    }
}
