//! The commit-reveal vote cycle.
//!
//! Every block runs the same sequence:
//!
//! 1. Reveal: votes committed in an earlier period are revealed (offset 0).
//! 2. Guard: nothing more to do once this period is committed.
//! 3. Lockout: no new prevote in the last blocks of a period.
//! 4. Prevote: price every active denom, commit the hashes (offset 1 if a
//!    reveal went out in this block).
//!
//! State only changes after a successful broadcast, so a failed step is
//! naturally retried on the next block.

use feeder_crypto::{commit_hash, generate_salt};
use feeder_price::PriceProvider;
use feeder_rpc::OracleQuerier;
use feeder_types::{AccAddress, ValAddress, Vote};
use rand::Rng;
use std::num::NonZeroU64;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::coordinator::{TxCoordinator, TxReceipt};
use crate::period::{in_prevote_lockout, period_of};

/// Where the feeder is in the commit-reveal cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CycleState {
    #[default]
    Idle,
    /// Prevotes for `period` were accepted; `votes` await their reveal.
    Committed { period: u64, votes: Vec<Vote> },
}

impl CycleState {
    pub fn committed_period(&self) -> Option<u64> {
        match self {
            CycleState::Idle => None,
            CycleState::Committed { period, .. } => Some(*period),
        }
    }

    pub fn pending_votes(&self) -> &[Vote] {
        match self {
            CycleState::Idle => &[],
            CycleState::Committed { votes, .. } => votes,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrevoteStep {
    Proceed,
    AlreadyCommitted,
    Lockout,
}

/// What a block should do, before any I/O.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CyclePlan {
    pub period: u64,
    /// Committed period whose votes are due for reveal.
    pub reveal: Option<u64>,
    pub prevote: PrevoteStep,
}

/// Decide the reveal, guard, and lockout steps for a block at `height`.
pub fn plan(state: &CycleState, height: u64, vote_period: NonZeroU64) -> CyclePlan {
    let period = period_of(height, vote_period);
    let committed = state.committed_period();

    let reveal = committed.filter(|&p| period > p);
    // A commitment for this period (or a later one, if heights ever go
    // backwards) blocks a second prevote.
    let prevote = if committed.is_some_and(|p| p >= period) {
        PrevoteStep::AlreadyCommitted
    } else if in_prevote_lockout(height, vote_period) {
        PrevoteStep::Lockout
    } else {
        PrevoteStep::Proceed
    };

    CyclePlan {
        period,
        reveal,
        prevote,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NotDue,
    Revealed {
        period: u64,
        count: usize,
        receipt: TxReceipt,
    },
    Failed {
        period: u64,
        error: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrevoteOutcome {
    AlreadyCommitted,
    Lockout,
    /// The active denom query failed; the block is skipped.
    ActivesUnavailable(String),
    /// No denom could be priced (or none is active).
    NoVotes { skipped: Vec<String> },
    Committed {
        denoms: Vec<String>,
        skipped: Vec<String>,
        receipt: TxReceipt,
    },
    Failed {
        error: String,
    },
}

/// What happened for one block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockReport {
    pub height: u64,
    pub period: u64,
    pub reveal: RevealOutcome,
    pub prevote: PrevoteOutcome,
}

/// Executes the per-block cycle against the chain and a price source.
pub struct VoteCycle {
    querier: Arc<dyn OracleQuerier>,
    prices: Arc<dyn PriceProvider>,
    coordinator: TxCoordinator,
    validator: ValAddress,
}

impl VoteCycle {
    pub fn new(
        querier: Arc<dyn OracleQuerier>,
        prices: Arc<dyn PriceProvider>,
        coordinator: TxCoordinator,
        validator: ValAddress,
    ) -> Self {
        Self {
            querier,
            prices,
            coordinator,
            validator,
        }
    }

    pub fn feeder(&self) -> &AccAddress {
        self.coordinator.feeder()
    }

    pub fn validator(&self) -> &ValAddress {
        &self.validator
    }

    pub async fn process_block<R: Rng + Send>(
        &self,
        state: &mut CycleState,
        height: u64,
        vote_period: NonZeroU64,
        rng: &mut R,
    ) -> BlockReport {
        let plan = plan(state, height, vote_period);
        let mut offset = 0;

        let reveal = match plan.reveal {
            None => RevealOutcome::NotDue,
            Some(committed) => {
                let msgs = state.pending_votes().iter().map(Vote::reveal_msg).collect::<Vec<_>>();
                let count = msgs.len();
                match self.coordinator.submit(msgs, 0).await {
                    Ok(receipt) => {
                        info!(height, period = committed, count, hash = %receipt.hash, "revealed votes");
                        *state = CycleState::Idle;
                        offset = 1;
                        RevealOutcome::Revealed {
                            period: committed,
                            count,
                            receipt,
                        }
                    }
                    Err(e) => {
                        warn!(height, period = committed, "reveal failed: {e}");
                        RevealOutcome::Failed {
                            period: committed,
                            error: e.to_string(),
                        }
                    }
                }
            }
        };

        let prevote = match plan.prevote {
            PrevoteStep::AlreadyCommitted => {
                debug!(height, period = plan.period, "already committed this period");
                PrevoteOutcome::AlreadyCommitted
            }
            PrevoteStep::Lockout => {
                debug!(height, period = plan.period, "too close to period end for a prevote");
                PrevoteOutcome::Lockout
            }
            PrevoteStep::Proceed => self.prevote(state, height, plan.period, offset, rng).await,
        };

        BlockReport {
            height,
            period: plan.period,
            reveal,
            prevote,
        }
    }

    async fn prevote<R: Rng + Send>(
        &self,
        state: &mut CycleState,
        height: u64,
        period: u64,
        offset: u64,
        rng: &mut R,
    ) -> PrevoteOutcome {
        let denoms = match self.querier.active_denoms().await {
            Ok(d) => d,
            Err(e) => {
                warn!(height, "active denom query failed, skipping block: {e}");
                return PrevoteOutcome::ActivesUnavailable(e.to_string());
            }
        };

        let mut votes = Vec::with_capacity(denoms.len());
        let mut skipped = Vec::new();
        for denom in denoms {
            match self.prices.price(&denom).await {
                Ok(price) => votes.push(Vote {
                    price,
                    salt: generate_salt(rng),
                    denom,
                    feeder: self.feeder().clone(),
                    validator: self.validator.clone(),
                }),
                Err(e) => {
                    warn!(height, denom = %denom, "no price, skipping denom: {e}");
                    skipped.push(denom);
                }
            }
        }

        if votes.is_empty() {
            debug!(height, period, "nothing to prevote");
            return PrevoteOutcome::NoVotes { skipped };
        }

        let msgs = votes.iter().map(|v| v.prevote_msg(commit_hash(v))).collect();
        match self.coordinator.submit(msgs, offset).await {
            Ok(receipt) => {
                if let CycleState::Committed { period: stale, votes: unrevealed } = state {
                    warn!(
                        period = *stale,
                        count = unrevealed.len(),
                        "dropping votes that were never revealed"
                    );
                }
                let denoms = votes.iter().map(|v| v.denom.clone()).collect();
                info!(height, period, count = votes.len(), offset, hash = %receipt.hash, "committed prevotes");
                *state = CycleState::Committed { period, votes };
                PrevoteOutcome::Committed {
                    denoms,
                    skipped,
                    receipt,
                }
            }
            Err(e) => {
                warn!(height, period, "prevote failed: {e}");
                PrevoteOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
