//! The block processing loop.

use feeder_rpc::{NewBlock, OracleQuerier};
use feeder_utils::{format_duration, StatsCounter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cycle::{BlockReport, CycleState, PrevoteOutcome, RevealOutcome, VoteCycle};
use crate::stop::{StopListener, StopReason};
use crate::OracleError;

const STAT_NAMES: &[&str] = &[
    "blocks",
    "reveals",
    "reveal_failures",
    "prevotes",
    "prevote_failures",
    "guarded",
    "lockouts",
    "query_failures",
    "skipped_denoms",
];

/// Why [`PriceOracle::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    /// The block subscription ended.
    StreamClosed,
    /// The run deadline elapsed.
    Deadline,
    Stopped(StopReason),
}

/// Drives the vote cycle from a stream of new blocks.
pub struct PriceOracle {
    querier: Arc<dyn OracleQuerier>,
    cycle: VoteCycle,
    run_timeout: Option<Duration>,
    stats: StatsCounter,
}

impl PriceOracle {
    pub fn new(querier: Arc<dyn OracleQuerier>, cycle: VoteCycle) -> Self {
        Self {
            querier,
            cycle,
            run_timeout: None,
            stats: StatsCounter::new(STAT_NAMES),
        }
    }

    /// Stop after `timeout` even if blocks keep arriving. `None` runs unbounded.
    pub fn with_run_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.run_timeout = timeout;
        self
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    /// Process blocks until the stream closes, the deadline passes, or a
    /// stop is requested. Fails only if the oracle parameters cannot be
    /// read at startup.
    pub async fn run(
        &self,
        mut blocks: mpsc::Receiver<NewBlock>,
        mut stop: StopListener,
    ) -> Result<LoopExit, OracleError> {
        let params = self.querier.oracle_params().await?;
        let vote_period = params.vote_period;
        info!(
            vote_period = vote_period.get(),
            feeder = %self.cycle.feeder(),
            validator = %self.cycle.validator(),
            "starting processing loop"
        );

        let started = Instant::now();
        let deadline = async {
            match self.run_timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut state = CycleState::Idle;
        let mut rng = StdRng::from_entropy();

        let exit = loop {
            tokio::select! {
                block = blocks.recv() => match block {
                    Some(block) => {
                        let report = self
                            .cycle
                            .process_block(&mut state, block.height, vote_period, &mut rng)
                            .await;
                        self.record(&report);
                    }
                    None => break LoopExit::StreamClosed,
                },
                _ = &mut deadline => break LoopExit::Deadline,
                reason = stop.stopped() => break LoopExit::Stopped(reason),
            }
        };

        if let Some(period) = state.committed_period() {
            warn!(period, count = state.pending_votes().len(), "exiting with unrevealed votes");
        }
        info!(
            ?exit,
            elapsed = %format_duration(started.elapsed()),
            stats = %self.stats.summary(),
            "processing loop stopped"
        );
        Ok(exit)
    }

    fn record(&self, report: &BlockReport) {
        self.stats.increment("blocks");
        match &report.reveal {
            RevealOutcome::NotDue => {}
            RevealOutcome::Revealed { .. } => self.stats.increment("reveals"),
            RevealOutcome::Failed { .. } => self.stats.increment("reveal_failures"),
        }
        match &report.prevote {
            PrevoteOutcome::AlreadyCommitted => self.stats.increment("guarded"),
            PrevoteOutcome::Lockout => self.stats.increment("lockouts"),
            PrevoteOutcome::ActivesUnavailable(_) => self.stats.increment("query_failures"),
            PrevoteOutcome::NoVotes { skipped } => {
                self.stats.add("skipped_denoms", skipped.len() as u64)
            }
            PrevoteOutcome::Committed { skipped, .. } => {
                self.stats.increment("prevotes");
                self.stats.add("skipped_denoms", skipped.len() as u64);
            }
            PrevoteOutcome::Failed { .. } => self.stats.increment("prevote_failures"),
        }
    }
}
