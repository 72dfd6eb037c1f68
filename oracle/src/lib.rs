//! Commit-reveal price feeding for an oracle validator.
//!
//! - [`period`]: vote period arithmetic and the end-of-period lockout
//! - [`cycle`]: the per-block reveal/prevote state machine
//! - [`coordinator`]: signing, sequencing, and broadcasting transactions
//! - [`oracle`]: the loop that feeds blocks into the cycle
//!
//! Chain access, prices, and signing are capabilities supplied at
//! construction; see [`OracleQuerier`], [`TxBroadcaster`], [`PriceProvider`],
//! and [`Signer`].

pub mod config;
pub mod coordinator;
pub mod cycle;
pub mod error;
pub mod oracle;
pub mod period;
pub mod stop;

pub use config::OracleConfig;
pub use coordinator::{RetryPolicy, TxCoordinator, TxReceipt};
pub use cycle::{
    plan, BlockReport, CyclePlan, CycleState, PrevoteOutcome, PrevoteStep, RevealOutcome,
    VoteCycle,
};
pub use error::OracleError;
pub use oracle::{LoopExit, PriceOracle};
pub use period::{
    blocks_until_cycle_end, cycle_end_height, in_prevote_lockout, period_of, LOCKOUT_BLOCKS,
};
pub use stop::{StopHandle, StopListener, StopReason};

pub use feeder_crypto::Signer;
pub use feeder_price::PriceProvider;
pub use feeder_rpc::{BroadcastResponse, NewBlock, OracleQuerier, TxBroadcaster};
