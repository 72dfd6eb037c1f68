//! Nullable infrastructure for deterministic testing.
//!
//! Every external capability of the feeder (chain queries, broadcasting,
//! signing, prices, the block stream) has a stand-in here that:
//! - Returns scripted values
//! - Can fail on demand
//! - Records what it was asked to do
//! - Never touches the network
//!
//! Usage: hand these to the oracle in place of the real implementations.

pub mod blocks;
pub mod chain;
pub mod prices;
pub mod signer;

pub use blocks::scripted_blocks;
pub use chain::NullChain;
pub use prices::NullPriceProvider;
pub use signer::NullSigner;
