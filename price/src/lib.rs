//! Price provider capability.
//!
//! The feeder asks a [`PriceProvider`] for one price per active denom every
//! time it builds prevotes. A failure for one denom only skips that denom.

pub mod error;
pub mod fixed;
pub mod http;
pub mod source;

use async_trait::async_trait;
use feeder_types::Dec;

pub use error::PriceError;
pub use fixed::FixedPriceProvider;
pub use http::HttpPriceProvider;
pub use source::PriceSource;

/// Trait for fetching the current price of a denom.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Price of one unit of `denom` (e.g. `ukrw`) in the reference currency.
    async fn price(&self, denom: &str) -> Result<Dec, PriceError>;

    /// Human-readable name of this provider.
    fn name(&self) -> &str;
}

#[async_trait]
impl<P: PriceProvider + ?Sized> PriceProvider for Box<P> {
    async fn price(&self, denom: &str) -> Result<Dec, PriceError> {
        (**self).price(denom).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Market symbol for an on-chain micro denom: the leading `u` is dropped
/// (`ukrw` → `krw`). Denoms without the prefix are returned unchanged.
pub fn symbol_for_denom(denom: &str) -> &str {
    match denom.strip_prefix('u') {
        Some(symbol) if !symbol.is_empty() => symbol,
        _ => denom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_micro_prefix() {
        assert_eq!(symbol_for_denom("ukrw"), "krw");
        assert_eq!(symbol_for_denom("uusd"), "usd");
        assert_eq!(symbol_for_denom("luna"), "luna");
        assert_eq!(symbol_for_denom("u"), "u");
    }
}
