//! Fixed prices, for test networks and dry runs.

use async_trait::async_trait;
use feeder_types::Dec;
use std::collections::HashMap;

use crate::{PriceError, PriceProvider};

/// Returns a configured price for every denom, with optional per-denom overrides.
#[derive(Clone, Debug, Default)]
pub struct FixedPriceProvider {
    default: Option<Dec>,
    overrides: HashMap<String, Dec>,
}

impl FixedPriceProvider {
    /// Same price for every denom.
    pub fn new(price: Dec) -> Self {
        Self {
            default: Some(price),
            overrides: HashMap::new(),
        }
    }

    /// No default: only denoms added with [`with_price`](Self::with_price) are priced.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, denom: impl Into<String>, price: Dec) -> Self {
        self.overrides.insert(denom.into(), price);
        self
    }
}

#[async_trait]
impl PriceProvider for FixedPriceProvider {
    async fn price(&self, denom: &str) -> Result<Dec, PriceError> {
        self.overrides
            .get(denom)
            .copied()
            .or(self.default)
            .ok_or_else(|| PriceError::Unsupported(denom.to_string()))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
