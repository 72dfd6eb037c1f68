//! Nullable price provider: scripted prices and failures.

use async_trait::async_trait;
use feeder_price::{PriceError, PriceProvider};
use feeder_types::Dec;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

pub struct NullPriceProvider {
    prices: Mutex<BTreeMap<String, Dec>>,
    failing: Mutex<BTreeSet<String>>,
    requests: Mutex<Vec<String>>,
}

impl NullPriceProvider {
    pub fn new() -> Self {
        Self {
            prices: Mutex::new(BTreeMap::new()),
            failing: Mutex::new(BTreeSet::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_price(self, denom: &str, price: Dec) -> Self {
        self.set_price(denom, price);
        self
    }

    pub fn set_price(&self, denom: &str, price: Dec) {
        self.prices.lock().unwrap().insert(denom.to_string(), price);
    }

    /// Make every request for `denom` fail until [`Self::recover`] is called.
    pub fn fail(&self, denom: &str) {
        self.failing.lock().unwrap().insert(denom.to_string());
    }

    pub fn recover(&self, denom: &str) {
        self.failing.lock().unwrap().remove(denom);
    }

    /// Denoms asked for, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceProvider for NullPriceProvider {
    async fn price(&self, denom: &str) -> Result<Dec, PriceError> {
        self.requests.lock().unwrap().push(denom.to_string());
        if self.failing.lock().unwrap().contains(denom) {
            return Err(PriceError::Fetch(format!("null provider: {denom} unavailable")));
        }
        self.prices
            .lock()
            .unwrap()
            .get(denom)
            .copied()
            .ok_or_else(|| PriceError::Unsupported(denom.to_string()))
    }

    fn name(&self) -> &str {
        "null"
    }
}

impl Default for NullPriceProvider {
    fn default() -> Self {
        Self::new()
    }
}
