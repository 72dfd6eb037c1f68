//! Price source selection from configuration.
//!
//! `fixed:<decimal>` selects [`FixedPriceProvider`]; an `http://` or
//! `https://` URL selects [`HttpPriceProvider`].

use feeder_types::Dec;

use crate::{FixedPriceProvider, HttpPriceProvider, PriceError, PriceProvider};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PriceSource {
    Fixed(Dec),
    Http(String),
}

impl PriceSource {
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        if let Some(price) = s.strip_prefix("fixed:") {
            let price = price
                .parse()
                .map_err(|_| PriceError::InvalidSource(s.to_string()))?;
            return Ok(PriceSource::Fixed(price));
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(PriceSource::Http(s.to_string()));
        }
        Err(PriceError::InvalidSource(s.to_string()))
    }

    pub fn build(&self) -> Box<dyn PriceProvider> {
        match self {
            PriceSource::Fixed(price) => Box::new(FixedPriceProvider::new(*price)),
            PriceSource::Http(url) => Box::new(HttpPriceProvider::new(url)),
        }
    }
}
