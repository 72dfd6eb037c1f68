use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("no price for {0}")]
    Unsupported(String),

    #[error("price fetch failed: {0}")]
    Fetch(String),

    #[error("invalid price response: {0}")]
    InvalidResponse(String),

    #[error("invalid price source {0:?}")]
    InvalidSource(String),
}
