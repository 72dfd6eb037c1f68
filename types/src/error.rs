//! Error type shared by the domain types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid decimal {input:?}: {reason}")]
    InvalidDecimal { input: String, reason: String },

    #[error("decimal overflow")]
    DecimalOverflow,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid oracle params: {0}")]
    InvalidParams(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("amino binary: {0}")]
    Amino(String),
}
