use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("chain query error: {0}")]
    Rpc(#[from] feeder_rpc::RpcError),

    #[error("price error: {0}")]
    Price(#[from] feeder_price::PriceError),

    #[error("signer error: {0}")]
    Signer(#[from] feeder_crypto::SignerError),

    #[error("encoding error: {0}")]
    Types(#[from] feeder_types::TypesError),

    #[error("transaction rejected with code {code}: {log}")]
    Rejected { code: u32, log: String },

    #[error("config error: {0}")]
    Config(String),
}
