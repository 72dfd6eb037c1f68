//! Fundamental types for the oracle feeder.
//!
//! Everything that crosses a crate boundary lives here: fixed-point prices,
//! bech32 addresses, votes, oracle messages, fees, and the signed
//! transaction with its amino wire encoding.

pub mod address;
pub mod amino;
pub mod bech32;
pub mod coin;
pub mod dec;
pub mod error;
pub mod keys;
pub mod msg;
pub mod params;
pub mod tx;
pub mod vote;

pub use address::{AccAddress, ValAddress};
pub use bech32::AddressError;
pub use coin::{Coin, StdFee, DEFAULT_GAS};
pub use dec::Dec;
pub use error::TypesError;
pub use keys::{KeyPair, PrivateKey, PublicKey, PUBLIC_KEY_LEN};
pub use msg::{MsgPricePrevote, MsgPriceVote, OracleMsg};
pub use params::{Account, OracleParams};
pub use tx::{PubKey, StdSignDoc, StdSignature, StdTx};
pub use vote::Vote;
