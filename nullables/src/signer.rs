//! Nullable signer: a real secp256k1 key, recorded sign requests.

use feeder_crypto::{HdSigner, Signer, SignerError};
use feeder_types::{AccAddress, PubKey};
use std::sync::Mutex;

/// Secret scalar of the fixed test key.
const TEST_SECRET: [u8; 32] = [7u8; 32];

pub struct NullSigner {
    inner: HdSigner,
    signed: Mutex<Vec<Vec<u8>>>,
    failures: Mutex<usize>,
}

impl NullSigner {
    pub fn new(hrp: &str) -> Self {
        Self {
            inner: HdSigner::from_secret(&TEST_SECRET, hrp)
                .expect("fixed test secret is a valid secp256k1 scalar"),
            signed: Mutex::new(Vec::new()),
            failures: Mutex::new(0),
        }
    }

    /// Fail the next `n` sign requests.
    pub fn fail_next(&self, n: usize) {
        *self.failures.lock().unwrap() = n;
    }

    /// Every payload handed to [`Signer::sign`] that was signed.
    pub fn signed(&self) -> Vec<Vec<u8>> {
        self.signed.lock().unwrap().clone()
    }

    /// `sequence` of each signed document, in signing order.
    pub fn signed_sequences(&self) -> Vec<u64> {
        self.signed()
            .iter()
            .filter_map(|doc| {
                let value: serde_json::Value = serde_json::from_slice(doc).ok()?;
                value.get("sequence")?.as_str()?.parse().ok()
            })
            .collect()
    }
}

impl Signer for NullSigner {
    fn address(&self) -> &AccAddress {
        self.inner.address()
    }

    fn public_key(&self) -> PubKey {
        self.inner.public_key()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        {
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(SignerError::Signing("null signer: scripted failure".into()));
            }
        }
        self.signed.lock().unwrap().push(message.to_vec());
        self.inner.sign(message)
    }
}

impl Default for NullSigner {
    fn default() -> Self {
        Self::new("terra")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_sequences_of_signed_docs() {
        let signer = NullSigner::default();
        signer.sign(br#"{"account_number":"1","sequence":"4"}"#).unwrap();
        signer.fail_next(1);
        assert!(signer.sign(br#"{"sequence":"5"}"#).is_err());
        assert_eq!(signer.signed_sequences(), vec![4]);
    }

    #[test]
    fn uses_a_stable_account() {
        let signer = NullSigner::default();
        assert_eq!(
            signer.address().as_str(),
            "terra150rtrmj2f8vl9tem8qpfw36ylw5jg9j248sfme"
        );
        assert_eq!(signer.public_key().key_type, "tendermint/PubKeySecp256k1");
    }
}
