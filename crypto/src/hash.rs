//! SHA-256 hashing with the chain's truncated digest, and the
//! RIPEMD-160(SHA-256) digest that account addresses are built from.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Length of a truncated digest: addresses and vote commitments use 20 bytes.
pub const TRUNCATED_LEN: usize = 20;

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// First [`TRUNCATED_LEN`] bytes of SHA-256.
pub fn sha256_truncated(data: &[u8]) -> [u8; TRUNCATED_LEN] {
    let full = sha256(data);
    let mut output = [0u8; TRUNCATED_LEN];
    output.copy_from_slice(&full[..TRUNCATED_LEN]);
    output
}

/// RIPEMD-160 of SHA-256, the 20-byte address of a secp256k1 public key.
pub fn hash160(data: &[u8]) -> [u8; TRUNCATED_LEN] {
    Ripemd160::digest(sha256(data)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash160_known_vector() {
        // Compressed secp256k1 generator point.
        let g = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
            .unwrap();
        assert_eq!(
            hex::encode(hash160(&g)),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn truncated_is_prefix_of_full() {
        let full = sha256(b"feeder");
        let short = sha256_truncated(b"feeder");
        assert_eq!(&full[..TRUNCATED_LEN], &short[..]);
    }
}
