//! Commitment hash for price prevotes.
//!
//! The chain recomputes this hash from the revealed fields, so the preimage
//! layout is a wire contract: `salt:price:denom:validator`, price in its
//! 18-digit decimal text, validator as its bech32 string. SHA-256 truncated
//! to 20 bytes, lowercase hex.

use feeder_types::Vote;

use crate::hash::sha256_truncated;

/// Hex length of a commit hash (20 bytes).
pub const COMMIT_HASH_HEX_LEN: usize = 40;

fn preimage(vote: &Vote) -> String {
    format!(
        "{}:{}:{}:{}",
        vote.salt, vote.price, vote.denom, vote.validator
    )
}

/// Compute the commit hash carried by a prevote.
pub fn commit_hash(vote: &Vote) -> String {
    hex::encode(sha256_truncated(preimage(vote).as_bytes()))
}

/// Recompute the hash from revealed fields and compare, as the chain does on reveal.
pub fn verify_commit(hash: &str, vote: &Vote) -> bool {
    hash.eq_ignore_ascii_case(&commit_hash(vote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use feeder_types::{AccAddress, Dec, ValAddress};

    fn vote() -> Vote {
        Vote {
            price: "1234.5".parse().unwrap(),
            salt: "abc".into(),
            denom: "ukrw".into(),
            feeder: AccAddress::new("terra19rl4cm2hmr8afy4kldpxz3fka4jguq0a6yhaa4"),
            validator: ValAddress::new("terravaloper1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn9a88r2"),
        }
    }

    #[test]
    fn matches_known_digest() {
        assert_eq!(commit_hash(&vote()), "38823740efc03ff93cebeb5dd08e8d7f8afebf61");
    }

    #[test]
    fn is_deterministic_lowercase_hex() {
        let a = commit_hash(&vote());
        let b = commit_hash(&vote());
        assert_eq!(a, b);
        assert_eq!(a.len(), COMMIT_HASH_HEX_LEN);
        assert!(a.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn every_committed_field_changes_the_digest() {
        let base = commit_hash(&vote());

        let mut v = vote();
        v.salt = "abd".into();
        assert_ne!(commit_hash(&v), base);

        let mut v = vote();
        v.price = Dec::from_int(1234);
        assert_ne!(commit_hash(&v), base);

        let mut v = vote();
        v.denom = "uusd".into();
        assert_ne!(commit_hash(&v), base);

        let mut v = vote();
        v.validator = ValAddress::new("terravaloper1other");
        assert_ne!(commit_hash(&v), base);
    }

    #[test]
    fn feeder_is_not_committed() {
        let mut v = vote();
        v.feeder = AccAddress::new("terra1someoneelse");
        assert_eq!(commit_hash(&v), commit_hash(&vote()));
    }

    #[test]
    fn price_text_uses_full_precision() {
        assert_eq!(
            preimage(&vote()),
            "abc:1234.500000000000000000:ukrw:terravaloper1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn9a88r2"
        );
    }

    #[test]
    fn verify_accepts_matching_reveal_only() {
        let hash = commit_hash(&vote());
        assert!(verify_commit(&hash, &vote()));
        assert!(verify_commit(&hash.to_uppercase(), &vote()));

        let mut tampered = vote();
        tampered.price = Dec::from_int(1);
        assert!(!verify_commit(&hash, &tampered));
    }
}
