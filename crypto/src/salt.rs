//! Short random salts for vote commitments.

use rand::Rng;

/// Salt length in characters.
pub const SALT_LEN: usize = 3;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Draw a [`SALT_LEN`]-character lowercase hex salt.
pub fn generate_salt<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SALT_LEN)
        .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn salt_is_three_hex_chars() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let salt = generate_salt(&mut rng);
            assert_eq!(salt.len(), SALT_LEN);
            assert!(salt.bytes().all(|b| HEX_DIGITS.contains(&b)));
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = generate_salt(&mut StdRng::seed_from_u64(1));
        let b = generate_salt(&mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }
}
