//! Bech32 encoding (BIP-173), used for account and operator addresses.

use thiserror::Error;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
const CHECKSUM_LEN: usize = 6;
const MAX_LEN: usize = 90;

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const CHARSET_REV: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[CHARSET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid bech32 string: {0}")]
    Malformed(String),

    #[error("bech32 checksum mismatch")]
    Checksum,

    #[error("expected prefix {expected:?}, found {found:?}")]
    WrongPrefix { expected: String, found: String },
}

fn polymod(values: impl Iterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x1ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> impl Iterator<Item = u8> + '_ {
    hrp.bytes()
        .map(|b| b >> 5)
        .chain(std::iter::once(0))
        .chain(hrp.bytes().map(|b| b & 0x1f))
}

fn create_checksum(hrp: &str, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let values = hrp_expand(hrp)
        .chain(data.iter().copied())
        .chain([0u8; CHECKSUM_LEN]);
    let pm = polymod(values) ^ 1;
    let mut out = [0u8; CHECKSUM_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ((pm >> (5 * (5 - i))) & 0x1f) as u8;
    }
    out
}

/// Regroup bits, e.g. 8-bit bytes into 5-bit words.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max = (1u32 << to) - 1;
    let max_acc = (1u32 << (from + to - 1)) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for &value in data {
        if u32::from(value) >> from != 0 {
            return None;
        }
        acc = ((acc << from) | u32::from(value)) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max) != 0 {
        return None;
    }
    Some(out)
}

/// Encode bytes under a human-readable prefix.
pub fn bech32_encode(hrp: &str, bytes: &[u8]) -> String {
    let data = convert_bits(bytes, 8, 5, true).unwrap_or_default();
    let checksum = create_checksum(hrp, &data);
    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(hrp);
    out.push('1');
    for d in data.iter().chain(checksum.iter()) {
        out.push(CHARSET[*d as usize] as char);
    }
    out
}

/// Decode a bech32 string into its prefix and payload bytes.
pub fn bech32_decode(s: &str) -> Result<(String, Vec<u8>), AddressError> {
    let malformed = |why: &str| AddressError::Malformed(why.to_string());

    if s.len() > MAX_LEN {
        return Err(malformed("too long"));
    }
    let has_lower = s.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = s.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(malformed("mixed case"));
    }
    let s = s.to_ascii_lowercase();
    let sep = s.rfind('1').ok_or_else(|| malformed("missing separator"))?;
    let (hrp, rest) = (&s[..sep], &s[sep + 1..]);
    if hrp.is_empty() || rest.len() < CHECKSUM_LEN {
        return Err(malformed("too short"));
    }
    if !hrp.bytes().all(|b| (33..=126).contains(&b)) {
        return Err(malformed("invalid prefix character"));
    }

    let mut data = Vec::with_capacity(rest.len());
    for b in rest.bytes() {
        let value = CHARSET_REV
            .get(b as usize)
            .copied()
            .filter(|v| *v != 0xFF)
            .ok_or_else(|| malformed("invalid data character"))?;
        data.push(value);
    }

    if polymod(hrp_expand(hrp).chain(data.iter().copied())) != 1 {
        return Err(AddressError::Checksum);
    }
    data.truncate(data.len() - CHECKSUM_LEN);
    let bytes = convert_bits(&data, 5, 8, false).ok_or_else(|| malformed("invalid padding"))?;
    Ok((hrp.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bip173_empty_payload_vector() {
        assert_eq!(bech32_encode("a", &[]), "a12uel5l");
        assert_eq!(bech32_decode("A12UEL5L").unwrap(), ("a".to_string(), vec![]));
    }

    #[test]
    fn encodes_operator_address() {
        let bytes: Vec<u8> = (0u8..20).collect();
        let encoded = bech32_encode("terravaloper", &bytes);
        assert_eq!(encoded, "terravaloper1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn9a88r2");
        let (hrp, decoded) = bech32_decode(&encoded).unwrap();
        assert_eq!(hrp, "terravaloper");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let mut addr = "terra1w508d6qejxtdg4y5r3zarvary0c5xw7kued6dc".to_string();
        addr.pop();
        addr.push('q');
        assert_eq!(bech32_decode(&addr), Err(AddressError::Checksum));
    }

    #[test]
    fn rejects_mixed_case_and_bad_chars() {
        assert!(bech32_decode("Terra1w508d6qejxtdg4y5r3zarvary0c5xw7kued6dc").is_err());
        assert!(bech32_decode("terra1bbbbbbbbbb").is_err());
        assert!(bech32_decode("noseparator").is_err());
    }
}
