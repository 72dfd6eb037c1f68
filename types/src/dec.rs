//! Fixed-point decimal with 18 fractional digits.
//!
//! Mirrors the chain's `Dec` type. The textual form is part of the commit-hash
//! contract: it always carries exactly [`Dec::PRECISION`] fractional digits,
//! so `0.1` renders as `0.100000000000000000`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

const SCALE: i128 = 1_000_000_000_000_000_000;

/// A signed decimal stored as an integer number of 10^-18 units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dec(i128);

impl Dec {
    /// Number of fractional digits.
    pub const PRECISION: u32 = 18;

    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(SCALE);

    /// Build from raw 10^-18 units.
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> i128 {
        self.0
    }

    pub fn from_int(value: i64) -> Self {
        Self(value as i128 * SCALE)
    }

    /// `value * 10^-prec`, e.g. `Dec::with_prec(10, 2)` is `0.10`.
    pub fn with_prec(value: i64, prec: u32) -> Result<Self, TypesError> {
        if prec > Self::PRECISION {
            return Err(TypesError::InvalidDecimal {
                input: format!("{value}e-{prec}"),
                reason: format!("precision above {}", Self::PRECISION),
            });
        }
        let factor = 10i128.pow(Self::PRECISION - prec);
        (value as i128)
            .checked_mul(factor)
            .map(Self)
            .ok_or(TypesError::DecimalOverflow)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u128;
        write!(f, "{sign}{}.{:018}", abs / scale, abs % scale)
    }
}

impl FromStr for Dec {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TypesError::InvalidDecimal {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => {
                if frac_part.is_empty() {
                    return Err(invalid("missing fractional digits"));
                }
                (int_part, frac_part)
            }
            None => (body, ""),
        };

        if int_part.is_empty() {
            return Err(invalid("missing integer digits"));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("unexpected character"));
        }
        if frac_part.len() > Self::PRECISION as usize {
            return Err(invalid("too many fractional digits"));
        }

        let int_value: u128 = int_part.parse().map_err(|_| TypesError::DecimalOverflow)?;
        let mut frac_value: u128 = 0;
        for b in frac_part
            .bytes()
            .chain(std::iter::repeat(b'0'))
            .take(Self::PRECISION as usize)
        {
            frac_value = frac_value * 10 + u128::from(b - b'0');
        }

        let magnitude = int_value
            .checked_mul(SCALE as u128)
            .and_then(|v| v.checked_add(frac_value))
            .and_then(|v| i128::try_from(v).ok())
            .ok_or(TypesError::DecimalOverflow)?;

        Ok(Self(if negative { -magnitude } else { magnitude }))
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DecVisitor;

        impl serde::de::Visitor<'_> for DecVisitor {
            type Value = Dec;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a decimal string or number")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                v.to_string().parse().map_err(E::custom)
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Dec::from_int(v))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
                if !v.is_finite() {
                    return Err(E::custom("non-finite decimal"));
                }
                v.to_string().parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DecVisitor)
    }
}
