use crate::error::AmmError;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fractional digits carried by every [`TokenAmount`]. One whole token is
/// `10^AMOUNT_DECIMALS` base units.
pub const AMOUNT_DECIMALS: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub symbol: String,
    /// Display precision only. Arithmetic always runs in base units.
    pub decimals: u8,
}

impl Token {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Non-negative fixed-point quantity, stored as a count of base units.
///
/// Parses from and formats to plain decimal strings (`"9.87"`, `"100"`).
/// Fractional digits beyond [`AMOUNT_DECIMALS`] are truncated on parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    pub fn new(raw: impl Into<U256>) -> Self {
        Self(raw.into())
    }

    pub fn zero() -> Self {
        Self(U256::zero())
    }

    /// Base units per whole token.
    pub fn unit() -> U256 {
        U256::exp10(AMOUNT_DECIMALS as usize)
    }

    /// Amount of `whole` tokens.
    pub fn from_tokens(whole: u64) -> Self {
        Self(U256::from(whole) * Self::unit())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Converts to a `Decimal` for display ratios.
    ///
    /// Drops trailing fractional digits when the value does not fit the 96-bit
    /// mantissa; `None` only for amounts whose integer part alone overflows.
    pub fn to_decimal(&self) -> Option<Decimal> {
        let ten = U256::from(10u8);
        let i128_max = U256::from(i128::MAX as u128);
        let mut raw = self.0;
        let mut scale = AMOUNT_DECIMALS;

        loop {
            if raw <= i128_max {
                if let Ok(d) = Decimal::try_from_i128_with_scale(raw.as_u128() as i128, scale) {
                    return Some(d.normalize());
                }
            }
            if scale == 0 {
                return None;
            }
            raw = raw / ten;
            scale -= 1;
        }
    }
}

impl From<U256> for TokenAmount {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl FromStr for TokenAmount {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(AmmError::invalid_amount(s));
        }

        let frac = &frac[..frac.len().min(AMOUNT_DECIMALS as usize)];

        let whole_units = if whole.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(whole).map_err(|_| AmmError::Overflow)?
        };
        let frac_units = if frac.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(frac).map_err(|_| AmmError::Overflow)?
                * U256::exp10(AMOUNT_DECIMALS as usize - frac.len())
        };

        whole_units
            .checked_mul(Self::unit())
            .and_then(|w| w.checked_add(frac_units))
            .map(Self)
            .ok_or(AmmError::Overflow)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = Self::unit();
        let whole = self.0 / unit;
        let frac = self.0 % unit;

        if frac.is_zero() {
            return write!(f, "{}", whole);
        }

        let padded = format!("{:0>width$}", frac.to_string(), width = AMOUNT_DECIMALS as usize);
        write!(f, "{}.{}", whole, padded.trim_end_matches('0'))
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
