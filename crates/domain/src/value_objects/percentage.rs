use crate::error::AmmError;
use crate::token::TokenAmount;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A percentage expressed in percent units: `0.3` means 0.3%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Percentage(pub Decimal);

impl Percentage {
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Exact `(numerator, denominator)` of `1 - p/100`.
    ///
    /// Built from the decimal mantissa and scale, so a fee of `0.3` becomes
    /// `997/1000` with no rounding.
    pub fn complement_ratio(&self) -> Result<(U256, U256), AmmError> {
        if self.0 < Decimal::ZERO || self.0 > Decimal::ONE_HUNDRED {
            return Err(AmmError::InvalidPercentage(self.0));
        }

        let mantissa = U256::from(self.0.mantissa().unsigned_abs());
        let denominator = U256::from(100u8)
            .checked_mul(U256::exp10(self.0.scale() as usize))
            .ok_or(AmmError::Overflow)?;

        Ok((denominator - mantissa, denominator))
    }

    /// `amount * (1 - p/100)`, truncated toward zero.
    pub fn apply_complement(&self, amount: TokenAmount) -> Result<TokenAmount, AmmError> {
        let (numerator, denominator) = self.complement_ratio()?;
        let scaled = U512::from(amount.0) * U512::from(numerator) / U512::from(denominator);
        U256::try_from(scaled)
            .map(TokenAmount)
            .map_err(|_| AmmError::Overflow)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_complement_ratio_is_exact() {
        let (n, d) = Percentage::new(dec!(0.3)).complement_ratio().unwrap();
        assert_eq!(n, U256::from(997u64));
        assert_eq!(d, U256::from(1000u64));

        let (n, d) = Percentage::ZERO.complement_ratio().unwrap();
        assert_eq!(n, d);
    }

    #[test]
    fn test_complement_ratio_rejects_out_of_range() {
        assert!(Percentage::new(dec!(-1)).complement_ratio().is_err());
        assert!(Percentage::new(dec!(100.01)).complement_ratio().is_err());
        assert!(Percentage::new(dec!(100)).complement_ratio().is_ok());
    }

    #[test]
    fn test_apply_complement() {
        let half = Percentage::new(dec!(50));
        let out = half.apply_complement(TokenAmount::from_tokens(10)).unwrap();
        assert_eq!(out, TokenAmount::from_tokens(5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Percentage::new(dec!(0.3)).to_string(), "0.3%");
    }
}
