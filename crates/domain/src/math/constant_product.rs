use crate::error::AmmError;
use crate::token::TokenAmount;
use crate::value_objects::Percentage;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;

/// Calculates the output amount for a given input amount in a constant product pool (x * y = k).
///
/// formula: dy = y * dx / (x + dx)
/// taking fee into account: dy = y * (dx * (1 - fee)) / (x + (dx * (1 - fee)))
///
/// The fee is applied as an exact fraction and the division truncates, so the
/// result never exceeds the true output and is always below `reserve_out`.
pub fn calculate_out_amount(
    amount_in: TokenAmount,
    reserve_in: TokenAmount,
    reserve_out: TokenAmount,
    fee: Percentage,
) -> Result<TokenAmount, AmmError> {
    if amount_in.is_zero() {
        return Ok(TokenAmount::zero());
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::EmptyPool);
    }

    let (fee_num, fee_den) = fee.complement_ratio()?;

    let amount_in_with_fee = U512::from(amount_in.0)
        .checked_mul(U512::from(fee_num))
        .ok_or(AmmError::Overflow)?;
    let numerator = amount_in_with_fee
        .checked_mul(U512::from(reserve_out.0))
        .ok_or(AmmError::Overflow)?;
    let denominator = U512::from(reserve_in.0)
        .checked_mul(U512::from(fee_den))
        .ok_or(AmmError::Overflow)?
        .checked_add(amount_in_with_fee)
        .ok_or(AmmError::Overflow)?;

    let amount_out = numerator / denominator;

    U256::try_from(amount_out)
        .map(TokenAmount)
        .map_err(|_| AmmError::Overflow)
}

/// Calculates the spot price of token_in in terms of token_out
/// Price = reserve_out / reserve_in
pub fn calculate_spot_price(
    reserve_in: TokenAmount,
    reserve_out: TokenAmount,
) -> Result<Decimal, AmmError> {
    if reserve_in.is_zero() {
        return Err(AmmError::EmptyPool);
    }

    let r_in = reserve_in.to_decimal().ok_or(AmmError::Overflow)?;
    let r_out = reserve_out.to_decimal().ok_or(AmmError::Overflow)?;

    r_out.checked_div(r_in).ok_or(AmmError::Overflow)
}
