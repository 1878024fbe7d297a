use crate::error::AmmError;
use crate::token::TokenAmount;
use crate::value_objects::Percentage;

/// Portion of `amount_in` kept by the pool as a trading fee.
///
/// Rounded in the pool's favour: this is `amount_in` minus the truncated
/// effective input, so fee + effective input always equals the gross input.
pub fn calculate_swap_fee(amount_in: TokenAmount, fee: Percentage) -> Result<TokenAmount, AmmError> {
    let effective = fee.apply_complement(amount_in)?;
    amount_in
        .checked_sub(effective)
        .ok_or(AmmError::Overflow)
}
