//! LP share accounting for a two-reserve pool.
//!
//! All divisions truncate toward zero except [`calculate_counterpart`], which
//! rounds up so a depositor never brings less than the current ratio demands.

use crate::error::AmmError;
use crate::token::TokenAmount;
use primitive_types::{U256, U512};
use tracing::debug;

fn narrow(value: U512) -> Result<TokenAmount, AmmError> {
    U256::try_from(value)
        .map(TokenAmount)
        .map_err(|_| AmmError::Overflow)
}

/// `amount * reserve_to / reserve_from`, rounded up.
pub fn calculate_counterpart(
    amount: TokenAmount,
    reserve_from: TokenAmount,
    reserve_to: TokenAmount,
) -> Result<TokenAmount, AmmError> {
    if amount.is_zero() {
        return Err(AmmError::invalid_amount("0"));
    }
    if reserve_from.is_zero() || reserve_to.is_zero() {
        return Err(AmmError::EmptyPool);
    }

    let numerator = amount.0.full_mul(reserve_to.0);
    let denominator = U512::from(reserve_from.0);
    let mut counterpart = numerator / denominator;
    if !(numerator % denominator).is_zero() {
        counterpart += U512::one();
    }

    narrow(counterpart)
}

/// LP tokens minted for depositing `amount_a` and `amount_b`.
///
/// An empty pool mints `sqrt(amount_a * amount_b)`. Otherwise the deposit
/// mints `amount / reserve * total_lp` for the scarcer side, which equals
/// `amount_a / reserve_a * total_lp` for ratio-preserving deposits.
pub fn calculate_lp_minted(
    amount_a: TokenAmount,
    amount_b: TokenAmount,
    reserve_a: TokenAmount,
    reserve_b: TokenAmount,
    total_lp: TokenAmount,
) -> Result<TokenAmount, AmmError> {
    if amount_a.is_zero() || amount_b.is_zero() {
        return Err(AmmError::invalid_amount("0"));
    }

    if total_lp.is_zero() {
        let minted = amount_a.0.full_mul(amount_b.0).integer_sqrt();
        debug!(%amount_a, %amount_b, "bootstrapping empty pool");
        return narrow(minted);
    }

    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(AmmError::InvalidPool(
            "reserves must be positive while LP tokens are outstanding",
        ));
    }

    let share_a = amount_a.0.full_mul(total_lp.0) / U512::from(reserve_a.0);
    let share_b = amount_b.0.full_mul(total_lp.0) / U512::from(reserve_b.0);
    let minted = narrow(share_a.min(share_b))?;

    if minted.is_zero() {
        return Err(AmmError::invalid_amount("deposit too small to mint LP tokens"));
    }
    Ok(minted)
}

/// Reserves released when burning `lp_amount`.
///
/// Burning the whole supply releases the reserves exactly, leaving no dust.
pub fn calculate_withdrawal(
    lp_amount: TokenAmount,
    reserve_a: TokenAmount,
    reserve_b: TokenAmount,
    total_lp: TokenAmount,
) -> Result<(TokenAmount, TokenAmount), AmmError> {
    if total_lp.is_zero() {
        return Err(AmmError::EmptyPool);
    }
    if lp_amount.is_zero() {
        return Err(AmmError::invalid_amount("0"));
    }
    if lp_amount > total_lp {
        return Err(AmmError::InsufficientReserve);
    }
    if lp_amount == total_lp {
        return Ok((reserve_a, reserve_b));
    }

    let total = U512::from(total_lp.0);
    let amount_a = narrow(lp_amount.0.full_mul(reserve_a.0) / total)?;
    let amount_b = narrow(lp_amount.0.full_mul(reserve_b.0) / total)?;
    Ok((amount_a, amount_b))
}
