use crate::enums::SwapDirection;
use crate::error::AmmError;
use crate::math::constant_product;
use crate::pool::Pool;
use crate::token::TokenAmount;
use crate::value_objects::{Percentage, Price};
use rust_decimal::Decimal;

/// Units of the output token per unit of the input token at current reserves.
///
/// # Returns
///
/// * `None` for an empty pool
pub fn spot_price(pool: &Pool, direction: SwapDirection) -> Option<Price> {
    let (reserve_in, reserve_out) = pool.reserves(direction);
    constant_product::calculate_spot_price(reserve_in, reserve_out)
        .ok()
        .map(Price::new)
}

/// Realised price of a trade: `amount_out / amount_in`.
pub fn execution_rate(amount_in: TokenAmount, amount_out: TokenAmount) -> Option<Price> {
    if amount_in.is_zero() {
        return None;
    }
    let amount_in = amount_in.to_decimal()?;
    let amount_out = amount_out.to_decimal()?;
    amount_out.checked_div(amount_in).map(Price::new)
}

/// Deviation of the execution rate from the spot price, in percent.
/// formula: |spot - rate| / spot * 100
pub fn price_impact(
    pool: &Pool,
    amount_in: TokenAmount,
    amount_out: TokenAmount,
    direction: SwapDirection,
) -> Option<Percentage> {
    let spot = spot_price(pool, direction)?.value;
    let rate = execution_rate(amount_in, amount_out)?.value;
    if spot.is_zero() {
        return None;
    }

    let impact = (spot - rate).abs().checked_div(spot)? * Decimal::ONE_HUNDRED;
    Some(Percentage::new(impact))
}

/// Least output accepted under a slippage tolerance: `amount_out * (1 - slippage/100)`.
pub fn minimum_received(
    amount_out: TokenAmount,
    slippage: Percentage,
) -> Result<TokenAmount, AmmError> {
    slippage.apply_complement(amount_out)
}

/// Share of the pool owned by `lp_minted` once it is added to the supply.
/// formula: minted / (total_lp + minted) * 100
pub fn share_of_pool(pool: &Pool, lp_minted: TokenAmount) -> Percentage {
    let share = || -> Option<Decimal> {
        let minted = lp_minted.to_decimal()?;
        let total = pool.total_lp_tokens().checked_add(lp_minted)?.to_decimal()?;
        minted.checked_div(total)
    };
    share()
        .map(|s| Percentage::new(s * Decimal::ONE_HUNDRED))
        .unwrap_or(Percentage::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use crate::token::Token;
    use rust_decimal_macros::dec;

    fn pool(balance_a: u64, balance_b: u64) -> Pool {
        Pool::new(
            Token::new("Alpha", "ALPHA", 18),
            Token::new("Beta", "BETA", 18),
            Percentage::new(dec!(0.3)),
        )
        .unwrap()
        .with_liquidity(
            TokenAmount::from_tokens(balance_a),
            TokenAmount::from_tokens(balance_b),
            TokenAmount::from_tokens(1000),
        )
        .unwrap()
    }

    #[test]
    fn test_spot_price_both_directions() {
        let p = pool(1000, 4000);
        assert_eq!(spot_price(&p, SwapDirection::AToB), Some(Price::new(dec!(4))));
        assert_eq!(spot_price(&p, SwapDirection::BToA), Some(Price::new(dec!(0.25))));
    }

    #[test]
    fn test_price_impact_grows_with_size() {
        let p = pool(1000, 1000);
        let impact_of = |input: u64| {
            let amount_in = TokenAmount::from_tokens(input);
            let out = engine::quote_swap_output(&p, amount_in, SwapDirection::AToB);
            price_impact(&p, amount_in, out, SwapDirection::AToB).unwrap()
        };

        let small = impact_of(1);
        let large = impact_of(100);
        assert!(small < large);
        // 10 in, ~9.8716 out against a 1:1 spot -> ~1.28%
        let ten = impact_of(10).value();
        assert!(ten > dec!(1.28) && ten < dec!(1.29));
    }

    #[test]
    fn test_execution_rate_zero_input() {
        assert_eq!(execution_rate(TokenAmount::zero(), TokenAmount::from_tokens(1)), None);
    }

    #[test]
    fn test_minimum_received() {
        let out = TokenAmount::from_tokens(200);
        let min = minimum_received(out, Percentage::new(dec!(0.5))).unwrap();
        assert_eq!(min, TokenAmount::from_tokens(199));
    }

    #[test]
    fn test_share_of_pool() {
        let p = pool(1000, 1000);
        let share = share_of_pool(&p, TokenAmount::from_tokens(250));
        assert_eq!(share.value(), dec!(20));
    }
}
