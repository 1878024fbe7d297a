use crate::enums::SwapDirection;
use crate::pool::Pool;
use crate::token::TokenAmount;
use crate::value_objects::{Percentage, Price};
use primitive_types::U512;
use rust_decimal::Decimal;

pub mod fees;
pub mod price_impact;

/// Read-only summary of a pool snapshot for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolStats {
    pub balance_a: TokenAmount,
    pub balance_b: TokenAmount,
    pub total_lp_tokens: TokenAmount,
    pub fee: Percentage,
    /// Token B per token A.
    pub price_a_in_b: Option<Price>,
    /// Token A per token B.
    pub price_b_in_a: Option<Price>,
    /// Token A backing each LP token.
    pub a_per_lp_token: Option<Decimal>,
    /// Token B backing each LP token.
    pub b_per_lp_token: Option<Decimal>,
    pub k: U512,
}

impl PoolStats {
    pub fn from_pool(pool: &Pool) -> Self {
        let per_share = |balance: TokenAmount| -> Option<Decimal> {
            balance
                .to_decimal()?
                .checked_div(pool.total_lp_tokens().to_decimal()?)
        };

        Self {
            balance_a: pool.balance_a(),
            balance_b: pool.balance_b(),
            total_lp_tokens: pool.total_lp_tokens(),
            fee: pool.fee(),
            price_a_in_b: price_impact::spot_price(pool, SwapDirection::AToB),
            price_b_in_a: price_impact::spot_price(pool, SwapDirection::BToA),
            a_per_lp_token: per_share(pool.balance_a()),
            b_per_lp_token: per_share(pool.balance_b()),
            k: pool.k(),
        }
    }
}
