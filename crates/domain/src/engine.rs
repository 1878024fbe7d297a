//! Pool engine: quotes and state transitions over an immutable [`Pool`].
//!
//! Every function here is total. Invalid input (missing, non-numeric, zero or
//! negative amounts), an empty pool, or an over-sized withdrawal produce a
//! zero quote and, for transitions, the unchanged pool. The reason is logged at
//! `debug` level; validating against holder balances is the caller's job.

use crate::enums::SwapDirection;
use crate::error::AmmError;
use crate::math::{constant_product, liquidity};
use crate::pool::Pool;
use crate::token::TokenAmount;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Anything the engine accepts as an amount.
///
/// Strings are parsed as decimal token amounts; `None` stands for an absent
/// input field.
pub trait AmountInput {
    fn to_amount(&self) -> Result<TokenAmount, AmmError>;
}

impl AmountInput for &str {
    fn to_amount(&self) -> Result<TokenAmount, AmmError> {
        self.parse()
    }
}

impl AmountInput for String {
    fn to_amount(&self) -> Result<TokenAmount, AmmError> {
        self.parse()
    }
}

impl AmountInput for &String {
    fn to_amount(&self) -> Result<TokenAmount, AmmError> {
        self.parse()
    }
}

impl AmountInput for TokenAmount {
    fn to_amount(&self) -> Result<TokenAmount, AmmError> {
        Ok(*self)
    }
}

impl<T: AmountInput> AmountInput for Option<T> {
    fn to_amount(&self) -> Result<TokenAmount, AmmError> {
        match self {
            Some(input) => input.to_amount(),
            None => Err(AmmError::invalid_amount("<missing>")),
        }
    }
}

/// Parses an amount and rejects zero.
fn positive(input: &impl AmountInput) -> Result<TokenAmount, AmmError> {
    let amount = input.to_amount()?;
    if amount.is_zero() {
        return Err(AmmError::invalid_amount("0"));
    }
    Ok(amount)
}

/// Result of [`apply_swap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub pool: Pool,
    pub amount_out: TokenAmount,
}

/// Result of [`apply_add_liquidity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityOutcome {
    pub pool: Pool,
    pub lp_minted: TokenAmount,
}

/// Token amounts released by burning LP tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalQuote {
    pub amount_a: TokenAmount,
    pub amount_b: TokenAmount,
}

impl WithdrawalQuote {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Result of [`apply_remove_liquidity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityOutcome {
    pub pool: Pool,
    pub amount_a: TokenAmount,
    pub amount_b: TokenAmount,
}

fn swap_output(
    pool: &Pool,
    input_amount: &impl AmountInput,
    direction: SwapDirection,
) -> Result<(TokenAmount, TokenAmount), AmmError> {
    let amount_in = positive(input_amount)?;
    let (reserve_in, reserve_out) = pool.reserves(direction);
    let amount_out =
        constant_product::calculate_out_amount(amount_in, reserve_in, reserve_out, pool.fee())?;
    Ok((amount_in, amount_out))
}

/// Output of selling `input_amount` into the pool in `direction`.
pub fn quote_swap_output(
    pool: &Pool,
    input_amount: impl AmountInput,
    direction: SwapDirection,
) -> TokenAmount {
    match swap_output(pool, &input_amount, direction) {
        Ok((_, amount_out)) => amount_out,
        Err(err) => {
            debug!(%err, %direction, "swap quote degraded to zero");
            TokenAmount::zero()
        }
    }
}

/// Sells `input_amount` into the pool and returns the successor snapshot.
pub fn apply_swap(pool: &Pool, input_amount: impl AmountInput, direction: SwapDirection) -> SwapOutcome {
    let transition = swap_output(pool, &input_amount, direction).and_then(|(amount_in, amount_out)| {
        let (reserve_in, reserve_out) = pool.reserves(direction);
        let new_in = reserve_in.checked_add(amount_in).ok_or(AmmError::Overflow)?;
        let new_out = reserve_out
            .checked_sub(amount_out)
            .ok_or(AmmError::InsufficientReserve)?;

        let next = match direction {
            SwapDirection::AToB => pool.successor(new_in, new_out, pool.total_lp_tokens()),
            SwapDirection::BToA => pool.successor(new_out, new_in, pool.total_lp_tokens()),
        };
        Ok((next, amount_in, amount_out))
    });

    match transition {
        Ok((next, amount_in, amount_out)) => {
            debug!(%direction, %amount_in, %amount_out, "swap applied");
            SwapOutcome {
                pool: next,
                amount_out,
            }
        }
        Err(err) => {
            debug!(%err, %direction, "swap left pool unchanged");
            SwapOutcome {
                pool: pool.clone(),
                amount_out: TokenAmount::zero(),
            }
        }
    }
}

/// Token B needed to deposit `amount_a` of token A at the current ratio.
///
/// Zero for an empty pool, where the bootstrap deposit sets the ratio.
pub fn quote_required_counterpart(pool: &Pool, amount_a: impl AmountInput) -> TokenAmount {
    positive(&amount_a)
        .and_then(|amount_a| {
            liquidity::calculate_counterpart(amount_a, pool.balance_a(), pool.balance_b())
        })
        .unwrap_or_else(|err| {
            debug!(%err, "counterpart quote degraded to zero");
            TokenAmount::zero()
        })
}

/// Token A needed to deposit `amount_b` of token B at the current ratio.
pub fn quote_counterpart_for_b(pool: &Pool, amount_b: impl AmountInput) -> TokenAmount {
    positive(&amount_b)
        .and_then(|amount_b| {
            liquidity::calculate_counterpart(amount_b, pool.balance_b(), pool.balance_a())
        })
        .unwrap_or_else(|err| {
            debug!(%err, "reverse counterpart quote degraded to zero");
            TokenAmount::zero()
        })
}

fn lp_minted(
    pool: &Pool,
    amount_a: &impl AmountInput,
    amount_b: &impl AmountInput,
) -> Result<(TokenAmount, TokenAmount, TokenAmount), AmmError> {
    let amount_a = positive(amount_a)?;
    let amount_b = positive(amount_b)?;
    let minted = liquidity::calculate_lp_minted(
        amount_a,
        amount_b,
        pool.balance_a(),
        pool.balance_b(),
        pool.total_lp_tokens(),
    )?;
    Ok((amount_a, amount_b, minted))
}

/// LP tokens minted for depositing `amount_a` and `amount_b`.
pub fn quote_lp_minted(
    pool: &Pool,
    amount_a: impl AmountInput,
    amount_b: impl AmountInput,
) -> TokenAmount {
    match lp_minted(pool, &amount_a, &amount_b) {
        Ok((_, _, minted)) => minted,
        Err(err) => {
            debug!(%err, "LP mint quote degraded to zero");
            TokenAmount::zero()
        }
    }
}

/// Deposits both tokens and mints LP tokens against them.
pub fn apply_add_liquidity(
    pool: &Pool,
    amount_a: impl AmountInput,
    amount_b: impl AmountInput,
) -> AddLiquidityOutcome {
    let transition = lp_minted(pool, &amount_a, &amount_b).and_then(|(amount_a, amount_b, minted)| {
        let balance_a = pool.balance_a().checked_add(amount_a).ok_or(AmmError::Overflow)?;
        let balance_b = pool.balance_b().checked_add(amount_b).ok_or(AmmError::Overflow)?;
        let total = pool.total_lp_tokens().checked_add(minted).ok_or(AmmError::Overflow)?;
        Ok((pool.successor(balance_a, balance_b, total), minted))
    });

    match transition {
        Ok((next, lp_minted)) => {
            debug!(%lp_minted, total_lp = %next.total_lp_tokens(), "liquidity added");
            AddLiquidityOutcome {
                pool: next,
                lp_minted,
            }
        }
        Err(err) => {
            debug!(%err, "add liquidity left pool unchanged");
            AddLiquidityOutcome {
                pool: pool.clone(),
                lp_minted: TokenAmount::zero(),
            }
        }
    }
}

fn withdrawal(
    pool: &Pool,
    lp_amount: &impl AmountInput,
) -> Result<(TokenAmount, WithdrawalQuote), AmmError> {
    let lp_amount = positive(lp_amount)?;
    let (amount_a, amount_b) = liquidity::calculate_withdrawal(
        lp_amount,
        pool.balance_a(),
        pool.balance_b(),
        pool.total_lp_tokens(),
    )?;
    Ok((lp_amount, WithdrawalQuote { amount_a, amount_b }))
}

/// Reserves released by burning `lp_amount` LP tokens.
pub fn quote_remove_liquidity(pool: &Pool, lp_amount: impl AmountInput) -> WithdrawalQuote {
    match withdrawal(pool, &lp_amount) {
        Ok((_, quote)) => quote,
        Err(err) => {
            debug!(%err, "withdrawal quote degraded to zero");
            WithdrawalQuote::zero()
        }
    }
}

/// Burns `lp_amount` LP tokens and releases the matching reserves.
pub fn apply_remove_liquidity(pool: &Pool, lp_amount: impl AmountInput) -> RemoveLiquidityOutcome {
    let transition = withdrawal(pool, &lp_amount).and_then(|(lp_amount, quote)| {
        let balance_a = pool
            .balance_a()
            .checked_sub(quote.amount_a)
            .ok_or(AmmError::InsufficientReserve)?;
        let balance_b = pool
            .balance_b()
            .checked_sub(quote.amount_b)
            .ok_or(AmmError::InsufficientReserve)?;
        let total = pool
            .total_lp_tokens()
            .checked_sub(lp_amount)
            .ok_or(AmmError::InsufficientReserve)?;
        Ok((pool.successor(balance_a, balance_b, total), quote))
    });

    match transition {
        Ok((next, quote)) => {
            debug!(
                amount_a = %quote.amount_a,
                amount_b = %quote.amount_b,
                total_lp = %next.total_lp_tokens(),
                "liquidity removed"
            );
            RemoveLiquidityOutcome {
                pool: next,
                amount_a: quote.amount_a,
                amount_b: quote.amount_b,
            }
        }
        Err(err) => {
            debug!(%err, "remove liquidity left pool unchanged");
            RemoveLiquidityOutcome {
                pool: pool.clone(),
                amount_a: TokenAmount::zero(),
                amount_b: TokenAmount::zero(),
            }
        }
    }
}
