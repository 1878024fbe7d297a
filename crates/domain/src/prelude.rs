//! Re-exports of the types most callers need.

pub use crate::engine::{
    self, AddLiquidityOutcome, AmountInput, RemoveLiquidityOutcome, SwapOutcome, WithdrawalQuote,
};
pub use crate::enums::{PoolSide, SwapDirection};
pub use crate::error::AmmError;
pub use crate::metrics::PoolStats;
pub use crate::pool::{Pool, PoolSnapshot};
pub use crate::token::{AMOUNT_DECIMALS, Token, TokenAmount};
pub use crate::value_objects::{Percentage, Price};
