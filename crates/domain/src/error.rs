use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the pool math.
///
/// The engine entry points never surface these to callers; they degrade to a
/// zero quote or an unchanged pool. They are still returned by the lower level
/// math so the reason for a no-op can be logged or inspected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// Amount is missing, non-numeric, zero or negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Requested more than the pool (or the LP supply) can cover.
    #[error("insufficient reserve")]
    InsufficientReserve,

    /// The pool holds no reserves or no LP supply.
    #[error("pool is empty")]
    EmptyPool,

    /// Intermediate value did not fit the fixed-point representation.
    #[error("arithmetic overflow")]
    Overflow,

    /// Fee must be a percentage in [0, 100).
    #[error("invalid fee percentage: {0}")]
    InvalidFee(Decimal),

    /// Percentage outside [0, 100].
    #[error("invalid percentage: {0}")]
    InvalidPercentage(Decimal),

    /// Pool snapshot violates a structural invariant.
    #[error("invalid pool: {0}")]
    InvalidPool(&'static str),
}

impl AmmError {
    pub(crate) fn invalid_amount(input: impl Into<String>) -> Self {
        Self::InvalidAmount(input.into())
    }
}
