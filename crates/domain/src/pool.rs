use crate::enums::{PoolSide, SwapDirection};
use crate::error::AmmError;
use crate::token::{Token, TokenAmount};
use crate::value_objects::Percentage;
use primitive_types::U512;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of a two-asset constant-product pool.
///
/// Every constructor validates the snapshot; transitions in
/// [`crate::engine`] return a new `Pool` and never touch their input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PoolSnapshot", into = "PoolSnapshot")]
pub struct Pool {
    token_a: Token,
    token_b: Token,
    balance_a: TokenAmount,
    balance_b: TokenAmount,
    total_lp_tokens: TokenAmount,
    fee: Percentage,
}

/// Plain-data form of a [`Pool`], used for (de)serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub token_a: Token,
    pub token_b: Token,
    pub balance_a: TokenAmount,
    pub balance_b: TokenAmount,
    pub total_lp_tokens: TokenAmount,
    pub fee: Percentage,
}

impl Pool {
    /// Creates an empty pool awaiting its bootstrap deposit.
    pub fn new(token_a: Token, token_b: Token, fee: Percentage) -> Result<Self, AmmError> {
        Self::try_from(PoolSnapshot {
            token_a,
            token_b,
            balance_a: TokenAmount::zero(),
            balance_b: TokenAmount::zero(),
            total_lp_tokens: TokenAmount::zero(),
            fee,
        })
    }

    /// Seeds the pool with reserves and an LP supply.
    pub fn with_liquidity(
        self,
        balance_a: TokenAmount,
        balance_b: TokenAmount,
        total_lp_tokens: TokenAmount,
    ) -> Result<Self, AmmError> {
        Self::try_from(PoolSnapshot {
            token_a: self.token_a,
            token_b: self.token_b,
            balance_a,
            balance_b,
            total_lp_tokens,
            fee: self.fee,
        })
    }

    pub fn token_a(&self) -> &Token {
        &self.token_a
    }

    pub fn token_b(&self) -> &Token {
        &self.token_b
    }

    pub fn balance_a(&self) -> TokenAmount {
        self.balance_a
    }

    pub fn balance_b(&self) -> TokenAmount {
        self.balance_b
    }

    pub fn total_lp_tokens(&self) -> TokenAmount {
        self.total_lp_tokens
    }

    pub fn fee(&self) -> Percentage {
        self.fee
    }

    pub fn token(&self, side: PoolSide) -> &Token {
        match side {
            PoolSide::A => &self.token_a,
            PoolSide::B => &self.token_b,
        }
    }

    pub fn balance(&self, side: PoolSide) -> TokenAmount {
        match side {
            PoolSide::A => self.balance_a,
            PoolSide::B => self.balance_b,
        }
    }

    /// `(input_reserve, output_reserve)` for a swap in `direction`.
    pub fn reserves(&self, direction: SwapDirection) -> (TokenAmount, TokenAmount) {
        (
            self.balance(direction.input_side()),
            self.balance(direction.output_side()),
        )
    }

    /// Resolves a token symbol to the side of the pool holding it.
    pub fn side_of(&self, symbol: &str) -> Option<PoolSide> {
        if self.token_a.symbol == symbol {
            Some(PoolSide::A)
        } else if self.token_b.symbol == symbol {
            Some(PoolSide::B)
        } else {
            None
        }
    }

    /// Swap direction when selling `symbol`.
    pub fn direction_from(&self, symbol: &str) -> Option<SwapDirection> {
        self.side_of(symbol).map(|side| match side {
            PoolSide::A => SwapDirection::AToB,
            PoolSide::B => SwapDirection::BToA,
        })
    }

    /// True while no LP shares are outstanding.
    pub fn is_empty(&self) -> bool {
        self.total_lp_tokens.is_zero()
    }

    /// The constant product `balance_a * balance_b`, in base units squared.
    pub fn k(&self) -> U512 {
        self.balance_a.0.full_mul(self.balance_b.0)
    }

    /// Same reserves under a different fee.
    pub fn with_fee(self, fee: Percentage) -> Result<Self, AmmError> {
        Self::try_from(PoolSnapshot {
            fee,
            ..PoolSnapshot::from(self)
        })
    }

    /// Successor snapshot produced by a transition. The math guarantees the
    /// invariants, so only debug builds re-check them.
    pub(crate) fn successor(
        &self,
        balance_a: TokenAmount,
        balance_b: TokenAmount,
        total_lp_tokens: TokenAmount,
    ) -> Self {
        let next = Self {
            token_a: self.token_a.clone(),
            token_b: self.token_b.clone(),
            balance_a,
            balance_b,
            total_lp_tokens,
            fee: self.fee,
        };
        debug_assert!(next.check_reserves().is_ok(), "transition broke pool invariants");
        next
    }

    fn check_reserves(&self) -> Result<(), AmmError> {
        if self.total_lp_tokens.is_zero() {
            if !self.balance_a.is_zero() || !self.balance_b.is_zero() {
                return Err(AmmError::InvalidPool(
                    "reserves must be zero when no LP tokens are outstanding",
                ));
            }
        } else if self.balance_a.is_zero() || self.balance_b.is_zero() {
            return Err(AmmError::InvalidPool(
                "reserves must be positive while LP tokens are outstanding",
            ));
        }
        Ok(())
    }
}

impl TryFrom<PoolSnapshot> for Pool {
    type Error = AmmError;

    fn try_from(snapshot: PoolSnapshot) -> Result<Self, Self::Error> {
        let fee = snapshot.fee.value();
        if fee < Decimal::ZERO || fee >= Decimal::ONE_HUNDRED {
            return Err(AmmError::InvalidFee(fee));
        }
        if snapshot.token_a.symbol == snapshot.token_b.symbol {
            return Err(AmmError::InvalidPool("token symbols must differ"));
        }

        let pool = Self {
            token_a: snapshot.token_a,
            token_b: snapshot.token_b,
            balance_a: snapshot.balance_a,
            balance_b: snapshot.balance_b,
            total_lp_tokens: snapshot.total_lp_tokens,
            fee: snapshot.fee,
        };
        pool.check_reserves()?;
        Ok(pool)
    }
}

impl From<Pool> for PoolSnapshot {
    fn from(pool: Pool) -> Self {
        Self {
            token_a: pool.token_a,
            token_b: pool.token_b,
            balance_a: pool.balance_a,
            balance_b: pool.balance_b,
            total_lp_tokens: pool.total_lp_tokens,
            fee: pool.fee,
        }
    }
}
