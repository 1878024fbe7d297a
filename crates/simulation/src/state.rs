//! Session configuration and user settings.
//!
//! This module provides the starting state of a session (pool and wallet) and
//! the user-tunable trade settings applied on top of the engine quotes.

use crate::error::SessionError;
use crate::wallet::Wallet;
use cpamm_domain::pool::Pool;
use cpamm_domain::token::{Token, TokenAmount};
use cpamm_domain::value_objects::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Address the demo wallet connects with.
pub const DEMO_WALLET_ADDRESS: &str = "0x1234...5678";

/// First token of the demo pool.
#[must_use]
pub fn alpha_token() -> Token {
    Token::new("Alpha", "ALPHA", 18)
}

/// Second token of the demo pool.
#[must_use]
pub fn beta_token() -> Token {
    Token::new("Beta", "BETA", 18)
}

/// How far a swap's execution price strays from the spot price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImpactLevel {
    /// Below the caution threshold.
    Low,
    /// Noticeable, worth a second look.
    Caution,
    /// Large; the trade goes through but should be flagged.
    Warning,
    /// Above the configured maximum; the session refuses the swap.
    Blocked,
}

/// User-tunable trade settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Slippage tolerance used for the minimum-received figure.
    pub slippage: Percentage,
    /// Swaps with a larger price impact are rejected.
    pub max_price_impact: Percentage,
    /// Impact above which a swap is flagged as a warning.
    pub impact_warning: Percentage,
    /// Impact above which a swap is flagged for caution.
    pub impact_caution: Percentage,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            slippage: Percentage::new(Decimal::new(5, 1)),       // 0.5%
            max_price_impact: Percentage::new(Decimal::from(15)), // 15%
            impact_warning: Percentage::new(Decimal::from(5)),
            impact_caution: Percentage::new(Decimal::from(2)),
        }
    }
}

impl SessionSettings {
    /// Sets the slippage tolerance. Must lie in (0, 100].
    pub fn with_slippage(mut self, slippage: Decimal) -> Result<Self, SessionError> {
        if slippage <= Decimal::ZERO || slippage > Decimal::ONE_HUNDRED {
            return Err(SessionError::InvalidSetting(format!(
                "slippage must be in (0, 100], got {slippage}"
            )));
        }
        self.slippage = Percentage::new(slippage);
        Ok(self)
    }

    /// Sets the price impact above which swaps are rejected.
    pub fn with_max_price_impact(mut self, max: Decimal) -> Result<Self, SessionError> {
        if max <= Decimal::ZERO {
            return Err(SessionError::InvalidSetting(format!(
                "max price impact must be positive, got {max}"
            )));
        }
        self.max_price_impact = Percentage::new(max);
        Ok(self)
    }

    /// Classifies a price impact against the thresholds.
    #[must_use]
    pub fn classify(&self, impact: Percentage) -> ImpactLevel {
        if impact > self.max_price_impact {
            ImpactLevel::Blocked
        } else if impact > self.impact_warning {
            ImpactLevel::Warning
        } else if impact > self.impact_caution {
            ImpactLevel::Caution
        } else {
            ImpactLevel::Low
        }
    }
}

/// Starting state of a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Initial pool snapshot.
    pub pool: Pool,
    /// Initial wallet holdings.
    pub wallet: Wallet,
    /// Trade settings.
    pub settings: SessionSettings,
}

impl SessionConfig {
    /// Creates a config from an existing pool and wallet with default settings.
    #[must_use]
    pub fn new(pool: Pool, wallet: Wallet) -> Self {
        Self {
            pool,
            wallet,
            settings: SessionSettings::default(),
        }
    }

    /// ALPHA/BETA pool seeded with 1000 of each and 1000 LP tokens at a 0.3%
    /// fee, plus a wallet holding 10000 of each token.
    pub fn demo() -> Result<Self, SessionError> {
        let pool = Pool::new(alpha_token(), beta_token(), Percentage::new(Decimal::new(3, 1)))?
            .with_liquidity(
                TokenAmount::from_tokens(1000),
                TokenAmount::from_tokens(1000),
                TokenAmount::from_tokens(1000),
            )?;
        let wallet = Wallet::new(
            TokenAmount::from_tokens(10_000),
            TokenAmount::from_tokens(10_000),
            TokenAmount::zero(),
        );
        Ok(Self::new(pool, wallet))
    }

    /// Replaces the pool fee.
    pub fn with_fee(mut self, fee: Decimal) -> Result<Self, SessionError> {
        self.pool = self.pool.with_fee(Percentage::new(fee))?;
        Ok(self)
    }

    /// Sets the trade settings.
    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }
}
