use cpamm_domain::error::AmmError;
use cpamm_domain::value_objects::Percentage;
use thiserror::Error;

/// Reasons a session refuses a user operation.
///
/// Unlike the engine, the session validates input against the wallet and
/// reports failures instead of silently doing nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("wallet is not connected")]
    WalletNotConnected,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("insufficient {symbol} balance")]
    InsufficientBalance { symbol: String },

    #[error("price impact {impact} exceeds the {max} limit")]
    PriceImpactTooHigh { impact: Percentage, max: Percentage },

    #[error("unknown token: {0}")]
    UnknownToken(String),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("operation would not change the pool")]
    NoOp,

    #[error(transparent)]
    Amm(#[from] AmmError),
}
