//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use cpamm_simulation::prelude::*;
//! ```

// Errors
pub use crate::error::SessionError;

// Events
pub use crate::event::{EventData, EventLog, SessionEvent, SessionEventType};

// Session
pub use crate::session::{
    AddLiquidityPreview, AddLiquidityReceipt, LP_TOKEN_SYMBOL, PoolSession,
    RemoveLiquidityReceipt, SwapPreview, SwapReceipt,
};

// State management
pub use crate::state::{
    DEMO_WALLET_ADDRESS, ImpactLevel, SessionConfig, SessionSettings, alpha_token, beta_token,
};

// Wallet
pub use crate::wallet::{Asset, Wallet, WalletStatus};
