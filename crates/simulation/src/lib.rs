//! Interactive session layer over the constant-product pool engine.
//!
//! This crate provides the caller-side state a trading front end needs:
//! - Simulated wallet with connection status and balances
//! - Trade settings (slippage, price impact limits)
//! - Session that validates input, applies engine transitions and settles the wallet
//! - Event log of every accepted operation

/// Prelude module for convenient imports.
pub mod prelude;

/// Session errors.
pub mod error;
/// Session event log.
pub mod event;
/// Pool session.
pub mod session;
/// Session configuration and settings.
pub mod state;
/// Simulated wallet.
pub mod wallet;
