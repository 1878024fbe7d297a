//! Simulated user wallet holding both pool tokens and LP tokens.

use crate::error::SessionError;
use cpamm_domain::enums::PoolSide;
use cpamm_domain::error::AmmError;
use cpamm_domain::token::TokenAmount;
use serde::{Deserialize, Serialize};

/// Connection state of the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletStatus {
    Connected,
    Disconnected,
    Connecting,
    Error,
}

/// Something a wallet can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    Token(PoolSide),
    LpToken,
}

impl From<PoolSide> for Asset {
    fn from(side: PoolSide) -> Self {
        Asset::Token(side)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    status: WalletStatus,
    address: Option<String>,
    error: Option<String>,
    balance_a: TokenAmount,
    balance_b: TokenAmount,
    lp_balance: TokenAmount,
}

impl Wallet {
    /// Creates a disconnected wallet with the given holdings.
    pub fn new(balance_a: TokenAmount, balance_b: TokenAmount, lp_balance: TokenAmount) -> Self {
        Self {
            status: WalletStatus::Disconnected,
            address: None,
            error: None,
            balance_a,
            balance_b,
            lp_balance,
        }
    }

    pub fn status(&self) -> WalletStatus {
        self.status
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.status == WalletStatus::Connected
    }

    pub fn begin_connect(&mut self) {
        self.status = WalletStatus::Connecting;
        self.error = None;
    }

    pub fn connect(&mut self, address: impl Into<String>) {
        self.status = WalletStatus::Connected;
        self.address = Some(address.into());
        self.error = None;
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = WalletStatus::Error;
        self.address = None;
        self.error = Some(reason.into());
    }

    pub fn disconnect(&mut self) {
        self.status = WalletStatus::Disconnected;
        self.address = None;
        self.error = None;
    }

    pub fn balance(&self, asset: impl Into<Asset>) -> TokenAmount {
        match asset.into() {
            Asset::Token(PoolSide::A) => self.balance_a,
            Asset::Token(PoolSide::B) => self.balance_b,
            Asset::LpToken => self.lp_balance,
        }
    }

    fn slot(&mut self, asset: Asset) -> &mut TokenAmount {
        match asset {
            Asset::Token(PoolSide::A) => &mut self.balance_a,
            Asset::Token(PoolSide::B) => &mut self.balance_b,
            Asset::LpToken => &mut self.lp_balance,
        }
    }

    /// Fails unless the wallet holds at least `amount` of `asset`.
    pub fn ensure_covers(
        &self,
        asset: impl Into<Asset>,
        amount: TokenAmount,
        symbol: &str,
    ) -> Result<(), SessionError> {
        if self.balance(asset) < amount {
            return Err(SessionError::InsufficientBalance {
                symbol: symbol.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn debit(
        &mut self,
        asset: impl Into<Asset>,
        amount: TokenAmount,
        symbol: &str,
    ) -> Result<(), SessionError> {
        let slot = self.slot(asset.into());
        *slot = slot
            .checked_sub(amount)
            .ok_or_else(|| SessionError::InsufficientBalance {
                symbol: symbol.to_string(),
            })?;
        Ok(())
    }

    pub(crate) fn credit(
        &mut self,
        asset: impl Into<Asset>,
        amount: TokenAmount,
    ) -> Result<(), SessionError> {
        let slot = self.slot(asset.into());
        *slot = slot.checked_add(amount).ok_or(AmmError::Overflow)?;
        Ok(())
    }
}
