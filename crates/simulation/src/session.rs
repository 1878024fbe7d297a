//! Pool session: the caller-side state holder around the pure engine.
//!
//! A session owns the current pool snapshot, a simulated wallet and the trade
//! settings. It validates user input before calling the engine, replaces the
//! snapshot with the engine's successor, and settles the wallet.

use crate::error::SessionError;
use crate::event::{EventLog, SessionEvent};
use crate::state::{ImpactLevel, SessionConfig, SessionSettings};
use crate::wallet::{Asset, Wallet};
use cpamm_domain::engine::{self, WithdrawalQuote};
use cpamm_domain::enums::{PoolSide, SwapDirection};
use cpamm_domain::metrics::PoolStats;
use cpamm_domain::metrics::{fees, price_impact};
use cpamm_domain::pool::Pool;
use cpamm_domain::token::TokenAmount;
use cpamm_domain::value_objects::{Percentage, Price};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Symbol used for LP tokens in balance errors.
pub const LP_TOKEN_SYMBOL: &str = "LP";

/// What a swap would do at the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPreview {
    pub direction: SwapDirection,
    pub amount_in: TokenAmount,
    pub amount_out: TokenAmount,
    /// Part of the input kept by the pool.
    pub fee_paid: TokenAmount,
    /// Output per unit of input.
    pub rate: Option<Price>,
    pub price_impact: Option<Percentage>,
    pub impact_level: ImpactLevel,
    /// Output after the slippage tolerance.
    pub minimum_received: TokenAmount,
}

/// What a deposit would do at the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityPreview {
    pub amount_a: TokenAmount,
    pub amount_b: TokenAmount,
    pub lp_minted: TokenAmount,
    pub share_of_pool: Percentage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub direction: SwapDirection,
    pub from_symbol: String,
    pub to_symbol: String,
    pub amount_in: TokenAmount,
    pub amount_out: TokenAmount,
    pub price_impact: Option<Percentage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityReceipt {
    pub amount_a: TokenAmount,
    pub amount_b: TokenAmount,
    pub lp_minted: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityReceipt {
    pub lp_burned: TokenAmount,
    pub amount_a: TokenAmount,
    pub amount_b: TokenAmount,
}

/// Parses a user-entered amount, rejecting anything that is not strictly positive.
fn parse_positive(input: &str) -> Result<TokenAmount, SessionError> {
    let amount: TokenAmount = input
        .parse()
        .map_err(|_| SessionError::InvalidAmount(input.to_string()))?;
    if amount.is_zero() {
        return Err(SessionError::InvalidAmount(input.to_string()));
    }
    Ok(amount)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSession {
    pool: Pool,
    wallet: Wallet,
    settings: SessionSettings,
    log: EventLog,
}

impl PoolSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            pool: config.pool,
            wallet: config.wallet,
            settings: config.settings,
            log: EventLog::new(),
        }
    }

    /// Session over the demo ALPHA/BETA pool.
    pub fn demo() -> Result<Self, SessionError> {
        SessionConfig::demo().map(Self::new)
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats::from_pool(&self.pool)
    }

    pub fn set_settings(&mut self, settings: SessionSettings) {
        self.settings = settings;
    }

    pub fn connect_wallet(&mut self, address: impl Into<String>) {
        let address = address.into();
        self.wallet.begin_connect();
        self.wallet.connect(address.clone());
        info!(address = %address, "Wallet connected");

        let sequence = self.log.next_sequence();
        self.log
            .record(SessionEvent::wallet_connected(sequence, self.pool.clone(), address));
    }

    pub fn disconnect_wallet(&mut self) {
        self.wallet.disconnect();
        info!("Wallet disconnected");

        let sequence = self.log.next_sequence();
        self.log
            .record(SessionEvent::wallet_disconnected(sequence, self.pool.clone()));
    }

    fn ensure_connected(&self) -> Result<(), SessionError> {
        if !self.wallet.is_connected() {
            return Err(SessionError::WalletNotConnected);
        }
        Ok(())
    }

    fn direction_for(&self, from_symbol: &str) -> Result<SwapDirection, SessionError> {
        self.pool
            .direction_from(from_symbol)
            .ok_or_else(|| SessionError::UnknownToken(from_symbol.to_string()))
    }

    fn symbol(&self, side: PoolSide) -> String {
        self.pool.token(side).symbol.clone()
    }

    fn swap_preview(&self, direction: SwapDirection, amount_in: TokenAmount) -> SwapPreview {
        let amount_out = engine::quote_swap_output(&self.pool, amount_in, direction);
        let impact = price_impact::price_impact(&self.pool, amount_in, amount_out, direction);

        SwapPreview {
            direction,
            amount_in,
            amount_out,
            fee_paid: fees::calculate_swap_fee(amount_in, self.pool.fee())
                .unwrap_or_else(|_| TokenAmount::zero()),
            rate: price_impact::execution_rate(amount_in, amount_out),
            price_impact: impact,
            impact_level: impact.map_or(ImpactLevel::Low, |i| self.settings.classify(i)),
            minimum_received: price_impact::minimum_received(amount_out, self.settings.slippage)
                .unwrap_or_else(|_| TokenAmount::zero()),
        }
    }

    /// Quotes selling `amount` of `from_symbol`. Unparseable amounts preview
    /// as a zero trade.
    pub fn preview_swap(&self, from_symbol: &str, amount: &str) -> Result<SwapPreview, SessionError> {
        let direction = self.direction_for(from_symbol)?;
        let amount_in = parse_positive(amount).unwrap_or_else(|_| TokenAmount::zero());
        Ok(self.swap_preview(direction, amount_in))
    }

    /// Sells `amount` of `from_symbol` from the wallet into the pool.
    pub fn swap(&mut self, from_symbol: &str, amount: &str) -> Result<SwapReceipt, SessionError> {
        self.ensure_connected()?;
        let direction = self.direction_for(from_symbol)?;
        let amount_in = parse_positive(amount)?;

        let input_side = direction.input_side();
        let output_side = direction.output_side();
        self.wallet.ensure_covers(input_side, amount_in, from_symbol)?;

        let preview = self.swap_preview(direction, amount_in);
        if preview.impact_level == ImpactLevel::Blocked {
            let impact = preview.price_impact.unwrap_or(Percentage::ZERO);
            warn!(%impact, max = %self.settings.max_price_impact, "Swap rejected: price impact too high");
            return Err(SessionError::PriceImpactTooHigh {
                impact,
                max: self.settings.max_price_impact,
            });
        }

        let outcome = engine::apply_swap(&self.pool, amount_in, direction);
        if outcome.pool == self.pool {
            debug!(%direction, %amount_in, "Swap would not change the pool");
            return Err(SessionError::NoOp);
        }

        let mut wallet = self.wallet.clone();
        wallet.debit(input_side, amount_in, from_symbol)?;
        wallet.credit(output_side, outcome.amount_out)?;

        let receipt = SwapReceipt {
            direction,
            from_symbol: from_symbol.to_string(),
            to_symbol: self.symbol(output_side),
            amount_in,
            amount_out: outcome.amount_out,
            price_impact: preview.price_impact,
        };

        info!(
            from = %receipt.from_symbol,
            to = %receipt.to_symbol,
            amount_in = %amount_in,
            amount_out = %outcome.amount_out,
            "Swap executed"
        );

        let sequence = self.log.next_sequence();
        self.log.record(SessionEvent::swap(
            sequence,
            outcome.pool.clone(),
            direction,
            amount_in,
            outcome.amount_out,
            preview.price_impact,
        ));
        self.wallet = wallet;
        self.pool = outcome.pool;

        Ok(receipt)
    }

    fn add_liquidity_preview(&self, amount_a: TokenAmount, amount_b: TokenAmount) -> AddLiquidityPreview {
        let lp_minted = engine::quote_lp_minted(&self.pool, amount_a, amount_b);
        AddLiquidityPreview {
            amount_a,
            amount_b,
            lp_minted,
            share_of_pool: price_impact::share_of_pool(&self.pool, lp_minted),
        }
    }

    /// Quotes depositing `amount_a` of token A with the matching token B.
    pub fn preview_add_liquidity(&self, amount_a: &str) -> AddLiquidityPreview {
        let amount_a = parse_positive(amount_a).unwrap_or_else(|_| TokenAmount::zero());
        let amount_b = engine::quote_required_counterpart(&self.pool, amount_a);
        self.add_liquidity_preview(amount_a, amount_b)
    }

    /// Quotes a deposit when the token B side is entered first.
    pub fn preview_add_liquidity_from_b(&self, amount_b: &str) -> AddLiquidityPreview {
        let amount_b = parse_positive(amount_b).unwrap_or_else(|_| TokenAmount::zero());
        let amount_a = engine::quote_counterpart_for_b(&self.pool, amount_b);
        self.add_liquidity_preview(amount_a, amount_b)
    }

    /// Deposits both tokens from the wallet and credits the minted LP tokens.
    ///
    /// Only the bootstrap deposit into an empty pool chooses its own token B
    /// amount. Once the pool has a ratio, token B is derived from `amount_a`;
    /// an explicit `amount_b` is accepted only if it matches that derivation.
    pub fn add_liquidity(
        &mut self,
        amount_a: &str,
        amount_b: Option<&str>,
    ) -> Result<AddLiquidityReceipt, SessionError> {
        self.ensure_connected()?;
        let amount_a = parse_positive(amount_a)?;
        let amount_b = if self.pool.is_empty() {
            match amount_b {
                Some(input) => parse_positive(input)?,
                None => {
                    return Err(SessionError::InvalidAmount(format!(
                        "{} amount is required to seed an empty pool",
                        self.symbol(PoolSide::B)
                    )));
                }
            }
        } else {
            let required = engine::quote_required_counterpart(&self.pool, amount_a);
            if required.is_zero() {
                return Err(SessionError::InvalidAmount(amount_a.to_string()));
            }
            if let Some(input) = amount_b {
                if parse_positive(input)? != required {
                    warn!(
                        given = input,
                        %required,
                        "Deposit rejected: token B amount does not match the pool ratio"
                    );
                    return Err(SessionError::InvalidAmount(format!(
                        "{} amount must be {} to match the pool ratio, got {}",
                        self.symbol(PoolSide::B),
                        required,
                        input
                    )));
                }
            }
            required
        };

        let symbol_a = self.symbol(PoolSide::A);
        let symbol_b = self.symbol(PoolSide::B);
        self.wallet.ensure_covers(PoolSide::A, amount_a, &symbol_a)?;
        self.wallet.ensure_covers(PoolSide::B, amount_b, &symbol_b)?;

        let outcome = engine::apply_add_liquidity(&self.pool, amount_a, amount_b);
        if outcome.lp_minted.is_zero() {
            debug!(%amount_a, %amount_b, "Deposit would not mint LP tokens");
            return Err(SessionError::NoOp);
        }

        let mut wallet = self.wallet.clone();
        wallet.debit(PoolSide::A, amount_a, &symbol_a)?;
        wallet.debit(PoolSide::B, amount_b, &symbol_b)?;
        wallet.credit(Asset::LpToken, outcome.lp_minted)?;

        info!(
            amount_a = %amount_a,
            amount_b = %amount_b,
            lp_minted = %outcome.lp_minted,
            "Liquidity added"
        );

        let sequence = self.log.next_sequence();
        self.log.record(SessionEvent::liquidity_added(
            sequence,
            outcome.pool.clone(),
            amount_a,
            amount_b,
            outcome.lp_minted,
        ));
        self.wallet = wallet;
        self.pool = outcome.pool;

        Ok(AddLiquidityReceipt {
            amount_a,
            amount_b,
            lp_minted: outcome.lp_minted,
        })
    }

    /// Quotes burning `lp_amount` LP tokens.
    pub fn preview_remove_liquidity(&self, lp_amount: &str) -> WithdrawalQuote {
        engine::quote_remove_liquidity(&self.pool, lp_amount)
    }

    /// Burns LP tokens from the wallet and credits the released reserves.
    pub fn remove_liquidity(&mut self, lp_amount: &str) -> Result<RemoveLiquidityReceipt, SessionError> {
        self.ensure_connected()?;
        let lp_amount = parse_positive(lp_amount)?;
        self.wallet
            .ensure_covers(Asset::LpToken, lp_amount, LP_TOKEN_SYMBOL)?;

        let outcome = engine::apply_remove_liquidity(&self.pool, lp_amount);
        if outcome.pool == self.pool {
            debug!(%lp_amount, "Withdrawal would not change the pool");
            return Err(SessionError::NoOp);
        }

        let mut wallet = self.wallet.clone();
        wallet.debit(Asset::LpToken, lp_amount, LP_TOKEN_SYMBOL)?;
        wallet.credit(PoolSide::A, outcome.amount_a)?;
        wallet.credit(PoolSide::B, outcome.amount_b)?;

        info!(
            lp_burned = %lp_amount,
            amount_a = %outcome.amount_a,
            amount_b = %outcome.amount_b,
            "Liquidity removed"
        );

        let sequence = self.log.next_sequence();
        self.log.record(SessionEvent::liquidity_removed(
            sequence,
            outcome.pool.clone(),
            outcome.amount_a,
            outcome.amount_b,
            lp_amount,
        ));
        self.wallet = wallet;
        self.pool = outcome.pool;

        Ok(RemoveLiquidityReceipt {
            lp_burned: lp_amount,
            amount_a: outcome.amount_a,
            amount_b: outcome.amount_b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SessionEventType;
    use crate::state::{DEMO_WALLET_ADDRESS, alpha_token, beta_token};
    use rust_decimal_macros::dec;

    fn connected() -> PoolSession {
        let mut session = PoolSession::demo().unwrap();
        session.connect_wallet(DEMO_WALLET_ADDRESS);
        session
    }

    fn amount(s: &str) -> TokenAmount {
        s.parse().unwrap()
    }

    #[test]
    fn test_operations_require_connection() {
        let mut session = PoolSession::demo().unwrap();
        assert_eq!(session.swap("ALPHA", "10"), Err(SessionError::WalletNotConnected));
        assert_eq!(
            session.add_liquidity("10", None),
            Err(SessionError::WalletNotConnected)
        );
        assert_eq!(
            session.remove_liquidity("1"),
            Err(SessionError::WalletNotConnected)
        );
        assert!(session.log().is_empty());
    }

    #[test]
    fn test_preview_swap() {
        let session = PoolSession::demo().unwrap();
        let preview = session.preview_swap("ALPHA", "10").unwrap();

        assert_eq!(preview.direction, SwapDirection::AToB);
        assert_eq!(preview.amount_out, amount("9.871580343970612988"));
        assert_eq!(preview.fee_paid, amount("0.03"));
        assert_eq!(preview.minimum_received, amount("9.822222442250759923"));
        assert_eq!(preview.impact_level, ImpactLevel::Low);

        let empty = session.preview_swap("BETA", "").unwrap();
        assert!(empty.amount_out.is_zero());
        assert_eq!(empty.price_impact, None);

        assert_eq!(
            session.preview_swap("GAMMA", "1"),
            Err(SessionError::UnknownToken("GAMMA".to_string()))
        );
    }

    #[test]
    fn test_slippage_setting_changes_minimum_received() {
        let mut session = PoolSession::demo().unwrap();
        let settings = session.settings().with_slippage(dec!(1)).unwrap();
        session.set_settings(settings);

        let preview = session.preview_swap("ALPHA", "10").unwrap();
        assert_eq!(preview.amount_out, amount("9.871580343970612988"));
        assert_eq!(preview.minimum_received, amount("9.772864540530906858"));
    }

    #[test]
    fn test_swap_settles_wallet_and_pool() {
        let mut session = connected();
        let receipt = session.swap("ALPHA", "10").unwrap();

        assert_eq!(receipt.to_symbol, "BETA");
        assert_eq!(receipt.amount_out, amount("9.871580343970612988"));
        assert_eq!(session.pool().balance_a(), TokenAmount::from_tokens(1010));
        assert_eq!(session.wallet().balance(PoolSide::A), TokenAmount::from_tokens(9990));
        assert_eq!(
            session.wallet().balance(PoolSide::B),
            amount("10009.871580343970612988")
        );
        assert_eq!(session.log().swap_count(), 1);
        assert_eq!(session.log().last().map(|e| &e.pool), Some(session.pool()));
    }

    #[test]
    fn test_swap_validation() {
        let mut session = connected();
        let before = session.pool().clone();

        assert_eq!(
            session.swap("ALPHA", "0"),
            Err(SessionError::InvalidAmount("0".to_string()))
        );
        assert_eq!(
            session.swap("ALPHA", "-3"),
            Err(SessionError::InvalidAmount("-3".to_string()))
        );
        assert_eq!(
            session.swap("BETA", "10000.5"),
            Err(SessionError::InsufficientBalance {
                symbol: "BETA".to_string()
            })
        );
        assert_eq!(session.pool(), &before);
    }

    #[test]
    fn test_swap_rejects_excessive_price_impact() {
        let mut session = connected();
        let err = session.swap("ALPHA", "500").unwrap_err();
        assert!(matches!(err, SessionError::PriceImpactTooHigh { .. }));
        assert_eq!(session.wallet().balance(PoolSide::A), TokenAmount::from_tokens(10_000));

        let relaxed = session.settings().with_max_price_impact(dec!(50)).unwrap();
        session.set_settings(relaxed);
        assert!(session.swap("ALPHA", "500").is_ok());
    }

    #[test]
    fn test_add_liquidity_derives_counterpart() {
        let mut session = connected();
        let preview = session.preview_add_liquidity("100");
        assert_eq!(preview.amount_b, TokenAmount::from_tokens(100));
        assert_eq!(preview.lp_minted, TokenAmount::from_tokens(100));
        assert_eq!(preview.share_of_pool.value().round_dp(4), dec!(9.0909));

        let receipt = session.add_liquidity("100", None).unwrap();
        assert_eq!(receipt.lp_minted, TokenAmount::from_tokens(100));
        assert_eq!(session.wallet().balance(Asset::LpToken), TokenAmount::from_tokens(100));
        assert_eq!(session.wallet().balance(PoolSide::B), TokenAmount::from_tokens(9900));
        assert_eq!(session.pool().total_lp_tokens(), TokenAmount::from_tokens(1100));
    }

    #[test]
    fn test_add_liquidity_rejects_off_ratio_amount_b() {
        let mut session = connected();
        let before = session.pool().clone();

        assert!(matches!(
            session.add_liquidity("100", Some("500")),
            Err(SessionError::InvalidAmount(_))
        ));
        assert_eq!(session.pool(), &before);
        assert_eq!(session.wallet().balance(PoolSide::B), TokenAmount::from_tokens(10_000));
        assert!(session.log().events_of_type(SessionEventType::LiquidityAdded).is_empty());

        // Matching the derived amount is accepted and round trips exactly.
        let receipt = session.add_liquidity("100", Some("100")).unwrap();
        assert_eq!(receipt.amount_b, TokenAmount::from_tokens(100));
        session.remove_liquidity("100").unwrap();
        assert_eq!(session.wallet().balance(PoolSide::B), TokenAmount::from_tokens(10_000));
    }

    #[test]
    fn test_preview_from_b_side() {
        let session = PoolSession::demo().unwrap();
        let preview = session.preview_add_liquidity_from_b("40");
        assert_eq!(preview.amount_a, TokenAmount::from_tokens(40));
        assert_eq!(preview.lp_minted, TokenAmount::from_tokens(40));
    }

    #[test]
    fn test_remove_liquidity_round_trip() {
        let mut session = connected();
        session.add_liquidity("100", None).unwrap();

        assert_eq!(
            session.preview_remove_liquidity("50"),
            WithdrawalQuote {
                amount_a: TokenAmount::from_tokens(50),
                amount_b: TokenAmount::from_tokens(50),
            }
        );

        let receipt = session.remove_liquidity("100").unwrap();
        assert_eq!(receipt.amount_a, TokenAmount::from_tokens(100));
        assert_eq!(session.pool().total_lp_tokens(), TokenAmount::from_tokens(1000));
        assert_eq!(session.wallet().balance(PoolSide::A), TokenAmount::from_tokens(10_000));
        assert!(session.wallet().balance(Asset::LpToken).is_zero());

        assert_eq!(
            session.remove_liquidity("1"),
            Err(SessionError::InsufficientBalance {
                symbol: LP_TOKEN_SYMBOL.to_string()
            })
        );
    }

    #[test]
    fn test_bootstrap_empty_pool() {
        let pool = Pool::new(alpha_token(), beta_token(), Percentage::new(dec!(0.3))).unwrap();
        let wallet = Wallet::new(
            TokenAmount::from_tokens(500),
            TokenAmount::from_tokens(500),
            TokenAmount::zero(),
        );
        let mut session = PoolSession::new(SessionConfig::new(pool, wallet));
        session.connect_wallet("0xfeed");

        assert!(matches!(
            session.add_liquidity("100", None),
            Err(SessionError::InvalidAmount(_))
        ));

        let receipt = session.add_liquidity("100", Some("400")).unwrap();
        assert_eq!(receipt.lp_minted, TokenAmount::from_tokens(200));

        let receipt = session.remove_liquidity("200").unwrap();
        assert_eq!(receipt.amount_b, TokenAmount::from_tokens(400));
        assert!(session.pool().is_empty());
        assert_eq!(session.wallet().balance(PoolSide::B), TokenAmount::from_tokens(500));
    }

    #[test]
    fn test_event_log_tracks_operations() {
        let mut session = connected();
        session.swap("BETA", "1").unwrap();
        session.add_liquidity("10", None).unwrap();
        session.disconnect_wallet();

        let types: Vec<_> = session.log().events().iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                SessionEventType::WalletConnected,
                SessionEventType::Swap,
                SessionEventType::LiquidityAdded,
                SessionEventType::WalletDisconnected,
            ]
        );
    }

    #[test]
    fn test_session_survives_serialization() {
        let mut session = connected();
        session.swap("ALPHA", "10").unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let restored: PoolSession = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.pool(), session.pool());
        assert_eq!(restored.wallet(), session.wallet());
        assert_eq!(restored.log().len(), 2);
        assert!(restored.wallet().is_connected());
    }
}
