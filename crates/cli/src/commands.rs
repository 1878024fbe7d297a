//! Per-subcommand handlers.
//!
//! Each handler works on an in-memory [`PoolSession`] and returns the report
//! to print; loading and saving the state file stays in `main`.

use anyhow::{Context, Result};
use cpamm_domain::enums::PoolSide;
use cpamm_domain::metrics::PoolStats;
use cpamm_domain::token::TokenAmount;
use cpamm_simulation::prelude::*;
use prettytable::{Table, row};
use primitive_types::U512;
use rust_decimal::Decimal;

const RULE: &str = "════════════════════════════════════";

/// Optional changes to the trade settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsUpdate {
    pub slippage: Option<Decimal>,
    pub max_impact: Option<Decimal>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.slippage.is_none() && self.max_impact.is_none()
    }

    pub fn apply(&self, mut settings: SessionSettings) -> Result<SessionSettings, SessionError> {
        if let Some(slippage) = self.slippage {
            settings = settings.with_slippage(slippage)?;
        }
        if let Some(max) = self.max_impact {
            settings = settings.with_max_price_impact(max)?;
        }
        Ok(settings)
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// `k` in whole tokens squared.
fn k_in_tokens(k: U512) -> U512 {
    let unit = U512::from(TokenAmount::unit());
    k / (unit * unit)
}

/// Fresh demo session with an optional fee and settings override.
pub fn init(fee: Option<Decimal>, update: &SettingsUpdate) -> Result<PoolSession> {
    let mut config = SessionConfig::demo()?;
    if let Some(fee) = fee {
        config = config.with_fee(fee)?;
    }
    let settings = update.apply(config.settings)?;
    Ok(PoolSession::new(config.with_settings(settings)))
}

pub fn stats(session: &PoolSession) -> String {
    let pool = session.pool();
    let stats = PoolStats::from_pool(pool);
    let symbol_a = &pool.token_a().symbol;
    let symbol_b = &pool.token_b().symbol;

    let mut table = Table::new();
    table.add_row(row!["Reserve", symbol_a, stats.balance_a]);
    table.add_row(row!["Reserve", symbol_b, stats.balance_b]);
    table.add_row(row!["LP supply", "", stats.total_lp_tokens]);
    table.add_row(row!["Fee", "", stats.fee]);
    table.add_row(row![
        "Price",
        format!("1 {} =", symbol_a),
        format!("{} {}", or_dash(stats.price_a_in_b), symbol_b)
    ]);
    table.add_row(row![
        "Price",
        format!("1 {} =", symbol_b),
        format!("{} {}", or_dash(stats.price_b_in_a), symbol_a)
    ]);
    table.add_row(row!["Per LP", symbol_a, or_dash(stats.a_per_lp_token)]);
    table.add_row(row!["Per LP", symbol_b, or_dash(stats.b_per_lp_token)]);
    table.add_row(row!["k", "tokens²", k_in_tokens(stats.k)]);

    let wallet = session.wallet();
    let mut balances = Table::new();
    balances.add_row(row!["Address", or_dash(wallet.address())]);
    balances.add_row(row![symbol_a, wallet.balance(PoolSide::A)]);
    balances.add_row(row![symbol_b, wallet.balance(PoolSide::B)]);
    balances.add_row(row![LP_TOKEN_SYMBOL, wallet.balance(Asset::LpToken)]);

    format!(
        "\n📊 Pool {}/{}\n{}\n👛 Wallet ({:?})\n{}",
        symbol_a,
        symbol_b,
        table,
        wallet.status(),
        balances
    )
}

pub fn connect(session: &mut PoolSession, address: &str) -> String {
    session.connect_wallet(address);
    format!("🔌 Wallet connected: {}", address)
}

pub fn disconnect(session: &mut PoolSession) -> String {
    session.disconnect_wallet();
    "Wallet disconnected".to_string()
}

/// Applies `update` to the session settings, then reports them.
pub fn settings(session: &mut PoolSession, update: &SettingsUpdate) -> Result<String> {
    if !update.is_empty() {
        let settings = update.apply(*session.settings())?;
        session.set_settings(settings);
    }

    let settings = session.settings();
    let mut table = Table::new();
    table.add_row(row!["Slippage tolerance", settings.slippage]);
    table.add_row(row!["Max price impact", settings.max_price_impact]);
    table.add_row(row!["Impact warning", settings.impact_warning]);
    table.add_row(row!["Impact caution", settings.impact_caution]);
    Ok(format!("\n⚙️  Settings\n{}", table))
}

pub fn quote_swap(session: &PoolSession, from: &str, amount: &str) -> Result<String> {
    let preview = session.preview_swap(from, amount)?;
    let pool = session.pool();
    let symbol_in = &pool.token(preview.direction.input_side()).symbol;
    let symbol_out = &pool.token(preview.direction.output_side()).symbol;

    let mut lines = vec![
        format!("\n🔍 Swap Preview ({})", preview.direction),
        RULE.to_string(),
        format!("You pay:          {} {}", preview.amount_in, symbol_in),
        format!("You receive:      {} {}", preview.amount_out, symbol_out),
        format!(
            "Rate:             1 {} = {} {}",
            symbol_in,
            or_dash(preview.rate),
            symbol_out
        ),
        format!("Fee:              {} {}", preview.fee_paid, symbol_in),
        format!("Price impact:     {}", or_dash(preview.price_impact)),
        format!(
            "Minimum received: {} {} ({} slippage)",
            preview.minimum_received,
            symbol_out,
            session.settings().slippage
        ),
        RULE.to_string(),
    ];

    match preview.impact_level {
        ImpactLevel::Low => {}
        ImpactLevel::Caution => lines.push("⚠️  Noticeable price impact".to_string()),
        ImpactLevel::Warning => lines.push("⚠️  High price impact".to_string()),
        ImpactLevel::Blocked => lines.push(format!(
            "❌ Price impact above {}; this swap would be rejected",
            session.settings().max_price_impact
        )),
    }
    Ok(lines.join("\n"))
}

pub fn swap(session: &mut PoolSession, from: &str, amount: &str) -> Result<String> {
    let receipt = session
        .swap(from, amount)
        .with_context(|| format!("swap of {} {} failed", amount, from))?;

    let mut report = format!(
        "🔄 Swapped {} {} for {} {}",
        receipt.amount_in, receipt.from_symbol, receipt.amount_out, receipt.to_symbol
    );
    if let Some(impact) = receipt.price_impact {
        report.push_str(&format!("\nPrice impact: {}", impact));
    }
    Ok(report)
}

pub fn quote_add(session: &PoolSession, amount_a: &str) -> String {
    let preview = session.preview_add_liquidity(amount_a);
    let pool = session.pool();

    let requires = if pool.is_empty() {
        format!("Requires:       any {} amount (empty pool)", pool.token_b().symbol)
    } else {
        format!("Requires:       {} {}", preview.amount_b, pool.token_b().symbol)
    };
    [
        "\n💧 Deposit Preview".to_string(),
        RULE.to_string(),
        format!("Deposit:        {} {}", preview.amount_a, pool.token_a().symbol),
        requires,
        format!("LP minted:      {}", preview.lp_minted),
        format!("Share of pool:  {}", preview.share_of_pool),
        RULE.to_string(),
    ]
    .join("\n")
}

pub fn add_liquidity(
    session: &mut PoolSession,
    amount_a: &str,
    amount_b: Option<&str>,
) -> Result<String> {
    let receipt = session
        .add_liquidity(amount_a, amount_b)
        .context("add liquidity failed")?;
    let pool = session.pool();

    Ok(format!(
        "💧 Deposited {} {} + {} {}, received {} LP",
        receipt.amount_a,
        pool.token_a().symbol,
        receipt.amount_b,
        pool.token_b().symbol,
        receipt.lp_minted
    ))
}

pub fn quote_remove(session: &PoolSession, lp: &str) -> String {
    let quote = session.preview_remove_liquidity(lp);
    let pool = session.pool();

    format!(
        "Burning {} LP releases:\n  {} {}\n  {} {}",
        lp,
        quote.amount_a,
        pool.token_a().symbol,
        quote.amount_b,
        pool.token_b().symbol
    )
}

pub fn remove_liquidity(session: &mut PoolSession, lp: &str) -> Result<String> {
    let receipt = session
        .remove_liquidity(lp)
        .context("remove liquidity failed")?;
    let pool = session.pool();

    Ok(format!(
        "📤 Burned {} LP, received {} {} + {} {}",
        receipt.lp_burned,
        receipt.amount_a,
        pool.token_a().symbol,
        receipt.amount_b,
        pool.token_b().symbol
    ))
}

fn describe(event: &SessionEvent) -> String {
    let pool = &event.pool;
    match &event.data {
        EventData::Swap {
            direction,
            amount_in,
            amount_out,
            ..
        } => format!(
            "{} {} -> {} {}",
            amount_in,
            pool.token(direction.input_side()).symbol,
            amount_out,
            pool.token(direction.output_side()).symbol
        ),
        EventData::Liquidity {
            amount_a,
            amount_b,
            lp_tokens,
        } => format!(
            "{} {} + {} {} / {} LP",
            amount_a,
            pool.token_a().symbol,
            amount_b,
            pool.token_b().symbol,
            lp_tokens
        ),
        EventData::Wallet { address } => or_dash(address.as_deref()),
    }
}

/// Event table, optionally limited to one event type.
pub fn history(session: &PoolSession, kind: Option<SessionEventType>) -> String {
    let log = session.log();
    let events: Vec<&SessionEvent> = match kind {
        Some(kind) => log.events_of_type(kind),
        None => log.events().iter().collect(),
    };
    if events.is_empty() {
        return "No events recorded.".to_string();
    }

    let mut table = Table::new();
    table.add_row(row!["#", "Time", "Event", "Details", "Reserves"]);
    for event in &events {
        table.add_row(row![
            event.sequence,
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            format!("{:?}", event.event_type),
            describe(event),
            format!("{} / {}", event.pool.balance_a(), event.pool.balance_b())
        ]);
    }
    format!(
        "{}{} of {} events, {} swaps",
        table,
        events.len(),
        log.len(),
        log.swap_count()
    )
}
