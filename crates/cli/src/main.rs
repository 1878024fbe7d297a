//! Command Line Interface for the constant-product pool simulator.
mod commands;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::SettingsUpdate;
use cpamm_simulation::prelude::*;
use dotenv::dotenv;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "cpamm")]
#[command(about = "Constant-product AMM pool simulator", long_about = None)]
struct Cli {
    /// Session state file
    #[arg(long, env = "CPAMM_STATE", default_value = store::DEFAULT_STATE_FILE, global = true)]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh demo session (1000 ALPHA / 1000 BETA)
    Init {
        /// Pool fee in percent (e.g., 0.3)
        #[arg(long)]
        fee: Option<Decimal>,

        /// Slippage tolerance in percent
        #[arg(long)]
        slippage: Option<Decimal>,

        /// Price impact in percent above which swaps are rejected
        #[arg(long)]
        max_impact: Option<Decimal>,
    },
    /// Show pool reserves, prices and wallet balances
    Stats,
    /// Connect the session wallet
    Connect {
        /// Wallet address
        #[arg(long, default_value = DEMO_WALLET_ADDRESS)]
        address: String,
    },
    /// Disconnect the session wallet
    Disconnect,
    /// Show or change the trade settings
    Settings {
        /// Slippage tolerance in percent (e.g., 0.5)
        #[arg(long)]
        slippage: Option<Decimal>,

        /// Price impact in percent above which swaps are rejected
        #[arg(long)]
        max_impact: Option<Decimal>,
    },
    /// Preview a swap without executing it
    QuoteSwap {
        /// Symbol of the token being sold
        #[arg(long)]
        from: String,

        /// Amount to sell
        #[arg(long)]
        amount: String,
    },
    /// Sell tokens into the pool
    Swap {
        /// Symbol of the token being sold
        #[arg(long)]
        from: String,

        /// Amount to sell
        #[arg(long)]
        amount: String,
    },
    /// Preview a deposit for a given amount of token A
    QuoteAdd {
        /// Token A amount
        #[arg(long)]
        amount_a: String,
    },
    /// Deposit both tokens and receive LP tokens
    AddLiquidity {
        /// Token A amount
        #[arg(long)]
        amount_a: String,

        /// Token B amount; required to seed an empty pool, otherwise derived
        /// from the pool ratio and checked when given
        #[arg(long)]
        amount_b: Option<String>,
    },
    /// Preview burning LP tokens
    QuoteRemove {
        /// LP tokens to burn
        #[arg(long)]
        lp: String,
    },
    /// Burn LP tokens and withdraw both tokens
    RemoveLiquidity {
        /// LP tokens to burn
        #[arg(long)]
        lp: String,
    },
    /// List recorded session events
    History {
        /// Only show events of this kind
        #[arg(long, value_enum)]
        kind: Option<EventKind>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EventKind {
    Swap,
    LiquidityAdded,
    LiquidityRemoved,
    WalletConnected,
    WalletDisconnected,
}

impl From<EventKind> for SessionEventType {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Swap => SessionEventType::Swap,
            EventKind::LiquidityAdded => SessionEventType::LiquidityAdded,
            EventKind::LiquidityRemoved => SessionEventType::LiquidityRemoved,
            EventKind::WalletConnected => SessionEventType::WalletConnected,
            EventKind::WalletDisconnected => SessionEventType::WalletDisconnected,
        }
    }
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cpamm_simulation=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let report = match &cli.command {
        Commands::Init {
            fee,
            slippage,
            max_impact,
        } => {
            let update = SettingsUpdate {
                slippage: *slippage,
                max_impact: *max_impact,
            };
            let session = commands::init(*fee, &update)?;
            store::save(&cli.state, &session)?;
            format!(
                "✅ Session created at {}\n{}",
                cli.state.display(),
                commands::stats(&session)
            )
        }
        Commands::Stats => commands::stats(&store::load(&cli.state)?),
        Commands::Connect { address } => {
            let mut session = store::load(&cli.state)?;
            let report = commands::connect(&mut session, address);
            store::save(&cli.state, &session)?;
            report
        }
        Commands::Disconnect => {
            let mut session = store::load(&cli.state)?;
            let report = commands::disconnect(&mut session);
            store::save(&cli.state, &session)?;
            report
        }
        Commands::Settings {
            slippage,
            max_impact,
        } => {
            let update = SettingsUpdate {
                slippage: *slippage,
                max_impact: *max_impact,
            };
            let mut session = store::load(&cli.state)?;
            let report = commands::settings(&mut session, &update)?;
            if !update.is_empty() {
                store::save(&cli.state, &session)?;
            }
            report
        }
        Commands::QuoteSwap { from, amount } => {
            commands::quote_swap(&store::load(&cli.state)?, from, amount)?
        }
        Commands::Swap { from, amount } => {
            let mut session = store::load(&cli.state)?;
            let report = commands::swap(&mut session, from, amount)?;
            store::save(&cli.state, &session)?;
            report
        }
        Commands::QuoteAdd { amount_a } => commands::quote_add(&store::load(&cli.state)?, amount_a),
        Commands::AddLiquidity { amount_a, amount_b } => {
            let mut session = store::load(&cli.state)?;
            let report = commands::add_liquidity(&mut session, amount_a, amount_b.as_deref())?;
            store::save(&cli.state, &session)?;
            report
        }
        Commands::QuoteRemove { lp } => commands::quote_remove(&store::load(&cli.state)?, lp),
        Commands::RemoveLiquidity { lp } => {
            let mut session = store::load(&cli.state)?;
            let report = commands::remove_liquidity(&mut session, lp)?;
            store::save(&cli.state, &session)?;
            report
        }
        Commands::History { kind } => {
            commands::history(&store::load(&cli.state)?, kind.map(SessionEventType::from))
        }
    };

    println!("{}", report);
    Ok(())
}
