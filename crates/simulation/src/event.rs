//! Session events for tracking what happened to the pool.
//!
//! Every accepted operation appends one event carrying the pool snapshot it
//! produced, so the log doubles as the chain of pool states.

use chrono::{DateTime, Utc};
use cpamm_domain::enums::SwapDirection;
use cpamm_domain::pool::Pool;
use cpamm_domain::token::TokenAmount;
use cpamm_domain::value_objects::Percentage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Types of events recorded by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEventType {
    /// Tokens were swapped through the pool.
    Swap,
    /// Liquidity was added to the pool.
    LiquidityAdded,
    /// Liquidity was removed from the pool.
    LiquidityRemoved,
    /// The wallet connected.
    WalletConnected,
    /// The wallet disconnected.
    WalletDisconnected,
}

/// Event-specific data payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventData {
    /// Swap event data.
    Swap {
        direction: SwapDirection,
        amount_in: TokenAmount,
        amount_out: TokenAmount,
        price_impact: Option<Percentage>,
    },
    /// Liquidity added or removed.
    Liquidity {
        amount_a: TokenAmount,
        amount_b: TokenAmount,
        lp_tokens: TokenAmount,
    },
    /// Wallet connection change.
    Wallet { address: Option<String> },
}

/// A session event with full context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Position in the session log, starting at 0.
    pub sequence: u64,
    /// Unique event id.
    pub id: Uuid,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Type of event.
    pub event_type: SessionEventType,
    /// Additional event-specific data.
    pub data: EventData,
    /// Pool snapshot after the event.
    pub pool: Pool,
}

impl SessionEvent {
    fn new(sequence: u64, event_type: SessionEventType, data: EventData, pool: Pool) -> Self {
        Self {
            sequence,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            data,
            pool,
        }
    }

    /// Creates a new swap event.
    #[must_use]
    pub fn swap(
        sequence: u64,
        pool: Pool,
        direction: SwapDirection,
        amount_in: TokenAmount,
        amount_out: TokenAmount,
        price_impact: Option<Percentage>,
    ) -> Self {
        Self::new(
            sequence,
            SessionEventType::Swap,
            EventData::Swap {
                direction,
                amount_in,
                amount_out,
                price_impact,
            },
            pool,
        )
    }

    /// Creates a new liquidity added event.
    #[must_use]
    pub fn liquidity_added(
        sequence: u64,
        pool: Pool,
        amount_a: TokenAmount,
        amount_b: TokenAmount,
        lp_minted: TokenAmount,
    ) -> Self {
        Self::new(
            sequence,
            SessionEventType::LiquidityAdded,
            EventData::Liquidity {
                amount_a,
                amount_b,
                lp_tokens: lp_minted,
            },
            pool,
        )
    }

    /// Creates a new liquidity removed event.
    #[must_use]
    pub fn liquidity_removed(
        sequence: u64,
        pool: Pool,
        amount_a: TokenAmount,
        amount_b: TokenAmount,
        lp_burned: TokenAmount,
    ) -> Self {
        Self::new(
            sequence,
            SessionEventType::LiquidityRemoved,
            EventData::Liquidity {
                amount_a,
                amount_b,
                lp_tokens: lp_burned,
            },
            pool,
        )
    }

    /// Creates a wallet connected event.
    #[must_use]
    pub fn wallet_connected(sequence: u64, pool: Pool, address: String) -> Self {
        Self::new(
            sequence,
            SessionEventType::WalletConnected,
            EventData::Wallet {
                address: Some(address),
            },
            pool,
        )
    }

    /// Creates a wallet disconnected event.
    #[must_use]
    pub fn wallet_disconnected(sequence: u64, pool: Pool) -> Self {
        Self::new(
            sequence,
            SessionEventType::WalletDisconnected,
            EventData::Wallet { address: None },
            pool,
        )
    }
}

/// Event log for collecting all events during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    /// All recorded events.
    events: Vec<SessionEvent>,
}

impl EventLog {
    /// Creates a new empty event log.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Sequence number the next event should carry.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.events.len() as u64
    }

    /// Records an event.
    pub fn record(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Returns all events.
    #[must_use]
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Returns the most recent event.
    #[must_use]
    pub fn last(&self) -> Option<&SessionEvent> {
        self.events.last()
    }

    /// Returns events of a specific type.
    #[must_use]
    pub fn events_of_type(&self, event_type: SessionEventType) -> Vec<&SessionEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns the count of events by type.
    #[must_use]
    pub fn count_by_type(&self, event_type: SessionEventType) -> usize {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }

    /// Returns total swap count.
    #[must_use]
    pub fn swap_count(&self) -> usize {
        self.count_by_type(SessionEventType::Swap)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clears all events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
