//! Cross-exchange spot price aggregation.
//!
//! This library provides everything the terminal dashboard needs short of
//! rendering:
//! - REST adapters for the three supported exchanges (Bybit, MEXC, Binance),
//!   each normalising its own envelope into the shared data model
//! - Pure computation over quotes: bid/ask spreads and cross-exchange
//!   best-buy/best-sell selection
//! - Bounded price history buffers for the realtime and weekly chart views
//! - The polling scheduler: two periodic background tasks that fetch, compute
//!   and hand typed [`UiEvent`]s to the presentation layer over a
//!   single-consumer queue

pub mod client;
pub mod compute;
pub mod de;
pub mod error;
pub mod event;
pub mod exchange;
pub mod history;
pub mod poll;
pub mod symbol;

// Re-export commonly used types for convenience
pub use client::MarketClient;
pub use compute::{compute_spread, select_best, BestPrice, PriceQuote, Spread};
pub use error::DataError;
pub use event::UiEvent;
pub use exchange::{BookTop, ExchangeAdapter, ExchangeId};
pub use history::{PricePoint, RealtimeSeries, WeeklySeries, REALTIME_CAPACITY, WEEKLY_DAYS};
pub use poll::{spawn_refresh, PollConfig, Poller, PollerHandles};
pub use symbol::Symbol;
