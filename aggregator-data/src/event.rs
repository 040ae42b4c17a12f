//! Events flowing from the polling tasks to the user interface.
//!
//! The poller never touches UI state directly. Every update crosses an
//! unbounded channel as a self-contained [`UiEvent`] the interface applies
//! on its own schedule; each event carries the symbol it was computed for
//! so late arrivals from a previous selection can be discarded.

use crate::{
    compute::{BestPrice, PriceQuote},
    exchange::ExchangeId,
    history::{PricePoint, WeeklySeries},
    symbol::Symbol,
};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Best buy/sell venues for the selected symbol.
    /// `None` means no venue answered this cycle.
    BestPrice {
        symbol: Symbol,
        best: Option<BestPrice>,
    },
    /// One exchange's row in the price table.
    QuoteRow {
        symbol: Symbol,
        exchange: ExchangeId,
        quote: PriceQuote,
    },
    /// Full snapshot of the realtime chart buffers, one series per
    /// exchange in [`ExchangeId::ALL`] order.
    RealtimeSnapshot {
        symbol: Symbol,
        series: [Vec<PricePoint>; 3],
    },
    /// Seven daily closes for one exchange.
    Weekly {
        symbol: Symbol,
        series: WeeklySeries,
    },
    /// One symbol's row in the all-symbols overview table: last price per
    /// exchange in [`ExchangeId::ALL`] order.
    OverviewRow {
        symbol: Symbol,
        prices: [Option<f64>; 3],
    },
}
