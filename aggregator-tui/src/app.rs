//! Dashboard display state.
//!
//! `App` is the single consumer of the poller's event queue: it keeps the
//! latest value of everything on screen and nothing else. Events tagged
//! with a symbol other than the current selection are stale by definition
//! and dropped on arrival.

use aggregator_data::{
    BestPrice, ExchangeId, PricePoint, PriceQuote, Symbol, UiEvent, WeeklySeries,
};
use chrono::{DateTime, Utc};

/// Which pane the dashboard is showing; `Tab` cycles through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Prices,
    Charts,
    Overview,
}

impl View {
    pub fn next(&self) -> View {
        match self {
            View::Prices => View::Charts,
            View::Charts => View::Overview,
            View::Overview => View::Prices,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Prices => "Prices",
            View::Charts => "Charts",
            View::Overview => "Overview",
        }
    }
}

#[derive(Debug, Default)]
pub struct App {
    pub symbol: Symbol,
    pub view: View,
    /// Best price for the selected symbol; `None` before the first full
    /// cycle or when every venue failed.
    pub best: Option<BestPrice>,
    /// Whether a full cycle has reported at all, to tell "still loading"
    /// apart from "no venue could be reached".
    pub best_reported: bool,
    pub quotes: [PriceQuote; 3],
    pub realtime: [Vec<PricePoint>; 3],
    pub weekly: [Option<WeeklySeries>; 3],
    /// Last price per symbol per exchange, in `Symbol::ALL` x
    /// `ExchangeId::ALL` order.
    pub overview: [[Option<f64>; 3]; 9],
    pub last_update: Option<DateTime<Utc>>,
    /// One-line feedback from the last export, shown in the status bar.
    pub notice: Option<String>,
}

impl App {
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::BestPrice { symbol, best } if symbol == self.symbol => {
                self.best = best;
                self.best_reported = true;
                self.last_update = Some(Utc::now());
            }
            UiEvent::QuoteRow {
                symbol,
                exchange,
                quote,
            } if symbol == self.symbol => {
                self.quotes[exchange.index()] = quote;
                self.last_update = Some(Utc::now());
            }
            UiEvent::RealtimeSnapshot { symbol, series } if symbol == self.symbol => {
                self.realtime = series;
                self.last_update = Some(Utc::now());
            }
            UiEvent::Weekly { symbol, series } if symbol == self.symbol => {
                let idx = series.exchange.index();
                self.weekly[idx] = Some(series);
            }
            // Overview rows are not scoped to the selection.
            UiEvent::OverviewRow { symbol, prices } => {
                self.overview[symbol.index()] = prices;
            }
            _ => {}
        }
    }

    /// Switch the selected symbol, dropping everything scoped to the old
    /// one so stale prices never show under the new header.
    pub fn select_symbol(&mut self, symbol: Symbol) {
        self.symbol = symbol;
        self.best = None;
        self.best_reported = false;
        self.quotes = Default::default();
        self.realtime = Default::default();
        self.weekly = Default::default();
    }

    /// Headline under the symbol name.
    pub fn best_banner(&self) -> String {
        match (&self.best, self.best_reported) {
            (Some(best), _) => format!(
                "Buy: {} USDT on {}  |  Sell: {} USDT on {}",
                format_price(best.buy_price),
                best.buy_exchange,
                format_price(best.sell_price),
                best.sell_exchange,
            ),
            (None, true) => "Cannot determine price".to_string(),
            (None, false) => "Waiting for data...".to_string(),
        }
    }

    pub fn quote(&self, exchange: ExchangeId) -> &PriceQuote {
        &self.quotes[exchange.index()]
    }
}

/// Table cell for an optional price; failed fetches render as `Error`.
pub fn price_cell(value: Option<f64>) -> String {
    match value {
        Some(value) => format_price(value),
        None => "Error".to_string(),
    }
}

/// Price formatting that works for both BTC and sub-dollar symbols.
pub fn format_price(value: f64) -> String {
    if value.abs() >= 1.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.6}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggregator_data::Spread;

    fn best(exchange: ExchangeId, price: f64) -> BestPrice {
        BestPrice {
            buy_exchange: exchange,
            buy_price: price,
            sell_exchange: exchange,
            sell_price: price,
        }
    }

    #[test]
    fn test_apply_drops_stale_symbol_events() {
        let mut app = App::default();
        assert_eq!(app.symbol, Symbol::Btc);

        app.apply(UiEvent::BestPrice {
            symbol: Symbol::Eth,
            best: Some(best(ExchangeId::Bybit, 2000.0)),
        });
        assert_eq!(app.best, None);
        assert!(!app.best_reported);

        app.apply(UiEvent::BestPrice {
            symbol: Symbol::Btc,
            best: Some(best(ExchangeId::Mexc, 16578.5)),
        });
        assert_eq!(app.best, Some(best(ExchangeId::Mexc, 16578.5)));
    }

    #[test]
    fn test_apply_quote_rows() {
        let mut app = App::default();
        let quote = PriceQuote {
            last: Some(100.0),
            ask: Some(101.0),
            bid: Some(99.0),
        };

        app.apply(UiEvent::QuoteRow {
            symbol: Symbol::Btc,
            exchange: ExchangeId::Binance,
            quote,
        });

        assert_eq!(app.quote(ExchangeId::Binance), &quote);
        assert_eq!(app.quote(ExchangeId::Bybit), &PriceQuote::default());
        assert_eq!(
            app.quote(ExchangeId::Binance).spread(),
            Some(Spread {
                absolute: 2.0,
                percent: 2.0 / 99.0 * 100.0,
            })
        );
    }

    #[test]
    fn test_overview_rows_apply_for_any_symbol() {
        let mut app = App::default();

        app.apply(UiEvent::OverviewRow {
            symbol: Symbol::Doge,
            prices: [Some(0.081), None, Some(0.08)],
        });

        assert_eq!(
            app.overview[Symbol::Doge.index()],
            [Some(0.081), None, Some(0.08)]
        );
        assert!(app.overview[Symbol::Btc.index()].iter().all(Option::is_none));
    }

    #[test]
    fn test_select_symbol_resets_scoped_state() {
        let mut app = App::default();
        app.apply(UiEvent::BestPrice {
            symbol: Symbol::Btc,
            best: Some(best(ExchangeId::Bybit, 16578.5)),
        });
        app.apply(UiEvent::OverviewRow {
            symbol: Symbol::Btc,
            prices: [Some(16578.5), Some(16579.0), Some(16580.0)],
        });

        app.select_symbol(Symbol::Eth);

        assert_eq!(app.symbol, Symbol::Eth);
        assert_eq!(app.best, None);
        assert!(!app.best_reported);
        assert!(app.realtime.iter().all(Vec::is_empty));
        assert!(app.weekly.iter().all(Option::is_none));
        // The overview table is symbol-independent and survives.
        assert_eq!(app.overview[Symbol::Btc.index()][0], Some(16578.5));
    }

    #[test]
    fn test_best_banner() {
        let mut app = App::default();
        assert_eq!(app.best_banner(), "Waiting for data...");

        app.apply(UiEvent::BestPrice {
            symbol: Symbol::Btc,
            best: None,
        });
        assert_eq!(app.best_banner(), "Cannot determine price");

        app.apply(UiEvent::BestPrice {
            symbol: Symbol::Btc,
            best: Some(BestPrice {
                buy_exchange: ExchangeId::Mexc,
                buy_price: 16578.5,
                sell_exchange: ExchangeId::Binance,
                sell_price: 16580.0,
            }),
        });
        assert_eq!(
            app.best_banner(),
            "Buy: 16578.50 USDT on MEXC  |  Sell: 16580.00 USDT on Binance"
        );
    }

    #[test]
    fn test_price_cell_placeholders() {
        assert_eq!(price_cell(Some(16578.5)), "16578.50");
        assert_eq!(price_cell(Some(0.082134)), "0.082134");
        assert_eq!(price_cell(None), "Error");
    }
}
