//! Failure-containing fetch surface over the exchange adapters.

use crate::{
    compute::PriceQuote,
    error::DataError,
    exchange::{BookTop, ExchangeAdapter, ExchangeId},
    symbol::Symbol,
};
use reqwest::Client;
use std::sync::Arc;
use tracing::warn;

/// Sent with every request; some venues reject UA-less clients.
const USER_AGENT: &str = concat!("market-aggregator/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client plus one adapter per exchange.
///
/// This is the error boundary of the data layer: adapter failures are
/// logged and collapsed to `None` here, so a venue that is down, slow or
/// serving garbage costs its own cells on screen and nothing else.
#[derive(Clone)]
pub struct MarketClient {
    http: Client,
    adapters: [Arc<dyn ExchangeAdapter>; 3],
}

impl MarketClient {
    /// Client wired to the real exchange adapters.
    pub fn new() -> Result<Self, DataError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            adapters: [
                Arc::new(crate::exchange::bybit::Bybit),
                Arc::new(crate::exchange::mexc::Mexc),
                Arc::new(crate::exchange::binance::Binance),
            ],
        })
    }

    /// Client with injected adapters, in [`ExchangeId::ALL`] order.
    pub fn with_adapters(adapters: [Arc<dyn ExchangeAdapter>; 3]) -> Result<Self, DataError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, adapters })
    }

    fn adapter(&self, exchange: ExchangeId) -> &dyn ExchangeAdapter {
        self.adapters[exchange.index()].as_ref()
    }

    /// Latest traded price, or `None` if the venue failed this cycle.
    pub async fn last_price(&self, exchange: ExchangeId, symbol: Symbol) -> Option<f64> {
        self.adapter(exchange)
            .last_price(&self.http, symbol)
            .await
            .map_err(|error| log_failure(exchange, symbol, "last_price", &error))
            .ok()
    }

    /// Best ask/bid, or `None` if the venue failed this cycle.
    pub async fn order_book_top(&self, exchange: ExchangeId, symbol: Symbol) -> Option<BookTop> {
        self.adapter(exchange)
            .order_book_top(&self.http, symbol)
            .await
            .map_err(|error| log_failure(exchange, symbol, "order_book_top", &error))
            .ok()
    }

    /// Last price and book top fetched concurrently; either half may be
    /// missing independently of the other.
    pub async fn quote(&self, exchange: ExchangeId, symbol: Symbol) -> PriceQuote {
        let (last, top) = tokio::join!(
            self.last_price(exchange, symbol),
            self.order_book_top(exchange, symbol),
        );
        PriceQuote {
            last,
            ask: top.map(|top| top.ask),
            bid: top.map(|top| top.bid),
        }
    }

    /// Daily closes, oldest first, or `None` if the venue failed.
    pub async fn daily_closes(
        &self,
        exchange: ExchangeId,
        symbol: Symbol,
        days: usize,
    ) -> Option<Vec<f64>> {
        self.adapter(exchange)
            .daily_closes(&self.http, symbol, days)
            .await
            .map_err(|error| log_failure(exchange, symbol, "daily_closes", &error))
            .ok()
    }
}

fn log_failure(exchange: ExchangeId, symbol: Symbol, operation: &str, error: &DataError) {
    warn!(
        %exchange,
        %symbol,
        operation,
        kind = error.kind(),
        %error,
        "exchange request failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Adapter returning canned values, or [`DataError::Empty`] where a
    /// value is absent.
    pub(crate) struct MockAdapter {
        pub last: Option<f64>,
        pub top: Option<BookTop>,
        pub closes: Option<Vec<f64>>,
    }

    #[async_trait]
    impl ExchangeAdapter for MockAdapter {
        async fn last_price(&self, _: &Client, _: Symbol) -> Result<f64, DataError> {
            self.last.ok_or(DataError::Empty("mock last"))
        }

        async fn order_book_top(&self, _: &Client, _: Symbol) -> Result<BookTop, DataError> {
            self.top.ok_or(DataError::Empty("mock top"))
        }

        async fn daily_closes(
            &self,
            _: &Client,
            _: Symbol,
            _: usize,
        ) -> Result<Vec<f64>, DataError> {
            self.closes.clone().ok_or(DataError::Empty("mock closes"))
        }
    }

    fn client(adapters: [MockAdapter; 3]) -> MarketClient {
        let [a, b, c] = adapters;
        MarketClient::with_adapters([Arc::new(a), Arc::new(b), Arc::new(c)]).unwrap()
    }

    fn healthy(last: f64) -> MockAdapter {
        MockAdapter {
            last: Some(last),
            top: Some(BookTop {
                ask: last + 1.0,
                bid: last - 1.0,
            }),
            closes: Some(vec![last; 7]),
        }
    }

    fn failing() -> MockAdapter {
        MockAdapter {
            last: None,
            top: None,
            closes: None,
        }
    }

    #[tokio::test]
    async fn test_failure_collapses_to_none() {
        let client = client([healthy(100.0), failing(), healthy(102.0)]);

        assert_eq!(client.last_price(ExchangeId::Bybit, Symbol::Btc).await, Some(100.0));
        assert_eq!(client.last_price(ExchangeId::Mexc, Symbol::Btc).await, None);
        assert_eq!(client.last_price(ExchangeId::Binance, Symbol::Btc).await, Some(102.0));
    }

    #[tokio::test]
    async fn test_quote_halves_fail_independently() {
        let client = client([
            MockAdapter {
                last: Some(100.0),
                top: None,
                closes: None,
            },
            failing(),
            failing(),
        ]);

        let quote = client.quote(ExchangeId::Bybit, Symbol::Eth).await;
        assert_eq!(
            quote,
            PriceQuote {
                last: Some(100.0),
                ask: None,
                bid: None,
            }
        );
    }

    #[tokio::test]
    async fn test_daily_closes_passthrough() {
        let client = client([healthy(50.0), failing(), healthy(60.0)]);

        let closes = client.daily_closes(ExchangeId::Bybit, Symbol::Sol, 7).await;
        assert_eq!(closes, Some(vec![50.0; 7]));
        assert_eq!(client.daily_closes(ExchangeId::Mexc, Symbol::Sol, 7).await, None);
    }
}
