//! Binance spot v3 endpoints.
//!
//! Binance returns payloads directly with no status envelope; a non-2xx
//! status is the only rejection signal. Kline rows are oldest-first.

use super::{get_json, BookTop, ExchangeAdapter, HISTORY_TIMEOUT, LIVE_TIMEOUT};
use crate::{de, error::DataError, symbol::Symbol};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const BASE_URL: &str = "https://api.binance.com/api/v3";

pub struct Binance;

/// 24hr ticker statistics; only the last trade price is consumed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BinanceTicker {
    #[serde(rename = "lastPrice", deserialize_with = "de::de_str")]
    pub last_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct BinanceDepth {
    pub asks: Vec<BinanceLevel>,
    pub bids: Vec<BinanceLevel>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BinanceLevel(
    #[serde(deserialize_with = "de::de_str")] pub f64,
    pub String,
);

/// Kline row format:
/// `[openTime, open, high, low, close, volume, closeTime, quoteVolume, trades, takerBase, takerQuote, ignore]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BinanceKline(
    pub i64,
    pub String,
    pub String,
    pub String,
    #[serde(deserialize_with = "de::de_str")] pub f64,
    pub String,
    pub i64,
    pub String,
    pub i64,
    pub String,
    pub String,
    pub String,
);

#[async_trait]
impl ExchangeAdapter for Binance {
    async fn last_price(&self, http: &Client, symbol: Symbol) -> Result<f64, DataError> {
        let url = format!("{BASE_URL}/ticker/24hr?symbol={}", symbol.market());
        let ticker = get_json::<BinanceTicker>(http, &url, LIVE_TIMEOUT).await?;
        Ok(ticker.last_price)
    }

    async fn order_book_top(&self, http: &Client, symbol: Symbol) -> Result<BookTop, DataError> {
        let url = format!("{BASE_URL}/depth?symbol={}&limit=1", symbol.market());
        let depth = get_json::<BinanceDepth>(http, &url, LIVE_TIMEOUT).await?;
        match (depth.asks.first(), depth.bids.first()) {
            (Some(ask), Some(bid)) => Ok(BookTop {
                ask: ask.0,
                bid: bid.0,
            }),
            _ => Err(DataError::Empty("binance depth")),
        }
    }

    async fn daily_closes(
        &self,
        http: &Client,
        symbol: Symbol,
        days: usize,
    ) -> Result<Vec<f64>, DataError> {
        let url = format!(
            "{BASE_URL}/klines?symbol={}&interval=1d&limit={days}",
            symbol.market()
        );
        let klines = get_json::<Vec<BinanceKline>>(http, &url, HISTORY_TIMEOUT).await?;
        if klines.is_empty() {
            return Err(DataError::Empty("binance klines"));
        }
        Ok(klines.iter().map(|row| row.4).collect())
    }
}
