//! MEXC spot v3 endpoints.
//!
//! MEXC mirrors the Binance v3 surface with one difference that matters
//! here: kline rows carry 8 fields instead of 12. Close is still index 4.

use super::{get_json, BookTop, ExchangeAdapter, HISTORY_TIMEOUT, LIVE_TIMEOUT};
use crate::{de, error::DataError, symbol::Symbol};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const BASE_URL: &str = "https://api.mexc.com/api/v3";

pub struct Mexc;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MexcTicker {
    #[serde(rename = "lastPrice", deserialize_with = "de::de_str")]
    pub last_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct MexcDepth {
    pub asks: Vec<MexcLevel>,
    pub bids: Vec<MexcLevel>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MexcLevel(
    #[serde(deserialize_with = "de::de_str")] pub f64,
    pub String,
);

/// Kline row format:
/// `[openTime, open, high, low, close, volume, closeTime, quoteVolume]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MexcKline(
    pub i64,
    pub String,
    pub String,
    pub String,
    #[serde(deserialize_with = "de::de_str")] pub f64,
    pub String,
    pub i64,
    pub String,
);

#[async_trait]
impl ExchangeAdapter for Mexc {
    async fn last_price(&self, http: &Client, symbol: Symbol) -> Result<f64, DataError> {
        let url = format!("{BASE_URL}/ticker/24hr?symbol={}", symbol.market());
        let ticker = get_json::<MexcTicker>(http, &url, LIVE_TIMEOUT).await?;
        Ok(ticker.last_price)
    }

    async fn order_book_top(&self, http: &Client, symbol: Symbol) -> Result<BookTop, DataError> {
        let url = format!("{BASE_URL}/depth?symbol={}&limit=1", symbol.market());
        let depth = get_json::<MexcDepth>(http, &url, LIVE_TIMEOUT).await?;
        match (depth.asks.first(), depth.bids.first()) {
            (Some(ask), Some(bid)) => Ok(BookTop {
                ask: ask.0,
                bid: bid.0,
            }),
            _ => Err(DataError::Empty("mexc depth")),
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
        let klines = get_json::<Vec<MexcKline>>(http, &url, HISTORY_TIMEOUT).await?;
        if klines.is_empty() {
            return Err(DataError::Empty("mexc klines"));
        }
        Ok(klines.iter().map(|row| row.4).collect())
    }
}
