//! Exchange REST adapters.
//!
//! One module per venue. Each adapter owns its endpoint templates and
//! response envelopes and normalises them into the shared output shapes;
//! callers never see an exchange-specific field.

use crate::{error::DataError, symbol::Symbol};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

pub mod binance;
pub mod bybit;
pub mod mexc;

/// Request timeout for live price and order book calls.
pub const LIVE_TIMEOUT: Duration = Duration::from_secs(3);

/// Request timeout for historical kline calls, which transfer more data.
pub const HISTORY_TIMEOUT: Duration = Duration::from_secs(5);

/// Supported exchange identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ExchangeId {
    Bybit,
    Mexc,
    Binance,
}

impl ExchangeId {
    /// Fixed iteration order.
    ///
    /// Best-price selection breaks ties by this order, so it must never
    /// change without revisiting those tests.
    pub const ALL: [ExchangeId; 3] = [ExchangeId::Bybit, ExchangeId::Mexc, ExchangeId::Binance];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Bybit => "Bybit",
            ExchangeId::Mexc => "MEXC",
            ExchangeId::Binance => "Binance",
        }
    }

    /// Index into per-exchange arrays, consistent with [`ExchangeId::ALL`].
    pub fn index(&self) -> usize {
        match self {
            ExchangeId::Bybit => 0,
            ExchangeId::Mexc => 1,
            ExchangeId::Binance => 2,
        }
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Top of book: best ask and best bid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookTop {
    pub ask: f64,
    pub bid: f64,
}

/// Uniform fetch surface implemented once per exchange.
///
/// Adapters are pure request/parse logic: no retries, no caching, no state.
/// Any transport error, non-success status, envelope rejection or missing
/// field surfaces as a [`DataError`] for the caller to contain.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// Latest traded spot price for the symbol.
    async fn last_price(&self, http: &Client, symbol: Symbol) -> Result<f64, DataError>;

    /// Best ask/bid from the spot order book.
    async fn order_book_top(&self, http: &Client, symbol: Symbol) -> Result<BookTop, DataError>;

    /// Daily closing prices, oldest first, most recent `days` sessions.
    async fn daily_closes(
        &self,
        http: &Client,
        symbol: Symbol,
        days: usize,
    ) -> Result<Vec<f64>, DataError>;
}

/// Issue one GET and decode the JSON body.
///
/// No retry: a failed call simply waits for the next scheduled tick.
pub(crate) async fn get_json<T>(
    http: &Client,
    url: &str,
    timeout: Duration,
) -> Result<T, DataError>
where
    T: serde::de::DeserializeOwned,
{
    let response = http.get(url).timeout(timeout).send().await?;
    if !response.status().is_success() {
        return Err(DataError::Status(response.status()));
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order() {
        // Tie-break order for best-price selection: Bybit, MEXC, Binance.
        assert_eq!(
            ExchangeId::ALL,
            [ExchangeId::Bybit, ExchangeId::Mexc, ExchangeId::Binance]
        );
        for (i, exchange) in ExchangeId::ALL.iter().enumerate() {
            assert_eq!(exchange.index(), i);
        }
    }
}
