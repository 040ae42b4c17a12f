//! Bybit v5 spot market endpoints.
//!
//! Bybit wraps every payload in a `{retCode, retMsg, result}` envelope and
//! reports success with HTTP 200 regardless, so `retCode` must be checked
//! before trusting `result`. Kline rows arrive newest-first.

use super::{get_json, BookTop, ExchangeAdapter, HISTORY_TIMEOUT, LIVE_TIMEOUT};
use crate::{de, error::DataError, symbol::Symbol};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const BASE_URL: &str = "https://api.bybit.com/v5/market";

pub struct Bybit;

/// ### Raw Payload Examples
/// See docs: <https://bybit-exchange.github.io/docs/v5/market/tickers>
/// ```json
/// {
///     "retCode": 0,
///     "retMsg": "OK",
///     "result": { "category": "spot", "list": [ { "symbol": "BTCUSDT", "lastPrice": "16578.50" } ] }
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct BybitResponse<T> {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg")]
    pub ret_msg: String,
    pub result: T,
}

impl<T> BybitResponse<T> {
    /// Unwrap the envelope, rejecting non-zero `retCode` payloads.
    fn into_result(self) -> Result<T, DataError> {
        if self.ret_code != 0 {
            return Err(DataError::Api {
                code: self.ret_code,
                message: self.ret_msg,
            });
        }
        Ok(self.result)
    }
}

#[derive(Debug, Deserialize)]
pub struct BybitTickerList {
    pub list: Vec<BybitTicker>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BybitTicker {
    #[serde(rename = "lastPrice", deserialize_with = "de::de_str")]
    pub last_price: f64,
}

/// Order book snapshot: `a`/`b` are `[price, size]` string pairs, best first.
#[derive(Debug, Deserialize)]
pub struct BybitOrderBook {
    pub a: Vec<BybitLevel>,
    pub b: Vec<BybitLevel>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BybitLevel(
    #[serde(deserialize_with = "de::de_str")] pub f64,
    pub String,
);

#[derive(Debug, Deserialize)]
pub struct BybitKlineList {
    pub list: Vec<BybitKline>,
}

/// Kline row: `[startTime, open, high, low, close, volume, turnover]`,
/// every field a string. Close is index 4.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BybitKline(
    pub String,
    pub String,
    pub String,
    pub String,
    #[serde(deserialize_with = "de::de_str")] pub f64,
    pub String,
    pub String,
);

#[async_trait]
impl ExchangeAdapter for Bybit {
    async fn last_price(&self, http: &Client, symbol: Symbol) -> Result<f64, DataError> {
        let url = format!(
            "{BASE_URL}/tickers?category=spot&symbol={}",
            symbol.market()
        );
        let tickers = get_json::<BybitResponse<BybitTickerList>>(http, &url, LIVE_TIMEOUT)
            .await?
            .into_result()?;
        tickers
            .list
            .first()
            .map(|ticker| ticker.last_price)
            .ok_or(DataError::Empty("bybit tickers"))
    }

    async fn order_book_top(&self, http: &Client, symbol: Symbol) -> Result<BookTop, DataError> {
        let url = format!(
            "{BASE_URL}/orderbook?category=spot&symbol={}&limit=1",
            symbol.market()
        );
        let book = get_json::<BybitResponse<BybitOrderBook>>(http, &url, LIVE_TIMEOUT)
            .await?
            .into_result()?;
        match (book.a.first(), book.b.first()) {
            (Some(ask), Some(bid)) => Ok(BookTop {
                ask: ask.0,
                bid: bid.0,
            }),
            _ => Err(DataError::Empty("bybit order book")),
        }
    }

    async fn daily_closes(
        &self,
        http: &Client,
        symbol: Symbol,
        days: usize,
    ) -> Result<Vec<f64>, DataError> {
        let url = format!(
            "{BASE_URL}/kline?category=spot&symbol={}&interval=D&limit={days}",
            symbol.market()
        );
        let klines = get_json::<BybitResponse<BybitKlineList>>(http, &url, HISTORY_TIMEOUT)
            .await?
            .into_result()?;
        if klines.list.is_empty() {
            return Err(DataError::Empty("bybit klines"));
        }
        // Newest first on the wire; callers expect chronological order.
        Ok(klines.list.iter().rev().map(|row| row.4).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod de {
        use super::*;

        #[test]
        fn test_bybit_ticker_envelope() {
            struct TestCase {
                input: &'static str,
                expected: Result<f64, DataError>,
            }

            let tests = vec![
                // TC0: successful envelope with one ticker
                TestCase {
                    input: r#"
                        {
                            "retCode": 0,
                            "retMsg": "OK",
                            "result": {
                                "category": "spot",
                                "list": [ { "symbol": "BTCUSDT", "lastPrice": "16578.50" } ]
                            }
                        }
                    "#,
                    expected: Ok(16578.50),
                },
                // TC1: retCode != 0 is rejected even though HTTP succeeded
                TestCase {
                    input: r#"
                        {
                            "retCode": 10001,
                            "retMsg": "params error: symbol invalid",
                            "result": { "list": [] }
                        }
                    "#,
                    expected: Err(DataError::Api {
                        code: 10001,
                        message: String::new(),
                    }),
                },
                // TC2: empty list is a semantic "no data"
                TestCase {
                    input: r#"
                        { "retCode": 0, "retMsg": "OK", "result": { "list": [] } }
                    "#,
                    expected: Err(DataError::Empty("bybit tickers")),
                },
            ];

            for (index, test) in tests.into_iter().enumerate() {
                let actual = serde_json::from_str::<BybitResponse<BybitTickerList>>(test.input)
                    .map_err(DataError::from)
                    .and_then(BybitResponse::into_result)
                    .and_then(|tickers| {
                        tickers
                            .list
                            .first()
                            .map(|t| t.last_price)
                            .ok_or(DataError::Empty("bybit tickers"))
                    });
                match (actual, test.expected) {
                    (Ok(actual), Ok(expected)) => {
                        assert_eq!(actual, expected, "TC{} failed", index)
                    }
                    (Err(_), Err(_)) => {
                        // Test passed
                    }
                    (actual, expected) => {
                        panic!(
                            "TC{index} failed because actual != expected. \nActual: {actual:?}\nExpected: {expected:?}\n"
                        );
                    }
                }
            }
        }

        #[test]
        fn test_bybit_order_book() {
            let input = r#"
                {
                    "retCode": 0,
                    "retMsg": "OK",
                    "result": {
                        "s": "BTCUSDT",
                        "a": [ ["16580.00", "0.005"] ],
                        "b": [ ["16578.50", "0.120"] ]
                    }
                }
            "#;

            let book = serde_json::from_str::<BybitResponse<BybitOrderBook>>(input)
                .unwrap()
                .into_result()
                .unwrap();
            assert_eq!(book.a.first(), Some(&BybitLevel(16580.00, "0.005".to_string())));
            assert_eq!(book.b.first(), Some(&BybitLevel(16578.50, "0.120".to_string())));
        }

        #[test]
        fn test_bybit_kline_rows_are_newest_first() {
            let input = r#"
                {
                    "retCode": 0,
                    "retMsg": "OK",
                    "result": {
                        "category": "spot",
                        "list": [
                            ["1672272000000", "16550", "16600", "16500", "16578.50", "100", "1657850"],
                            ["1672185600000", "16400", "16560", "16380", "16550.00", "90", "1489500"]
                        ]
                    }
                }
            "#;

            let klines = serde_json::from_str::<BybitResponse<BybitKlineList>>(input)
                .unwrap()
                .into_result()
                .unwrap();
            let closes: Vec<f64> = klines.list.iter().rev().map(|row| row.4).collect();
            // Chronological after reversal: older close first.
            assert_eq!(closes, vec![16550.00, 16578.50]);
        }
    }
}
