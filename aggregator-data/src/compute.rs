//! Derived market figures: per-exchange quotes, spreads and cross-exchange
//! best-price selection.

use crate::exchange::ExchangeId;
use serde::Serialize;

/// One exchange's view of a symbol at a point in time.
///
/// Any field may be missing when the venue failed to answer within its
/// timeout; missing fields render as placeholders, never as zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceQuote {
    pub last: Option<f64>,
    pub ask: Option<f64>,
    pub bid: Option<f64>,
}

impl PriceQuote {
    /// Ask minus bid, when both sides are present.
    pub fn spread(&self) -> Option<Spread> {
        compute_spread(self.ask, self.bid)
    }
}

/// Absolute and relative spread between best ask and best bid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spread {
    pub absolute: f64,
    pub percent: f64,
}

/// Cheapest and dearest last price across venues and where each was found.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestPrice {
    pub buy_exchange: ExchangeId,
    pub buy_price: f64,
    pub sell_exchange: ExchangeId,
    pub sell_price: f64,
}

/// Spread in quote units and as a percentage of the bid.
///
/// `None` when either leg is missing. A zero bid cannot anchor a
/// percentage, so percent is reported as 0 rather than dividing by it.
pub fn compute_spread(ask: Option<f64>, bid: Option<f64>) -> Option<Spread> {
    let (ask, bid) = (ask?, bid?);
    let percent = if bid == 0.0 {
        0.0
    } else {
        (ask - bid) / bid * 100.0
    };
    Some(Spread {
        absolute: ask - bid,
        percent,
    })
}

/// Lowest (buy side) and highest (sell side) last price across exchanges.
///
/// Exchanges without a price are skipped; `None` when no venue answered.
/// Strict comparisons keep the earlier venue in input order on an exact
/// tie, so selection is deterministic over [`ExchangeId::ALL`].
pub fn select_best(prices: &[(ExchangeId, Option<f64>)]) -> Option<BestPrice> {
    let mut best: Option<BestPrice> = None;
    for (exchange, price) in prices
        .iter()
        .filter_map(|(exchange, price)| price.map(|price| (*exchange, price)))
    {
        match best.as_mut() {
            None => {
                best = Some(BestPrice {
                    buy_exchange: exchange,
                    buy_price: price,
                    sell_exchange: exchange,
                    sell_price: price,
                });
            }
            Some(best) => {
                if price < best.buy_price {
                    best.buy_exchange = exchange;
                    best.buy_price = price;
                }
                if price > best.sell_price {
                    best.sell_exchange = exchange;
                    best.sell_price = price;
                }
            }
        }
    }
    best
}
