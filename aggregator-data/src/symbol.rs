use serde::{Deserialize, Serialize};
use std::fmt;

/// Quote asset appended to every base ticker when building request URLs.
pub const QUOTE_ASSET: &str = "USDT";

/// A selectable base asset.
///
/// The set is fixed: it doubles as the dashboard's symbol selector and as the
/// rows of the overview table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Symbol {
    Btc,
    Eth,
    Bnb,
    Sol,
    Xrp,
    Ada,
    Doge,
    Dot,
    Avax,
}

impl Symbol {
    /// Every supported symbol, in display order.
    pub const ALL: [Symbol; 9] = [
        Symbol::Btc,
        Symbol::Eth,
        Symbol::Bnb,
        Symbol::Sol,
        Symbol::Xrp,
        Symbol::Ada,
        Symbol::Doge,
        Symbol::Dot,
        Symbol::Avax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Btc => "BTC",
            Symbol::Eth => "ETH",
            Symbol::Bnb => "BNB",
            Symbol::Sol => "SOL",
            Symbol::Xrp => "XRP",
            Symbol::Ada => "ADA",
            Symbol::Doge => "DOGE",
            Symbol::Dot => "DOT",
            Symbol::Avax => "AVAX",
        }
    }

    /// Trading pair used in request URLs (e.g. `BTCUSDT`).
    pub fn market(&self) -> String {
        format!("{}{}", self.as_str(), QUOTE_ASSET)
    }

    /// Position in [`Symbol::ALL`], for per-symbol arrays.
    pub fn index(&self) -> usize {
        Symbol::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Next symbol in display order, wrapping around.
    pub fn next(&self) -> Symbol {
        let idx = Symbol::ALL.iter().position(|s| s == self).unwrap_or(0);
        Symbol::ALL[(idx + 1) % Symbol::ALL.len()]
    }

    /// Previous symbol in display order, wrapping around.
    pub fn prev(&self) -> Symbol {
        let idx = Symbol::ALL.iter().position(|s| s == self).unwrap_or(0);
        Symbol::ALL[(idx + Symbol::ALL.len() - 1) % Symbol::ALL.len()]
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Symbol::Btc
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
