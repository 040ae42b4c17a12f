//! Export of the current dashboard snapshot to disk.
//!
//! `s` writes the selected symbol's data twice: a human-readable `.txt`
//! and a machine-readable `.json`, both named
//! `crypto_data_{SYMBOL}_{YYYYmmdd_HHMMSS}` in the configured directory.

use crate::app::{price_cell, App};
use aggregator_data::{BestPrice, ExchangeId, Spread};
use chrono::Local;
use serde::Serialize;
use std::{
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
};

#[derive(Debug, Serialize)]
pub struct QuoteRow {
    pub exchange: ExchangeId,
    pub last: Option<f64>,
    pub ask: Option<f64>,
    pub bid: Option<f64>,
    pub spread: Option<Spread>,
}

#[derive(Debug, Serialize)]
pub struct OverviewEntry {
    pub symbol: String,
    pub prices: [Option<f64>; 3],
}

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub symbol: String,
    pub market: String,
    pub exported_at: String,
    pub best: Option<BestPrice>,
    pub quotes: Vec<QuoteRow>,
    pub overview: Vec<OverviewEntry>,
}

impl Snapshot {
    pub fn capture(app: &App) -> Self {
        Self {
            symbol: app.symbol.to_string(),
            market: app.symbol.market(),
            exported_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            best: app.best,
            quotes: ExchangeId::ALL
                .iter()
                .map(|&exchange| {
                    let quote = app.quote(exchange);
                    QuoteRow {
                        exchange,
                        last: quote.last,
                        ask: quote.ask,
                        bid: quote.bid,
                        spread: quote.spread(),
                    }
                })
                .collect(),
            overview: aggregator_data::Symbol::ALL
                .iter()
                .map(|&symbol| OverviewEntry {
                    symbol: symbol.to_string(),
                    prices: app.overview[symbol.index()],
                })
                .collect(),
        }
    }
}

#[derive(Debug)]
pub struct ExportPaths {
    pub txt: PathBuf,
    pub json: PathBuf,
}

/// Write both export files, creating the directory if needed.
pub fn write(snapshot: &Snapshot, dir: &Path) -> io::Result<ExportPaths> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    write_stamped(snapshot, dir, &stamp)
}

fn write_stamped(snapshot: &Snapshot, dir: &Path, stamp: &str) -> io::Result<ExportPaths> {
    fs::create_dir_all(dir)?;
    let base = format!("crypto_data_{}_{stamp}", snapshot.symbol);

    let txt = dir.join(format!("{base}.txt"));
    fs::write(&txt, render_text(snapshot))?;

    let json = dir.join(format!("{base}.json"));
    let body = serde_json::to_vec_pretty(snapshot)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
    fs::write(&json, body)?;

    Ok(ExportPaths { txt, json })
}

fn render_text(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Crypto data export");
    let _ = writeln!(out, "Market:   {}", snapshot.market);
    let _ = writeln!(out, "Exported: {}", snapshot.exported_at);
    let _ = writeln!(out);

    match &snapshot.best {
        Some(best) => {
            let _ = writeln!(
                out,
                "Buy:  {} USDT on {}",
                price_cell(Some(best.buy_price)),
                best.buy_exchange
            );
            let _ = writeln!(
                out,
                "Sell: {} USDT on {}",
                price_cell(Some(best.sell_price)),
                best.sell_exchange
            );
        }
        None => {
            let _ = writeln!(out, "Best price: Cannot determine price");
        }
    }
    let _ = writeln!(out);

    for row in &snapshot.quotes {
        let spread = match row.spread {
            Some(spread) => format!("{:.4} ({:.3}%)", spread.absolute, spread.percent),
            None => "Error".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<8} last={:<12} ask={:<12} bid={:<12} spread={}",
            row.exchange.as_str(),
            price_cell(row.last),
            price_cell(row.ask),
            price_cell(row.bid),
            spread,
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "All symbols (Bybit / MEXC / Binance):");
    for entry in &snapshot.overview {
        let _ = writeln!(
            out,
            "{:<6} {:<12} {:<12} {:<12}",
            entry.symbol,
            price_cell(entry.prices[0]),
            price_cell(entry.prices[1]),
            price_cell(entry.prices[2]),
        );
    }
    out
}
