//! Scheduled polling tasks.
//!
//! Two independent loops drive the dashboard:
//!   * the realtime loop samples last prices on a short interval and owns
//!     the rolling chart buffers,
//!   * the full loop refreshes quotes, best price, weekly history and the
//!     all-symbols overview on a longer interval.
//!
//! Both react to symbol changes and shutdown through `watch` channels and
//! publish results as [`UiEvent`]s. A venue that fails a cycle is simply
//! absent from that cycle's output; nothing is retried.

use crate::{
    client::MarketClient,
    compute::select_best,
    event::UiEvent,
    exchange::ExchangeId,
    history::{PricePoint, RealtimeSeries, WeeklySeries, WEEKLY_DAYS},
    symbol::Symbol,
};
use chrono::Utc;
use std::time::Duration;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::debug;

/// Loop intervals. Defaults match the cadence the exchange rate limits
/// comfortably allow for unauthenticated endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub realtime_interval: Duration,
    pub full_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            realtime_interval: Duration::from_secs(3),
            full_interval: Duration::from_secs(10),
        }
    }
}

/// Everything the polling tasks need, ready to spawn.
pub struct Poller {
    client: MarketClient,
    config: PollConfig,
    events: mpsc::UnboundedSender<UiEvent>,
    symbol_rx: watch::Receiver<Symbol>,
    shutdown_rx: watch::Receiver<bool>,
}

/// Join handles for the two loops, returned by [`Poller::spawn`].
pub struct PollerHandles {
    pub realtime: JoinHandle<()>,
    pub full: JoinHandle<()>,
}

impl PollerHandles {
    /// Wait for both loops to finish after shutdown was signalled.
    pub async fn join(self) {
        let _ = tokio::join!(self.realtime, self.full);
    }
}

impl Poller {
    pub fn new(
        client: MarketClient,
        config: PollConfig,
        events: mpsc::UnboundedSender<UiEvent>,
        symbol_rx: watch::Receiver<Symbol>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            client,
            config,
            events,
            symbol_rx,
            shutdown_rx,
        }
    }

    /// Spawn the realtime and full loops onto the runtime.
    pub fn spawn(self) -> PollerHandles {
        let realtime = tokio::spawn(realtime_loop(
            self.client.clone(),
            self.config.realtime_interval,
            self.events.clone(),
            self.symbol_rx.clone(),
            self.shutdown_rx.clone(),
        ));
        let full = tokio::spawn(full_loop(
            self.client,
            self.config.full_interval,
            self.events,
            self.symbol_rx,
            self.shutdown_rx,
        ));
        PollerHandles { realtime, full }
    }
}

/// Run one full refresh off-schedule, e.g. for a manual refresh key.
pub fn spawn_refresh(
    client: MarketClient,
    symbol: Symbol,
    events: mpsc::UnboundedSender<UiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        full_cycle(&client, symbol, &events).await;
    })
}

async fn realtime_loop(
    client: MarketClient,
    interval: Duration,
    events: mpsc::UnboundedSender<UiEvent>,
    mut symbol_rx: watch::Receiver<Symbol>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut series = RealtimeSeries::default();
    let mut symbol = *symbol_rx.borrow_and_update();

    loop {
        let now = Utc::now();
        let (bybit, mexc, binance) = tokio::join!(
            client.last_price(ExchangeId::Bybit, symbol),
            client.last_price(ExchangeId::Mexc, symbol),
            client.last_price(ExchangeId::Binance, symbol),
        );
        for (exchange, price) in [
            (ExchangeId::Bybit, bybit),
            (ExchangeId::Mexc, mexc),
            (ExchangeId::Binance, binance),
        ] {
            if let Some(price) = price {
                series.push(exchange, PricePoint { time: now, price });
            }
        }

        let snapshot = [
            series.points(ExchangeId::Bybit).copied().collect(),
            series.points(ExchangeId::Mexc).copied().collect(),
            series.points(ExchangeId::Binance).copied().collect(),
        ];
        let _ = events.send(UiEvent::RealtimeSnapshot {
            symbol,
            series: snapshot,
        });

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = symbol_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                symbol = *symbol_rx.borrow_and_update();
                // New symbol must not share a chart with the old one.
                series.clear();
                debug!(%symbol, "realtime loop switched symbol");
            }
            _ = shutdown_rx.changed() => break,
        }
    }
}

async fn full_loop(
    client: MarketClient,
    interval: Duration,
    events: mpsc::UnboundedSender<UiEvent>,
    mut symbol_rx: watch::Receiver<Symbol>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut symbol = *symbol_rx.borrow_and_update();

    loop {
        full_cycle(&client, symbol, &events).await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = symbol_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                symbol = *symbol_rx.borrow_and_update();
            }
            _ = shutdown_rx.changed() => break,
        }
    }
}

/// One complete refresh: per-exchange quotes, best price, weekly closes
/// and the all-symbols overview, published in that order.
pub async fn full_cycle(
    client: &MarketClient,
    symbol: Symbol,
    events: &mpsc::UnboundedSender<UiEvent>,
) {
    let (bybit, mexc, binance) = tokio::join!(
        client.quote(ExchangeId::Bybit, symbol),
        client.quote(ExchangeId::Mexc, symbol),
        client.quote(ExchangeId::Binance, symbol),
    );
    let quotes = [
        (ExchangeId::Bybit, bybit),
        (ExchangeId::Mexc, mexc),
        (ExchangeId::Binance, binance),
    ];

    for (exchange, quote) in quotes {
        let _ = events.send(UiEvent::QuoteRow {
            symbol,
            exchange,
            quote,
        });
    }

    let lasts: Vec<_> = quotes
        .iter()
        .map(|(exchange, quote)| (*exchange, quote.last))
        .collect();
    let _ = events.send(UiEvent::BestPrice {
        symbol,
        best: select_best(&lasts),
    });

    let (bybit, mexc, binance) = tokio::join!(
        client.daily_closes(ExchangeId::Bybit, symbol, WEEKLY_DAYS),
        client.daily_closes(ExchangeId::Mexc, symbol, WEEKLY_DAYS),
        client.daily_closes(ExchangeId::Binance, symbol, WEEKLY_DAYS),
    );
    for (exchange, closes) in [
        (ExchangeId::Bybit, bybit),
        (ExchangeId::Mexc, mexc),
        (ExchangeId::Binance, binance),
    ] {
        // A short or failed fetch keeps the previous week on screen.
        if let Some(series) = closes.and_then(|closes| WeeklySeries::new(exchange, closes)) {
            let _ = events.send(UiEvent::Weekly { symbol, series });
        }
    }

    let rows = futures::future::join_all(Symbol::ALL.iter().map(|&row_symbol| async move {
        let (bybit, mexc, binance) = tokio::join!(
            client.last_price(ExchangeId::Bybit, row_symbol),
            client.last_price(ExchangeId::Mexc, row_symbol),
            client.last_price(ExchangeId::Binance, row_symbol),
        );
        (row_symbol, [bybit, mexc, binance])
    }))
    .await;
    for (row_symbol, prices) in rows {
        let _ = events.send(UiEvent::OverviewRow {
            symbol: row_symbol,
            prices,
        });
    }

    debug!(%symbol, "full cycle complete");
}
