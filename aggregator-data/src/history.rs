//! Bounded price history backing the dashboard charts.

use crate::exchange::ExchangeId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Points retained per exchange in the realtime chart.
pub const REALTIME_CAPACITY: usize = 20;

/// Daily sessions shown in the weekly chart.
pub const WEEKLY_DAYS: usize = 7;

/// A timestamped price sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub time: DateTime<Utc>,
    pub price: f64,
}

/// Rolling window of recent last prices, one buffer per exchange.
///
/// Oldest points fall off the front once [`REALTIME_CAPACITY`] is reached,
/// so the chart always shows the most recent samples at a fixed width.
#[derive(Debug, Clone, Default)]
pub struct RealtimeSeries {
    buffers: [VecDeque<PricePoint>; 3],
}

impl RealtimeSeries {
    /// Append a sample for one exchange, evicting the oldest when full.
    pub fn push(&mut self, exchange: ExchangeId, point: PricePoint) {
        let buffer = &mut self.buffers[exchange.index()];
        if buffer.len() == REALTIME_CAPACITY {
            buffer.pop_front();
        }
        buffer.push_back(point);
    }

    pub fn points(&self, exchange: ExchangeId) -> impl Iterator<Item = &PricePoint> {
        self.buffers[exchange.index()].iter()
    }

    pub fn len(&self, exchange: ExchangeId) -> usize {
        self.buffers[exchange.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.iter().all(VecDeque::is_empty)
    }

    /// Drop all buffers. Called when the selected symbol changes so stale
    /// prices from the previous symbol never share a chart with the new one.
    pub fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }
}

/// Seven daily closes for one exchange, oldest first.
///
/// Replaced wholesale on each successful history fetch; a short or failed
/// fetch leaves the previous week on screen rather than showing a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySeries {
    pub exchange: ExchangeId,
    pub closes: Vec<f64>,
}

impl WeeklySeries {
    /// Build a weekly series, rejecting anything but exactly
    /// [`WEEKLY_DAYS`] closes.
    pub fn new(exchange: ExchangeId, closes: Vec<f64>) -> Option<Self> {
        if closes.len() != WEEKLY_DAYS {
            return None;
        }
        Some(Self { exchange, closes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(price: f64) -> PricePoint {
        PricePoint {
            time: Utc::now(),
            price,
        }
    }

    #[test]
    fn test_realtime_series_evicts_oldest() {
        let mut series = RealtimeSeries::default();
        for i in 0..25 {
            series.push(ExchangeId::Bybit, point(i as f64));
        }

        assert_eq!(series.len(ExchangeId::Bybit), REALTIME_CAPACITY);
        let prices: Vec<f64> = series
            .points(ExchangeId::Bybit)
            .map(|p| p.price)
            .collect();
        // First five samples were evicted.
        assert_eq!(prices.first(), Some(&5.0));
        assert_eq!(prices.last(), Some(&24.0));
    }

    #[test]
    fn test_realtime_series_buffers_are_independent() {
        let mut series = RealtimeSeries::default();
        series.push(ExchangeId::Bybit, point(1.0));
        series.push(ExchangeId::Binance, point(2.0));

        assert_eq!(series.len(ExchangeId::Bybit), 1);
        assert_eq!(series.len(ExchangeId::Mexc), 0);
        assert_eq!(series.len(ExchangeId::Binance), 1);
    }

    #[test]
    fn test_realtime_series_clear() {
        let mut series = RealtimeSeries::default();
        series.push(ExchangeId::Mexc, point(1.0));
        series.clear();
        assert!(series.is_empty());
    }

    #[test]
    fn test_weekly_series_requires_seven_closes() {
        struct TestCase {
            closes: Vec<f64>,
            expected_some: bool,
        }

        let tests = vec![
            // TC0: exactly seven
            TestCase {
                closes: vec![1.0; 7],
                expected_some: true,
            },
            // TC1: short fetch
            TestCase {
                closes: vec![1.0; 5],
                expected_some: false,
            },
            // TC2: over-long fetch
            TestCase {
                closes: vec![1.0; 8],
                expected_some: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = WeeklySeries::new(ExchangeId::Bybit, test.closes);
            assert_eq!(actual.is_some(), test.expected_some, "TC{} failed", index);
        }
    }
}
