//! Quote server: the per-security bar series indicators read from.

use crate::error::SeriesError;
use crate::types::{AppliedPrice, Quote, TimeSeries, TimedValue};

/// Append-only series of OHLC bars for one security.
///
/// A thin specialization of [`TimeSeries`] adding applied-price projection
/// over windowed reads.
#[derive(Debug, Clone, Default)]
pub struct QuoteServer {
    series: TimeSeries<Quote>,
}

impl QuoteServer {
    pub fn new() -> Self {
        Self {
            series: TimeSeries::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Append one bar; its timestamp must exceed the last stored one.
    pub fn append(&mut self, quote: Quote) -> Result<(), SeriesError> {
        self.series.append(quote.time(), quote)
    }

    /// Age-indexed bar lookup; age 0 is the newest bar.
    pub fn value_back(&self, age: usize) -> Result<&Quote, SeriesError> {
        self.series.value_back(age).map(|entry| &entry.value)
    }

    /// Index-indexed bar lookup; index 0 is the oldest bar.
    pub fn value_forward(&self, index: usize) -> Result<&Quote, SeriesError> {
        self.series.value_forward(index).map(|entry| &entry.value)
    }

    /// The most recent bar.
    pub fn last_value(&self) -> Result<&Quote, SeriesError> {
        self.series.last_value().map(|entry| &entry.value)
    }

    /// Chronological bars with `time >= last_time - period`.
    pub fn value_list(&self, period: i64) -> Result<&[TimedValue<Quote>], SeriesError> {
        self.series.value_list(period)
    }

    /// Same window as [`value_list`](Self::value_list), projected through
    /// the applied price.
    pub fn price_list(&self, period: i64, applied: AppliedPrice) -> Result<Vec<f64>, SeriesError> {
        Ok(self
            .value_list(period)?
            .iter()
            .map(|entry| entry.value.price(applied))
            .collect())
    }
}
