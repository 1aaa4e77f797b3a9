//! OHLC price bars and applied-price selection.

use crate::error::QuoteError;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which component of a bar an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppliedPrice {
    /// Close price
    #[default]
    Close,
    /// Open price
    Open,
    /// High price
    High,
    /// Low price
    Low,
    /// Median price (HL/2)
    Median,
    /// Typical price (HLC/3)
    Typical,
}

impl fmt::Display for AppliedPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppliedPrice::Close => "close",
            AppliedPrice::Open => "open",
            AppliedPrice::High => "high",
            AppliedPrice::Low => "low",
            AppliedPrice::Median => "median",
            AppliedPrice::Typical => "typical",
        };
        write!(f, "{}", s)
    }
}

/// One immutable OHLC price bar.
///
/// Timestamps are Unix milliseconds and must be strictly increasing within
/// a series. Invariant: `low <= {open, close} <= high`, all prices finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl Quote {
    /// Create a new historical bar, validating the OHLC invariant.
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Result<Self, QuoteError> {
        if ![open, high, low, close].iter().all(|p| p.is_finite()) {
            return Err(QuoteError::NonFinitePrice { time });
        }
        if low > open || low > close || high < open || high < close {
            return Err(QuoteError::InvertedRange { time, low, high });
        }
        Ok(Self {
            time,
            open,
            high,
            low,
            close,
        })
    }

    /// Create a degenerate real-time bar from a single price.
    pub fn tick(time: i64, price: f64) -> Result<Self, QuoteError> {
        Self::new(time, price, price, price, price)
    }

    #[inline]
    pub fn time(&self) -> i64 {
        self.time
    }

    #[inline]
    pub fn open(&self) -> f64 {
        self.open
    }

    #[inline]
    pub fn high(&self) -> f64 {
        self.high
    }

    #[inline]
    pub fn low(&self) -> f64 {
        self.low
    }

    #[inline]
    pub fn close(&self) -> f64 {
        self.close
    }

    /// Median price (HL/2).
    #[inline]
    pub fn median(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// Typical price (HLC/3).
    #[inline]
    pub fn typical(&self) -> f64 {
        (self.low + self.high + self.close) / 3.0
    }

    /// The bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Select a price component. Pure, no state.
    pub fn price(&self, applied: AppliedPrice) -> f64 {
        match applied {
            AppliedPrice::Close => self.close,
            AppliedPrice::Open => self.open,
            AppliedPrice::High => self.high,
            AppliedPrice::Low => self.low,
            AppliedPrice::Median => self.median(),
            AppliedPrice::Typical => self.typical(),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = DateTime::from_timestamp_millis(self.time)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| self.time.to_string());
        write!(
            f,
            "Time: {}, OHLC: [ {}, {}, {}, {} ]",
            when, self.open, self.high, self.low, self.close
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_prices() {
        let q = Quote::new(1000, 100.0, 110.0, 95.0, 105.0).unwrap();

        assert!((q.median() - 102.5).abs() < 1e-10);
        assert!((q.typical() - 103.333333).abs() < 1e-3);
        assert!((q.range() - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_applied_price_selection() {
        let q = Quote::new(1000, 100.0, 110.0, 95.0, 105.0).unwrap();

        assert_eq!(q.price(AppliedPrice::Close), 105.0);
        assert_eq!(q.price(AppliedPrice::Open), 100.0);
        assert_eq!(q.price(AppliedPrice::High), 110.0);
        assert_eq!(q.price(AppliedPrice::Low), 95.0);
        assert_eq!(q.price(AppliedPrice::Median), (110.0 + 95.0) / 2.0);
        assert_eq!(q.price(AppliedPrice::Typical), (110.0 + 95.0 + 105.0) / 3.0);
    }

    #[test]
    fn test_invariant_rejected() {
        // low above open
        assert!(Quote::new(1, 100.0, 110.0, 101.0, 105.0).is_err());
        // high below close
        assert!(Quote::new(1, 100.0, 104.0, 95.0, 105.0).is_err());
        assert!(Quote::new(1, f64::NAN, 110.0, 95.0, 105.0).is_err());
    }

    #[test]
    fn test_tick_bar() {
        let q = Quote::tick(42, 1.25).unwrap();
        assert_eq!(q.open(), 1.25);
        assert_eq!(q.high(), 1.25);
        assert_eq!(q.low(), 1.25);
        assert_eq!(q.close(), 1.25);
    }
}
