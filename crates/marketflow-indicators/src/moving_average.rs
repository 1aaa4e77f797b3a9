//! Moving average indicators.

use crate::base::{check_length, ema_multiplier, Indicator};
use marketflow_core::error::IndicatorError;
use marketflow_core::types::{AppliedPrice, QuoteServer, TimeSeries};
use serde::{Deserialize, Serialize};

/// Exponential Moving Average.
///
/// Seeded with the first observed price, then
/// `value = prev + multiplier * (price - prev)`. With length 1 the output
/// reproduces the input exactly.
#[derive(Debug, Clone)]
pub struct Ema {
    multiplier: f64,
    applied: AppliedPrice,
    values: TimeSeries<f64>,
}

impl Ema {
    /// Create a new EMA reading the close price.
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        Self::with_applied(length, AppliedPrice::Close)
    }

    pub fn with_applied(length: usize, applied: AppliedPrice) -> Result<Self, IndicatorError> {
        check_length("EMA", length)?;
        Ok(Self {
            multiplier: ema_multiplier(length),
            applied,
            values: TimeSeries::new(),
        })
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn update(&mut self, quotes: &QuoteServer) -> Result<f64, IndicatorError> {
        let bar = *quotes.last_value()?;
        let price = bar.price(self.applied);

        let value = match self.values.last_value() {
            Ok(prev) => prev.value + (price - prev.value) * self.multiplier,
            Err(_) => price,
        };

        self.values.append(bar.time(), value)?;
        Ok(value)
    }

    fn series(&self) -> &TimeSeries<f64> {
        &self.values
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Open-to-close moving average of the period.
#[derive(Debug, Clone)]
pub struct OpenCloseStick {
    multiplier: f64,
    values: TimeSeries<f64>,
}

impl OpenCloseStick {
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        check_length("OpenCloseStick", length)?;
        Ok(Self {
            multiplier: ema_multiplier(length),
            values: TimeSeries::new(),
        })
    }
}

impl Indicator for OpenCloseStick {
    type Output = f64;

    fn update(&mut self, quotes: &QuoteServer) -> Result<f64, IndicatorError> {
        let bar = *quotes.last_value()?;
        let diff = bar.close() - bar.open();

        let value = match self.values.last_value() {
            Ok(prev) => prev.value + (diff - prev.value) * self.multiplier,
            Err(_) => diff,
        };

        self.values.append(bar.time(), value)?;
        Ok(value)
    }

    fn series(&self) -> &TimeSeries<f64> {
        &self.values
    }

    fn name(&self) -> &str {
        "OCS"
    }
}

/// Smoothed wick lengths of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickOutput {
    /// Close-to-low distance, smoothed.
    pub lower: f64,
    /// High-to-close distance, smoothed.
    pub upper: f64,
}

/// High/low-to-close moving averages of the period.
#[derive(Debug, Clone)]
pub struct HighLowStick {
    multiplier: f64,
    values: TimeSeries<StickOutput>,
}

impl HighLowStick {
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        check_length("HighLowStick", length)?;
        Ok(Self {
            multiplier: ema_multiplier(length),
            values: TimeSeries::new(),
        })
    }
}

impl Indicator for HighLowStick {
    type Output = StickOutput;

    fn update(&mut self, quotes: &QuoteServer) -> Result<StickOutput, IndicatorError> {
        let bar = *quotes.last_value()?;
        let lower = bar.close() - bar.low();
        let upper = bar.high() - bar.close();

        let value = match self.values.last_value() {
            Ok(prev) => StickOutput {
                lower: prev.value.lower + (lower - prev.value.lower) * self.multiplier,
                upper: prev.value.upper + (upper - prev.value.upper) * self.multiplier,
            },
            Err(_) => StickOutput { lower, upper },
        };

        self.values.append(bar.time(), value)?;
        Ok(value)
    }

    fn series(&self) -> &TimeSeries<StickOutput> {
        &self.values
    }

    fn name(&self) -> &str {
        "HLS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketflow_core::types::Quote;

    fn qs_from_closes(closes: &[f64]) -> QuoteServer {
        let mut qs = QuoteServer::new();
        for (i, &c) in closes.iter().enumerate() {
            qs.append(Quote::tick((i as i64 + 1) * 1000, c).unwrap())
                .unwrap();
        }
        qs
    }

    #[test]
    fn test_ema_reference_sequence() {
        // length 3 => multiplier 0.5; seed with first price
        let mut qs = QuoteServer::new();
        let mut ema = Ema::new(3).unwrap();

        let mut outputs = Vec::new();
        for (i, price) in [10.0, 20.0, 10.0].iter().enumerate() {
            qs.append(Quote::tick((i as i64 + 1) * 1000, *price).unwrap())
                .unwrap();
            outputs.push(ema.update(&qs).unwrap());
        }

        assert_eq!(outputs, vec![10.0, 15.0, 12.5]);
        assert_eq!(ema.series().len(), 3);
        assert_eq!(ema.series().last_value().unwrap().time, 3000);
    }

    #[test]
    fn test_ema_length_one_is_identity() {
        let closes = [10.0, 20.0, 5.0, 42.0];
        let mut qs = QuoteServer::new();
        let mut ema = Ema::new(1).unwrap();

        for (i, &c) in closes.iter().enumerate() {
            qs.append(Quote::tick((i as i64 + 1) * 1000, c).unwrap())
                .unwrap();
            assert_eq!(ema.update(&qs).unwrap(), c);
        }
    }

    #[test]
    fn test_ema_zero_length_rejected() {
        assert!(matches!(
            Ema::new(0),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_ema_double_update_same_bar_fails() {
        let qs = qs_from_closes(&[10.0]);
        let mut ema = Ema::new(3).unwrap();

        ema.update(&qs).unwrap();
        assert!(matches!(
            ema.update(&qs),
            Err(IndicatorError::Series(_))
        ));
        assert_eq!(ema.series().len(), 1);
    }

    #[test]
    fn test_open_close_stick() {
        let mut qs = QuoteServer::new();
        qs.append(Quote::new(1000, 10.0, 13.0, 9.0, 12.0).unwrap())
            .unwrap();

        // length 3 => multiplier 0.5; seed = close - open
        let mut ocs = OpenCloseStick::new(3).unwrap();
        assert_eq!(ocs.update(&qs).unwrap(), 2.0);

        qs.append(Quote::new(2000, 12.0, 12.5, 9.5, 10.0).unwrap())
            .unwrap();
        // diff = -2, value = 2 + (-2 - 2) * 0.5 = 0
        assert_eq!(ocs.update(&qs).unwrap(), 0.0);
    }

    #[test]
    fn test_high_low_stick() {
        let mut qs = QuoteServer::new();
        qs.append(Quote::new(1000, 10.0, 13.0, 9.0, 12.0).unwrap())
            .unwrap();

        let mut hls = HighLowStick::new(3).unwrap();
        let first = hls.update(&qs).unwrap();
        assert_eq!(first.lower, 3.0); // close - low
        assert_eq!(first.upper, 1.0); // high - close

        qs.append(Quote::new(2000, 12.0, 15.0, 11.0, 11.0).unwrap())
            .unwrap();
        let second = hls.update(&qs).unwrap();
        // lower: 3 + (0 - 3) * 0.5 = 1.5; upper: 1 + (4 - 1) * 0.5 = 2.5
        assert_eq!(second.lower, 1.5);
        assert_eq!(second.upper, 2.5);
    }
}
