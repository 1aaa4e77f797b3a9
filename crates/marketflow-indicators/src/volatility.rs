//! Volatility indicators.

use crate::base::{check_length, ema_multiplier, window_mean_std, Indicator};
use marketflow_core::error::IndicatorError;
use marketflow_core::types::{AppliedPrice, QuoteServer, TimeSeries};
use serde::{Deserialize, Serialize};

/// Average True Range, EMA-smoothed.
///
/// `true_range = max(high, prev_close) - min(low, prev_close)`; the seed
/// update has no prior close and uses the bar's own range.
#[derive(Debug, Clone)]
pub struct Atr {
    multiplier: f64,
    values: TimeSeries<f64>,
}

impl Atr {
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        check_length("ATR", length)?;
        Ok(Self {
            multiplier: ema_multiplier(length),
            values: TimeSeries::new(),
        })
    }
}

impl Indicator for Atr {
    type Output = f64;

    fn update(&mut self, quotes: &QuoteServer) -> Result<f64, IndicatorError> {
        let bar = *quotes.last_value()?;

        let value = match self.values.last_value() {
            Ok(prev) => {
                let prev_close = quotes.value_back(1)?.close();
                let true_range = bar.high().max(prev_close) - bar.low().min(prev_close);
                prev.value + (true_range - prev.value) * self.multiplier
            }
            Err(_) => bar.range(),
        };

        self.values.append(bar.time(), value)?;
        Ok(value)
    }

    fn series(&self) -> &TimeSeries<f64> {
        &self.values
    }

    fn name(&self) -> &str {
        "ATR"
    }
}

/// Extremes of the lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxOutput {
    /// Lowest low of the window.
    pub min: f64,
    /// Highest high of the window.
    pub max: f64,
}

/// Min/max of the period.
#[derive(Debug, Clone)]
pub struct MinMax {
    length: usize,
    values: TimeSeries<MinMaxOutput>,
}

impl MinMax {
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        check_length("MinMax", length)?;
        Ok(Self {
            length,
            values: TimeSeries::new(),
        })
    }
}

impl Indicator for MinMax {
    type Output = MinMaxOutput;

    fn update(&mut self, quotes: &QuoteServer) -> Result<MinMaxOutput, IndicatorError> {
        let bar = *quotes.last_value()?;

        let scan = quotes.len().min(self.length);
        let mut min = bar.low();
        let mut max = bar.high();
        for age in 0..scan {
            let b = quotes.value_back(age)?;
            min = min.min(b.low());
            max = max.max(b.high());
        }

        let value = MinMaxOutput { min, max };
        self.values.append(bar.time(), value)?;
        Ok(value)
    }

    fn series(&self) -> &TimeSeries<MinMaxOutput> {
        &self.values
    }

    fn name(&self) -> &str {
        "MMX"
    }
}

/// Windowed mean and dispersion of the applied price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanStdDevOutput {
    pub mean: f64,
    /// Standard deviation, floored at 0.001.
    pub std_dev: f64,
}

/// Mean and standard deviation of the period (Bollinger-style base).
#[derive(Debug, Clone)]
pub struct MeanStdDev {
    length: usize,
    applied: AppliedPrice,
    values: TimeSeries<MeanStdDevOutput>,
}

impl MeanStdDev {
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        Self::with_applied(length, AppliedPrice::Close)
    }

    pub fn with_applied(length: usize, applied: AppliedPrice) -> Result<Self, IndicatorError> {
        check_length("MeanStdDev", length)?;
        Ok(Self {
            length,
            applied,
            values: TimeSeries::new(),
        })
    }
}

impl Indicator for MeanStdDev {
    type Output = MeanStdDevOutput;

    fn update(&mut self, quotes: &QuoteServer) -> Result<MeanStdDevOutput, IndicatorError> {
        let bar = *quotes.last_value()?;
        let (mean, std_dev) = window_mean_std(quotes, self.length, self.applied)?;

        let value = MeanStdDevOutput { mean, std_dev };
        self.values.append(bar.time(), value)?;
        Ok(value)
    }

    fn series(&self) -> &TimeSeries<MeanStdDevOutput> {
        &self.values
    }

    fn name(&self) -> &str {
        "EMSD"
    }
}
