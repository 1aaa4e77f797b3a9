//! Momentum indicators.

use crate::base::{check_length, ema_multiplier, window_mean_std, Indicator};
use marketflow_core::error::IndicatorError;
use marketflow_core::types::{AppliedPrice, QuoteServer, TimeSeries};
use serde::{Deserialize, Serialize};

/// Stochastic oscillator %K.
///
/// Scans the most recent `min(len, length)` bars for the running high/low
/// and locates the current close within that range.
#[derive(Debug, Clone)]
pub struct StochasticK {
    length: usize,
    values: TimeSeries<f64>,
}

impl StochasticK {
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        check_length("StochasticK", length)?;
        Ok(Self {
            length,
            values: TimeSeries::new(),
        })
    }
}

impl Indicator for StochasticK {
    type Output = f64;

    fn update(&mut self, quotes: &QuoteServer) -> Result<f64, IndicatorError> {
        let bar = *quotes.last_value()?;

        let scan = quotes.len().min(self.length);
        let mut max = bar.high();
        let mut min = bar.low();
        for age in 0..scan {
            let b = quotes.value_back(age)?;
            max = max.max(b.high());
            min = min.min(b.low());
        }

        // Zero range would divide by zero; callers pick the fallback policy.
        if max == min {
            return Err(IndicatorError::DegenerateRange { time: bar.time() });
        }

        let value = (bar.close() - min) / (max - min) * 100.0;
        self.values.append(bar.time(), value)?;
        Ok(value)
    }

    fn series(&self) -> &TimeSeries<f64> {
        &self.values
    }

    fn name(&self) -> &str {
        "STO"
    }
}

/// Relative Strength Index.
///
/// Up/down averages are EMA-smoothed and seeded at 0.01, then
/// `100 - 100 / (1 + avg_up / avg_dn)`.
#[derive(Debug, Clone)]
pub struct Rsi {
    multiplier: f64,
    applied: AppliedPrice,
    avg_up: f64,
    avg_dn: f64,
    values: TimeSeries<f64>,
}

impl Rsi {
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        Self::with_applied(length, AppliedPrice::Close)
    }

    pub fn with_applied(length: usize, applied: AppliedPrice) -> Result<Self, IndicatorError> {
        check_length("RSI", length)?;
        Ok(Self {
            multiplier: ema_multiplier(length),
            applied,
            avg_up: 0.0,
            avg_dn: 0.0,
            values: TimeSeries::new(),
        })
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn update(&mut self, quotes: &QuoteServer) -> Result<f64, IndicatorError> {
        let bar = *quotes.last_value()?;

        if self.values.is_empty() {
            self.avg_up = 0.01;
            self.avg_dn = 0.01;
        } else {
            let change =
                bar.price(self.applied) - quotes.value_back(1)?.price(self.applied);
            self.avg_up += (change.max(0.0) - self.avg_up) * self.multiplier;
            self.avg_dn += ((-change).max(0.0) - self.avg_dn) * self.multiplier;
        }

        let value = 100.0 - 100.0 / (1.0 + self.avg_up / self.avg_dn);
        self.values.append(bar.time(), value)?;
        Ok(value)
    }

    fn series(&self) -> &TimeSeries<f64> {
        &self.values
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD line and its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// Fast EMA minus slow EMA.
    pub macd: f64,
    /// EMA of the MACD line.
    pub signal: f64,
}

/// Moving Average Convergence Divergence.
///
/// Three incremental EMAs: fast and slow over the applied price, the
/// signal over their difference (seeded at zero).
#[derive(Debug, Clone)]
pub struct Macd {
    fast_multiplier: f64,
    slow_multiplier: f64,
    signal_multiplier: f64,
    applied: AppliedPrice,
    fast_ema: f64,
    slow_ema: f64,
    signal_ema: f64,
    values: TimeSeries<MacdOutput>,
}

impl Macd {
    /// Create a MACD with the conventional (12, 26, 9) lengths.
    pub fn new() -> Result<Self, IndicatorError> {
        Self::with_lengths(12, 26, 9, AppliedPrice::Close)
    }

    pub fn with_lengths(
        fast: usize,
        slow: usize,
        signal: usize,
        applied: AppliedPrice,
    ) -> Result<Self, IndicatorError> {
        check_length("MACD fast", fast)?;
        check_length("MACD slow", slow)?;
        check_length("MACD signal", signal)?;
        if fast >= slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD: fast length {} must be below slow length {}",
                fast, slow
            )));
        }
        Ok(Self {
            fast_multiplier: ema_multiplier(fast),
            slow_multiplier: ema_multiplier(slow),
            signal_multiplier: ema_multiplier(signal),
            applied,
            fast_ema: 0.0,
            slow_ema: 0.0,
            signal_ema: 0.0,
            values: TimeSeries::new(),
        })
    }
}

impl Indicator for Macd {
    type Output = MacdOutput;

    fn update(&mut self, quotes: &QuoteServer) -> Result<MacdOutput, IndicatorError> {
        let bar = *quotes.last_value()?;
        let price = bar.price(self.applied);

        if self.values.is_empty() {
            self.fast_ema = price;
            self.slow_ema = price;
            self.signal_ema = 0.0;
        } else {
            self.fast_ema += (price - self.fast_ema) * self.fast_multiplier;
            self.slow_ema += (price - self.slow_ema) * self.slow_multiplier;
            self.signal_ema +=
                ((self.fast_ema - self.slow_ema) - self.signal_ema) * self.signal_multiplier;
        }

        let value = MacdOutput {
            macd: self.fast_ema - self.slow_ema,
            signal: self.signal_ema,
        };
        self.values.append(bar.time(), value)?;
        Ok(value)
    }

    fn series(&self) -> &TimeSeries<MacdOutput> {
        &self.values
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Commodity Channel Index over the typical price by default.
#[derive(Debug, Clone)]
pub struct Cci {
    length: usize,
    applied: AppliedPrice,
    values: TimeSeries<f64>,
}

impl Cci {
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        Self::with_applied(length, AppliedPrice::Typical)
    }

    pub fn with_applied(length: usize, applied: AppliedPrice) -> Result<Self, IndicatorError> {
        check_length("CCI", length)?;
        Ok(Self {
            length,
            applied,
            values: TimeSeries::new(),
        })
    }
}

impl Indicator for Cci {
    type Output = f64;

    fn update(&mut self, quotes: &QuoteServer) -> Result<f64, IndicatorError> {
        let bar = *quotes.last_value()?;
        let (mean, std_dev) = window_mean_std(quotes, self.length, self.applied)?;

        let price = bar.price(self.applied);
        let value = (price - mean) / (0.015 * std_dev);

        self.values.append(bar.time(), value)?;
        Ok(value)
    }

    fn series(&self) -> &TimeSeries<f64> {
        &self.values
    }

    fn name(&self) -> &str {
        "CCI"
    }
}
