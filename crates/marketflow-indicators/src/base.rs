//! Indicator base contract.

use marketflow_core::error::IndicatorError;
use marketflow_core::types::{AppliedPrice, QuoteServer, TimeSeries};

/// An incremental computation over a quote server.
///
/// An indicator owns its derived series. Each successful update appends
/// exactly one value stamped with the newest bar's time and returns it, so
/// the derived series stays aligned with the bars that produced it. Updates
/// read only the bars the algorithm's window requires; per-bar cost never
/// depends on total history length.
pub trait Indicator: Send {
    type Output: Clone;

    /// Consume the newest bar of `quotes` and extend the derived series.
    ///
    /// Precondition: `quotes` holds at least one bar. Calling twice for the
    /// same bar fails with an ordering violation from the derived series.
    fn update(&mut self, quotes: &QuoteServer) -> Result<Self::Output, IndicatorError>;

    /// The derived series.
    fn series(&self) -> &TimeSeries<Self::Output>;

    /// Newest derived value, if any update has succeeded yet.
    fn last(&self) -> Option<Self::Output> {
        self.series()
            .last_value()
            .ok()
            .map(|entry| entry.value.clone())
    }

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

/// Reject non-positive lengths at construction time.
pub(crate) fn check_length(name: &str, length: usize) -> Result<(), IndicatorError> {
    if length == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{}: length must be >= 1",
            name
        )));
    }
    Ok(())
}

/// Smoothing multiplier `2 / (length + 1)`.
pub(crate) fn ema_multiplier(length: usize) -> f64 {
    2.0 / (length as f64 + 1.0)
}

/// Mean and standard deviation of the applied price over the most recent
/// `min(len, length)` bars. The deviation is floored at 0.001 to keep
/// downstream ratios finite on flat windows.
pub(crate) fn window_mean_std(
    quotes: &QuoteServer,
    length: usize,
    applied: AppliedPrice,
) -> Result<(f64, f64), IndicatorError> {
    let scan = quotes.len().min(length);
    if scan == 0 {
        return Err(IndicatorError::InsufficientData {
            required: 1,
            available: 0,
        });
    }

    let mut mean = 0.0;
    let mut mean_square = 0.0;
    for age in 0..scan {
        let price = quotes.value_back(age)?.price(applied);
        mean += price / scan as f64;
        mean_square += price * price / scan as f64;
    }

    let mut std_dev = 0.001;
    if mean_square > mean * mean {
        std_dev = (mean_square - mean * mean).sqrt();
    }
    Ok((mean, std_dev))
}
