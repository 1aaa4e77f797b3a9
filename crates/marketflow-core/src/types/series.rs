//! Append-only, randomly-indexable time series.

use crate::error::SeriesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One timestamped entry of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedValue<T> {
    /// Unix milliseconds.
    pub time: i64,
    pub value: T,
}

impl<T: fmt::Display> fmt::Display for TimedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time: {}, Value: {}", self.time, self.value)
    }
}

/// Ordered, append-only sequence of timestamped values.
///
/// Supports age-indexed lookups (0 = newest) and time-windowed lookups.
/// History is immutable: once appended, an entry never changes.
#[derive(Debug, Clone)]
pub struct TimeSeries<T> {
    values: Vec<TimedValue<T>>,
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimeSeries<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append an entry. Timestamps must be strictly increasing; on failure
    /// the series is left unmodified.
    pub fn append(&mut self, time: i64, value: T) -> Result<(), SeriesError> {
        if let Some(last) = self.values.last() {
            if time <= last.time {
                return Err(SeriesError::OrderingViolation {
                    time,
                    last: last.time,
                });
            }
        }
        self.values.push(TimedValue { time, value });
        Ok(())
    }

    /// Age-indexed lookup from the end; age 0 is the newest entry.
    pub fn value_back(&self, age: usize) -> Result<&TimedValue<T>, SeriesError> {
        let size = self.values.len();
        if age >= size {
            return Err(SeriesError::OutOfRange {
                position: age,
                size,
            });
        }
        Ok(&self.values[size - 1 - age])
    }

    /// Index-indexed lookup from the start; index 0 is the oldest entry.
    pub fn value_forward(&self, index: usize) -> Result<&TimedValue<T>, SeriesError> {
        self.values.get(index).ok_or(SeriesError::OutOfRange {
            position: index,
            size: self.values.len(),
        })
    }

    /// The most recently appended entry.
    pub fn last_value(&self) -> Result<&TimedValue<T>, SeriesError> {
        self.values.last().ok_or(SeriesError::Empty)
    }

    /// Chronological entries with `time >= last_time - period`.
    ///
    /// Requires at least one prior append. `value_list(0)` yields exactly
    /// the newest entry.
    pub fn value_list(&self, period: i64) -> Result<&[TimedValue<T>], SeriesError> {
        let last = self.last_value()?;
        let cutoff = last.time - period;
        // Times are strictly increasing, so the window is a suffix.
        let start = self.values.partition_point(|entry| entry.time < cutoff);
        Ok(&self.values[start..])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedValue<T>> {
        self.values.iter()
    }
}
