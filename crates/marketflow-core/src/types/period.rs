//! Bar period definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed bar granularity, selected at deployment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BarPeriod {
    #[serde(rename = "5m")]
    #[default]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Daily,
}

impl BarPeriod {
    /// Duration of one bar in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            BarPeriod::Minute5 => 300,
            BarPeriod::Minute15 => 900,
            BarPeriod::Hour1 => 3600,
            BarPeriod::Hour4 => 14400,
            BarPeriod::Daily => 86400,
        }
    }

    /// Duration of one bar in milliseconds, the unit of quote timestamps.
    pub fn as_millis(&self) -> i64 {
        self.as_secs() as i64 * 1000
    }

    /// Window duration covering `bars` consecutive bars, in milliseconds.
    pub fn window_millis(&self, bars: usize) -> i64 {
        self.as_millis() * bars as i64
    }
}

impl fmt::Display for BarPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BarPeriod::Minute5 => "5m",
            BarPeriod::Minute15 => "15m",
            BarPeriod::Hour1 => "1h",
            BarPeriod::Hour4 => "4h",
            BarPeriod::Daily => "1d",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BarPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "5m" | "5min" => Ok(BarPeriod::Minute5),
            "15m" | "15min" => Ok(BarPeriod::Minute15),
            "1h" | "hour" => Ok(BarPeriod::Hour1),
            "4h" => Ok(BarPeriod::Hour4),
            "1d" | "daily" => Ok(BarPeriod::Daily),
            _ => Err(format!("Invalid bar period: {}", s)),
        }
    }
}
