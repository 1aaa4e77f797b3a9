//! CSV bar feed.
//!
//! Rows are grouped by timestamp into per-tick price maps, one map per
//! bar-close across all configured securities. Symbols absent from the
//! configuration are skipped.

use csv::ReaderBuilder;
use marketflow_core::error::{MarketError, MarketResult};
use marketflow_core::types::{PriceMap, Quote, Security};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct FeedRecord {
    #[serde(alias = "Symbol")]
    symbol: String,
    /// Unix milliseconds.
    #[serde(alias = "Time", alias = "timestamp", alias = "Timestamp")]
    time: i64,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
}

/// An in-memory replayable bar feed.
pub struct BarFeed {
    ticks: Vec<(i64, PriceMap)>,
}

impl BarFeed {
    /// Load and group bars for the configured securities.
    pub fn load(path: &Path, securities: &[Security]) -> MarketResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, securities)
    }

    /// Parse bars out of any CSV source.
    pub fn from_reader(source: impl Read, securities: &[Security]) -> MarketResult<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(source);

        let by_symbol: HashMap<&str, &Security> =
            securities.iter().map(|s| (s.symbol(), s)).collect();

        let mut ticks: BTreeMap<i64, PriceMap> = BTreeMap::new();
        for result in reader.deserialize() {
            let record: FeedRecord = result.map_err(|e| MarketError::Feed(e.to_string()))?;
            let Some(&security) = by_symbol.get(record.symbol.as_str()) else {
                continue;
            };

            let quote = Quote::new(
                record.time,
                record.open,
                record.high,
                record.low,
                record.close,
            )?;
            ticks
                .entry(record.time)
                .or_default()
                .insert(security.clone(), quote);
        }

        if ticks.is_empty() {
            return Err(MarketError::Feed("no usable bars in feed".into()));
        }

        Ok(Self {
            ticks: ticks.into_iter().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Split into the historical prefix and the live remainder.
    pub fn split_lookback(&self, lookback: usize) -> (&[(i64, PriceMap)], &[(i64, PriceMap)]) {
        self.ticks.split_at(lookback.min(self.ticks.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn securities() -> Vec<Security> {
        vec![
            Security::new("EURUSD", 0.0001, 1000.0),
            Security::new("USDJPY", 0.01, 1000.0),
        ]
    }

    #[test]
    fn test_groups_rows_by_timestamp() {
        let csv = "symbol,time,open,high,low,close\n\
                   EURUSD,1000,1.0,1.2,0.9,1.1\n\
                   USDJPY,1000,100.0,101.0,99.0,100.5\n\
                   EURUSD,2000,1.1,1.3,1.0,1.2\n";

        let feed = BarFeed::from_reader(csv.as_bytes(), &securities()).unwrap();
        assert_eq!(feed.len(), 2);

        let (history, live) = feed.split_lookback(1);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].1.len(), 2); // both securities share the tick
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].0, 2000);
    }

    #[test]
    fn test_unconfigured_symbols_skipped() {
        let csv = "symbol,time,open,high,low,close\n\
                   GBPUSD,1000,1.0,1.2,0.9,1.1\n\
                   EURUSD,1000,1.0,1.2,0.9,1.1\n";

        let feed = BarFeed::from_reader(csv.as_bytes(), &securities()).unwrap();
        let (history, _) = feed.split_lookback(feed.len());
        assert_eq!(history[0].1.len(), 1);
    }

    #[test]
    fn test_invalid_ohlc_rejected() {
        let csv = "symbol,time,open,high,low,close\n\
                   EURUSD,1000,1.0,0.8,0.9,1.1\n";

        assert!(BarFeed::from_reader(csv.as_bytes(), &securities()).is_err());
    }

    #[test]
    fn test_empty_feed_rejected() {
        let csv = "symbol,time,open,high,low,close\n";
        assert!(BarFeed::from_reader(csv.as_bytes(), &securities()).is_err());
    }
}
