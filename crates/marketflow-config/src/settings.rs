//! Configuration structures.
//!
//! All values are fixed at process start and passed by reference into the
//! dispatcher and trader constructors; nothing here is globally mutable.

use marketflow_core::error::MarketError;
use marketflow_core::types::{BarPeriod, Security};
use marketflow_traders::LiveTraderConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub market: MarketSettings,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(default)]
    pub trader: LiveTraderConfig,
}

impl AppConfig {
    /// Cross-field validation beyond what serde enforces.
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.market.securities.is_empty() {
            return Err(MarketError::Config(
                "at least one security must be configured".into(),
            ));
        }
        if self.market.history_lookback_bars == 0 {
            return Err(MarketError::Config(
                "history lookback must cover at least one bar".into(),
            ));
        }
        self.trader.validate()
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "marketflow".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// One configured tradable security.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEntry {
    pub symbol: String,
    pub pip_value: f64,
    pub min_units: f64,
}

impl From<&SecurityEntry> for Security {
    fn from(entry: &SecurityEntry) -> Self {
        Security::new(entry.symbol.clone(), entry.pip_value, entry.min_units)
    }
}

/// Market-data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSettings {
    /// Fixed bar granularity of the feed.
    pub bar_period: BarPeriod,
    /// Bars of history replayed before live delivery starts.
    pub history_lookback_bars: usize,
    pub securities: Vec<SecurityEntry>,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            bar_period: BarPeriod::Minute5,
            history_lookback_bars: 288,
            securities: Vec::new(),
        }
    }
}

/// Dispatch and worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// Max concurrently running trader reactions.
    pub max_workers: usize,
    /// Per-trader event queue depth.
    pub queue_depth: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            max_workers: 4,
            queue_depth: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_need_securities() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.market.securities.push(SecurityEntry {
            symbol: "EURUSD".to_string(),
            pip_value: 0.0001,
            min_units: 1000.0,
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_security_conversion() {
        let entry = SecurityEntry {
            symbol: "EURUSD".to_string(),
            pip_value: 0.0001,
            min_units: 1000.0,
        };
        let security = Security::from(&entry);
        assert_eq!(security.symbol(), "EURUSD");
    }

    #[test]
    fn test_toml_roundtrip() {
        let toml = r#"
            [market]
            bar_period = "1h"
            history_lookback_bars = 48

            [[market.securities]]
            symbol = "EURUSD"
            pip_value = 0.0001
            min_units = 1000.0

            [dispatch]
            max_workers = 8
            queue_depth = 32
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.market.bar_period, BarPeriod::Hour1);
        assert_eq!(config.dispatch.max_workers, 8);
        assert_eq!(config.market.securities.len(), 1);
        assert!(config.validate().is_ok());
    }
}
