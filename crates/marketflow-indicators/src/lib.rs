//! Incremental technical indicators.
//!
//! Every indicator consumes one new bar per update from a [`QuoteServer`]
//! and appends exactly one value to its own derived time series, computed
//! from prior state rather than by rescanning history:
//! - Moving averages (EMA and the open/close, high/low stick averages)
//! - Momentum (Stochastic %K, RSI, MACD, CCI)
//! - Volatility (ATR, windowed min/max, mean/standard deviation)
//!
//! [`QuoteServer`]: marketflow_core::types::QuoteServer

pub mod base;
pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use base::Indicator;
pub use momentum::{Cci, Macd, MacdOutput, Rsi, StochasticK};
pub use moving_average::{Ema, HighLowStick, OpenCloseStick, StickOutput};
pub use volatility::{Atr, MeanStdDev, MeanStdDevOutput, MinMax, MinMaxOutput};
