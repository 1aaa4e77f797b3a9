//! Trader implementations.
//!
//! Each trader owns its private quote server and indicator set and reacts
//! to the three dispatch events. [`LiveTrader`] trades an EMA crossover
//! gated by the stochastic oscillator; [`LogTrader`] follows the same
//! market-data path but only traces what it sees.

mod live;
mod log;

pub use live::{LiveTrader, LiveTraderConfig};
pub use log::LogTrader;
