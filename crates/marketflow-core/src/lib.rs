//! Core types and traits for the market engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Quote, TimeSeries, QuoteServer)
//! - Security identities and order types
//! - The trader and broker contracts
//! - The log collaborator surface

pub mod error;
pub mod log;
pub mod traits;
pub mod types;

pub use error::{MarketError, MarketResult};
pub use log::{EventLog, Priority};
pub use traits::*;
pub use types::*;
