//! Market data and order types.

mod order;
mod period;
mod quote;
mod quote_server;
mod security;
mod series;

pub use order::{OrderKind, OrderLabel, OrderRequest};
pub use period::BarPeriod;
pub use quote::{AppliedPrice, Quote};
pub use quote_server::QuoteServer;
pub use security::{PriceMap, Security};
pub use series::{TimeSeries, TimedValue};
