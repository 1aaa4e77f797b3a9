//! Contracts at the seams of the engine.

mod broker;
mod trader;

pub use broker::Broker;
pub use trader::Trader;
