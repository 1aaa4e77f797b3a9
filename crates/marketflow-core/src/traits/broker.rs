//! The broker collaborator contract.

use crate::error::BrokerError;
use crate::log::EventLog;
use crate::types::{OrderLabel, OrderRequest};

/// Order routing surface consumed by traders.
///
/// The engine only consumes this contract; concrete implementations live
/// outside the core (the in-memory paper broker ships for simulation and
/// tests). Brokers double as the log collaborator, so every trader holds a
/// single handle for both concerns.
pub trait Broker: EventLog + Send + Sync {
    /// Submit an order, returning the label identifying it.
    fn submit_order(&self, request: &OrderRequest) -> Result<OrderLabel, BrokerError>;

    /// Close a previously submitted order.
    fn close_order(&self, label: &OrderLabel) -> Result<(), BrokerError>;

    /// Whether the order behind `label` is still open.
    fn is_open(&self, label: &OrderLabel) -> bool;

    /// Shut down broker connectivity; subsequent submissions fail.
    fn stop_brokers(&self);
}
