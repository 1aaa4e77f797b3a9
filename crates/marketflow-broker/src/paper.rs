//! Paper broker for simulation and tests.

use marketflow_core::error::BrokerError;
use marketflow_core::log::{EventLog, Priority};
use marketflow_core::traits::Broker;
use marketflow_core::types::{OrderLabel, OrderRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, error, info, trace, warn};

struct PaperOrder {
    request: OrderRequest,
    open: bool,
}

/// In-memory broker: every accepted order fills at its request price and
/// stays open until closed. Doubles as the log collaborator, forwarding
/// messages that pass the configured threshold to the tracing subscriber.
pub struct PaperBroker {
    orders: Mutex<HashMap<OrderLabel, PaperOrder>>,
    stopped: AtomicBool,
    threshold: Priority,
}

impl PaperBroker {
    pub fn new(threshold: Priority) -> Self {
        Self {
            orders: Mutex::new(HashMap::new()),
            stopped: AtomicBool::new(false),
            threshold,
        }
    }

    /// Number of currently open orders.
    pub fn open_order_count(&self) -> usize {
        self.orders
            .lock()
            .unwrap()
            .values()
            .filter(|order| order.open)
            .count()
    }
}

impl Default for PaperBroker {
    fn default() -> Self {
        Self::new(Priority::Info)
    }
}

impl EventLog for PaperBroker {
    fn log(&self, message: &str, priority: Priority) {
        if !self.threshold.is_allowed(priority) {
            return;
        }
        match priority {
            Priority::All | Priority::Trace => trace!(target: "broker", "{}", message),
            Priority::Debug => debug!(target: "broker", "{}", message),
            Priority::Info => info!(target: "broker", "{}", message),
            Priority::Warn => warn!(target: "broker", "{}", message),
            Priority::Error | Priority::Fatal => error!(target: "broker", "{}", message),
            Priority::Off => {}
        }
    }
}

impl Broker for PaperBroker {
    fn submit_order(&self, request: &OrderRequest) -> Result<OrderLabel, BrokerError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(BrokerError::Stopped);
        }
        if request.amount <= 0.0 || !request.amount.is_finite() {
            return Err(BrokerError::OrderRejected(format!(
                "invalid amount {}",
                request.amount
            )));
        }
        if !request.price.is_finite() {
            return Err(BrokerError::OrderRejected(format!(
                "invalid price {}",
                request.price
            )));
        }

        let label = OrderLabel::generate();
        self.log(
            &format!(
                "Filled {} {} x {} @ {} [{}]",
                request.kind, request.security, request.amount, request.price, label
            ),
            Priority::Info,
        );
        self.orders.lock().unwrap().insert(
            label.clone(),
            PaperOrder {
                request: request.clone(),
                open: true,
            },
        );
        Ok(label)
    }

    fn close_order(&self, label: &OrderLabel) -> Result<(), BrokerError> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .get_mut(label)
            .ok_or_else(|| BrokerError::OrderNotFound(label.to_string()))?;
        if !order.open {
            return Err(BrokerError::OrderRejected(format!(
                "order {} already closed",
                label
            )));
        }
        order.open = false;
        self.log(
            &format!("Closed {} {} [{}]", order.request.kind, order.request.security, label),
            Priority::Info,
        );
        Ok(())
    }

    fn is_open(&self, label: &OrderLabel) -> bool {
        self.orders
            .lock()
            .unwrap()
            .get(label)
            .map(|order| order.open)
            .unwrap_or(false)
    }

    fn stop_brokers(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.log("Paper broker stopped", Priority::Info);
    }
}
