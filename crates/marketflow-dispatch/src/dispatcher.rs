//! Routing of market-data events to per-asset traders.

use crate::events::TraderEvent;
use crate::worker::WorkerPool;
use marketflow_core::error::DispatchError;
use marketflow_core::log::Priority;
use marketflow_core::traits::{Broker, Trader};
use marketflow_core::types::{PriceMap, Security};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Builds the trader bound to one security.
pub type TraderFactory = dyn Fn(Arc<dyn Broker>, Security) -> Box<dyn Trader> + Send + Sync;

struct Slot {
    sender: mpsc::Sender<TraderEvent>,
    handle: JoinHandle<()>,
}

struct Registry {
    slots: HashMap<Security, Slot>,
    stopped: bool,
}

/// Owns the security-to-trader mapping and fans events out.
///
/// Guarantees: exactly one trader per distinct security (registration is
/// an atomic check-then-insert under the registry lock), serialized
/// in-order event delivery per trader (one bounded FIFO channel each),
/// and partial-failure isolation (a dead trader is reported through the
/// log collaborator without disturbing the others).
///
/// The registry lock guards only the map. Broadcasts snapshot the
/// senders, release the lock, then deliver — a slow trader exerts
/// backpressure on its own queue instead of stalling registration or the
/// other traders.
pub struct AssetDispatcher {
    broker: Arc<dyn Broker>,
    factory: Box<TraderFactory>,
    pool: WorkerPool,
    queue_depth: usize,
    registry: Mutex<Registry>,
}

impl AssetDispatcher {
    /// `queue_depth` bounds each trader's event queue; a full queue makes
    /// broadcasts wait (latency, never loss).
    pub fn new(
        broker: Arc<dyn Broker>,
        pool: WorkerPool,
        queue_depth: usize,
        factory: impl Fn(Arc<dyn Broker>, Security) -> Box<dyn Trader> + Send + Sync + 'static,
    ) -> Self {
        Self {
            broker,
            factory: Box::new(factory),
            pool,
            queue_depth: queue_depth.max(1),
            registry: Mutex::new(Registry {
                slots: HashMap::new(),
                stopped: false,
            }),
        }
    }

    /// Register a tradable security. Idempotent: a second registration of
    /// the same security is a no-op, even under concurrent calls.
    ///
    /// Must run inside the tokio runtime that drives the trader tasks.
    pub fn register_asset(&self, security: Security) -> Result<(), DispatchError> {
        let mut registry = self.registry.lock().expect("dispatch registry poisoned");
        if registry.stopped {
            return Err(DispatchError::Stopped);
        }
        if registry.slots.contains_key(&security) {
            return Ok(());
        }

        let trader = (self.factory)(Arc::clone(&self.broker), security.clone());
        let (sender, receiver) = mpsc::channel(self.queue_depth);
        let handle = tokio::spawn(trader_task(
            trader,
            receiver,
            self.pool.clone(),
            security.symbol().to_string(),
        ));
        registry.slots.insert(security.clone(), Slot { sender, handle });
        drop(registry);

        self.broker
            .log(&format!("Added trading asset: {}", security), Priority::Info);
        Ok(())
    }

    /// Deliver a historical batch to every registered trader.
    pub async fn broadcast_history(&self, prices: PriceMap) -> Result<(), DispatchError> {
        self.broadcast(TraderEvent::History(Arc::new(prices))).await
    }

    /// Deliver one live bar to every registered trader.
    pub async fn broadcast_bar(&self, prices: PriceMap) -> Result<(), DispatchError> {
        self.broadcast(TraderEvent::Bar(Arc::new(prices))).await
    }

    async fn broadcast(&self, event: TraderEvent) -> Result<(), DispatchError> {
        let targets = {
            let registry = self.registry.lock().expect("dispatch registry poisoned");
            if registry.stopped {
                return Err(DispatchError::Stopped);
            }
            registry
                .slots
                .iter()
                .map(|(security, slot)| (security.clone(), slot.sender.clone()))
                .collect::<Vec<_>>()
        };

        for (security, sender) in targets {
            // A full queue waits here; a closed one means the trader task
            // died and only that trader misses out.
            if sender.send(event.clone()).await.is_err() {
                let failure = DispatchError::TraderUnavailable {
                    symbol: security.symbol().to_string(),
                    reason: "event queue closed".to_string(),
                };
                self.broker.log(&failure.to_string(), Priority::Warn);
            }
        }
        Ok(())
    }

    /// Deliver a terminal stop to every trader and wait for their queues
    /// to drain. Registration after this fails with
    /// [`DispatchError::Stopped`].
    pub async fn stop_all(&self) -> Result<(), DispatchError> {
        let slots = {
            let mut registry = self.registry.lock().expect("dispatch registry poisoned");
            if registry.stopped {
                return Err(DispatchError::Stopped);
            }
            registry.stopped = true;
            registry.slots.drain().collect::<Vec<_>>()
        };

        for (security, slot) in slots {
            if slot.sender.send(TraderEvent::Stop).await.is_err() {
                let failure = DispatchError::TraderUnavailable {
                    symbol: security.symbol().to_string(),
                    reason: "stopped before receiving the terminal event".to_string(),
                };
                self.broker.log(&failure.to_string(), Priority::Warn);
            }
            drop(slot.sender);
            if slot.handle.await.is_err() {
                let failure = DispatchError::TraderUnavailable {
                    symbol: security.symbol().to_string(),
                    reason: "trader task panicked".to_string(),
                };
                self.broker.log(&failure.to_string(), Priority::Error);
            }
        }
        Ok(())
    }

    /// Number of currently registered traders.
    pub fn asset_count(&self) -> usize {
        self.registry
            .lock()
            .expect("dispatch registry poisoned")
            .slots
            .len()
    }
}

/// Owns one trader and applies its events in arrival order.
async fn trader_task(
    mut trader: Box<dyn Trader>,
    mut receiver: mpsc::Receiver<TraderEvent>,
    pool: WorkerPool,
    symbol: String,
) {
    while let Some(event) = receiver.recv().await {
        let permit = pool.acquire().await;
        match event {
            TraderEvent::History(prices) => trader.on_history(&prices),
            TraderEvent::Bar(prices) => trader.on_bar(&prices),
            TraderEvent::Stop => {
                trader.on_stop();
                drop(permit);
                break;
            }
        }
        drop(permit);
    }
    debug!(symbol, "trader task finished");
}
