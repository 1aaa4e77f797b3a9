//! Dispatcher integration tests: exactly-once registration, broadcast
//! delivery, and per-trader event ordering.

use marketflow_core::error::{BrokerError, DispatchError};
use marketflow_core::log::{EventLog, Priority};
use marketflow_core::traits::{Broker, Trader};
use marketflow_core::types::{OrderLabel, OrderRequest, PriceMap, Quote, Security};
use marketflow_dispatch::{AssetDispatcher, WorkerPool};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Broker stub recording log lines.
#[derive(Default)]
struct RecordingBroker {
    lines: Mutex<Vec<(String, Priority)>>,
}

impl RecordingBroker {
    fn lines_matching(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(line, _)| line.contains(needle))
            .count()
    }
}

impl EventLog for RecordingBroker {
    fn log(&self, message: &str, priority: Priority) {
        self.lines
            .lock()
            .unwrap()
            .push((message.to_string(), priority));
    }
}

impl Broker for RecordingBroker {
    fn submit_order(&self, _request: &OrderRequest) -> Result<OrderLabel, BrokerError> {
        Ok(OrderLabel::generate())
    }

    fn close_order(&self, _label: &OrderLabel) -> Result<(), BrokerError> {
        Ok(())
    }

    fn is_open(&self, _label: &OrderLabel) -> bool {
        false
    }

    fn stop_brokers(&self) {}
}

/// Trader recording every event it sees, optionally slowly.
struct RecordingTrader {
    symbol: String,
    events: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl RecordingTrader {
    fn record(&self, kind: &str, prices: Option<&PriceMap>) {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let time = prices
            .and_then(|p| p.values().next())
            .map(|q| q.time())
            .unwrap_or(0);
        self.events
            .lock()
            .unwrap()
            .push(format!("{}:{}:{}", self.symbol, kind, time));
    }
}

impl Trader for RecordingTrader {
    fn on_history(&mut self, prices: &PriceMap) {
        self.record("history", Some(prices));
    }

    fn on_bar(&mut self, prices: &PriceMap) {
        self.record("bar", Some(prices));
    }

    fn on_stop(&mut self) {
        self.record("stop", None);
    }
}

fn security(symbol: &str) -> Security {
    Security::new(symbol, 0.0001, 1000.0)
}

fn bar_map(securities: &[Security], time: i64) -> PriceMap {
    securities
        .iter()
        .map(|s| (s.clone(), Quote::tick(time, 1.0).unwrap()))
        .collect()
}

struct Harness {
    broker: Arc<RecordingBroker>,
    dispatcher: AssetDispatcher,
    events: Arc<Mutex<Vec<String>>>,
    created: Arc<AtomicUsize>,
}

fn harness(queue_depth: usize, delay: Option<Duration>) -> Harness {
    let broker: Arc<RecordingBroker> = Arc::new(RecordingBroker::default());
    let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let created = Arc::new(AtomicUsize::new(0));

    let factory_events = Arc::clone(&events);
    let factory_created = Arc::clone(&created);
    let dispatcher = AssetDispatcher::new(
        Arc::clone(&broker) as Arc<dyn Broker>,
        WorkerPool::new(4),
        queue_depth,
        move |_broker, sec| {
            factory_created.fetch_add(1, Ordering::SeqCst);
            Box::new(RecordingTrader {
                symbol: sec.symbol().to_string(),
                events: Arc::clone(&factory_events),
                delay,
            })
        },
    );

    Harness {
        broker,
        dispatcher,
        events,
        created,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registration_creates_one_trader() {
    let h = Arc::new(harness(16, None));
    let asset = security("EURUSD");

    let mut joins = Vec::new();
    for _ in 0..8 {
        let h = Arc::clone(&h);
        let asset = asset.clone();
        joins.push(tokio::spawn(async move {
            h.dispatcher.register_asset(asset).unwrap();
        }));
    }
    for join in joins {
        join.await.unwrap();
    }

    assert_eq!(h.created.load(Ordering::SeqCst), 1);
    assert_eq!(h.dispatcher.asset_count(), 1);
    assert_eq!(h.broker.lines_matching("Added trading asset: EURUSD"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn broadcast_bar_reaches_every_trader_exactly_once() {
    let h = harness(16, None);
    let assets = [security("EURUSD"), security("USDJPY"), security("GBPUSD")];
    for asset in &assets {
        h.dispatcher.register_asset(asset.clone()).unwrap();
    }

    h.dispatcher.broadcast_bar(bar_map(&assets, 1000)).await.unwrap();
    h.dispatcher.stop_all().await.unwrap();

    let events = h.events.lock().unwrap();
    for asset in &assets {
        let bars = events
            .iter()
            .filter(|e| **e == format!("{}:bar:1000", asset.symbol()))
            .count();
        assert_eq!(bars, 1, "{} must see the bar exactly once", asset.symbol());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn per_trader_events_stay_ordered() {
    let h = harness(16, None);
    let asset = security("EURUSD");
    h.dispatcher.register_asset(asset.clone()).unwrap();

    let assets = [asset];
    h.dispatcher
        .broadcast_history(bar_map(&assets, 500))
        .await
        .unwrap();
    for time in [1000, 2000, 3000] {
        h.dispatcher.broadcast_bar(bar_map(&assets, time)).await.unwrap();
    }
    h.dispatcher.stop_all().await.unwrap();

    let events = h.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            "EURUSD:history:500".to_string(),
            "EURUSD:bar:1000".to_string(),
            "EURUSD:bar:2000".to_string(),
            "EURUSD:bar:3000".to_string(),
            "EURUSD:stop:0".to_string(),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn full_queue_applies_backpressure_without_loss() {
    // depth 1 and a slow trader: broadcasts must wait, never drop
    let h = harness(1, Some(Duration::from_millis(20)));
    let assets = [security("EURUSD")];
    h.dispatcher.register_asset(assets[0].clone()).unwrap();

    for time in [1000, 2000, 3000, 4000, 5000] {
        h.dispatcher.broadcast_bar(bar_map(&assets, time)).await.unwrap();
    }
    h.dispatcher.stop_all().await.unwrap();

    let events = h.events.lock().unwrap();
    let bars: Vec<&String> = events.iter().filter(|e| e.contains(":bar:")).collect();
    assert_eq!(bars.len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn registration_after_stop_is_rejected() {
    let h = harness(16, None);
    h.dispatcher.register_asset(security("EURUSD")).unwrap();
    h.dispatcher.stop_all().await.unwrap();

    assert_eq!(
        h.dispatcher.register_asset(security("USDJPY")),
        Err(DispatchError::Stopped)
    );
    assert_eq!(
        h.dispatcher.broadcast_bar(PriceMap::new()).await,
        Err(DispatchError::Stopped)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stop_delivers_terminal_event_to_every_trader() {
    let h = harness(16, None);
    let assets = [security("EURUSD"), security("USDJPY")];
    for asset in &assets {
        h.dispatcher.register_asset(asset.clone()).unwrap();
    }

    h.dispatcher.stop_all().await.unwrap();

    let events = h.events.lock().unwrap();
    for asset in &assets {
        assert!(events.contains(&format!("{}:stop:0", asset.symbol())));
    }
}
