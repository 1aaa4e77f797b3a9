//! Trace-only trader.

use marketflow_core::error::{IndicatorError, MarketError};
use marketflow_core::log::Priority;
use marketflow_core::traits::{Broker, Trader};
use marketflow_core::types::{PriceMap, QuoteServer, Security};
use marketflow_indicators::{Ema, Indicator, StochasticK};
use std::sync::Arc;

/// Follows the same market-data path as a live trader but only traces the
/// indicator readings; it never submits orders. Useful for dry runs and
/// for watching a new security before enabling trading on it.
pub struct LogTrader {
    broker: Arc<dyn Broker>,
    security: Security,
    quotes: QuoteServer,
    ema: Ema,
    stochastic: StochasticK,
    bars_seen: usize,
}

impl LogTrader {
    pub fn new(
        broker: Arc<dyn Broker>,
        security: Security,
        ema_length: usize,
        stochastic_length: usize,
    ) -> Result<Self, MarketError> {
        let ema = Ema::new(ema_length)?;
        let stochastic = StochasticK::new(stochastic_length)?;
        Ok(Self {
            broker,
            security,
            quotes: QuoteServer::new(),
            ema,
            stochastic,
            bars_seen: 0,
        })
    }

    fn ingest(&mut self, prices: &PriceMap) -> bool {
        let Some(quote) = prices.get(&self.security) else {
            return false;
        };
        if let Err(err) = self.quotes.append(*quote) {
            self.broker.log(
                &format!("Discarded stale bar for {}: {}", self.security, err),
                Priority::Warn,
            );
            return false;
        }

        let ema = self.ema.update(&self.quotes).ok();
        let k = match self.stochastic.update(&self.quotes) {
            Ok(k) => Some(k),
            Err(IndicatorError::DegenerateRange { .. }) => self.stochastic.last(),
            Err(_) => None,
        };

        self.bars_seen += 1;
        self.broker.trace_event(&format!(
            "{}: bar {}, EMA {:?}, %K {:?}",
            self.security,
            self.quotes.last_value().map(|q| q.time()).unwrap_or(0),
            ema,
            k
        ));
        true
    }
}

impl Trader for LogTrader {
    fn on_history(&mut self, prices: &PriceMap) {
        self.ingest(prices);
    }

    fn on_bar(&mut self, prices: &PriceMap) {
        self.ingest(prices);
    }

    fn on_stop(&mut self) {
        self.broker.trace_event(&format!(
            "Trader stopped: {} after {} bars",
            self.security, self.bars_seen
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketflow_core::error::BrokerError;
    use marketflow_core::log::EventLog;
    use marketflow_core::types::{OrderLabel, OrderRequest, Quote};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TraceBroker {
        traces: Mutex<Vec<String>>,
    }

    impl EventLog for TraceBroker {
        fn log(&self, message: &str, priority: Priority) {
            if priority == Priority::Trace {
                self.traces.lock().unwrap().push(message.to_string());
            }
        }
    }

    impl Broker for TraceBroker {
        fn submit_order(&self, _request: &OrderRequest) -> Result<OrderLabel, BrokerError> {
            panic!("log trader must not submit orders");
        }

        fn close_order(&self, _label: &OrderLabel) -> Result<(), BrokerError> {
            Ok(())
        }

        fn is_open(&self, _label: &OrderLabel) -> bool {
            false
        }

        fn stop_brokers(&self) {}
    }

    #[test]
    fn test_traces_bars_without_trading() {
        let broker = Arc::new(TraceBroker::default());
        let security = Security::new("EURUSD", 0.0001, 1000.0);
        let mut trader = LogTrader::new(broker.clone(), security.clone(), 3, 3).unwrap();

        for (i, price) in [10.0, 11.0, 12.0].iter().enumerate() {
            let mut map = PriceMap::new();
            map.insert(
                security.clone(),
                Quote::tick((i as i64 + 1) * 1000, *price).unwrap(),
            );
            trader.on_bar(&map);
        }
        trader.on_stop();

        let traces = broker.traces.lock().unwrap();
        assert_eq!(traces.len(), 4); // three bars plus the stop line
        assert!(traces[3].contains("after 3 bars"));
    }
}
