//! EMA crossover trader with a stochastic gate.

use marketflow_core::error::{IndicatorError, MarketError};
use marketflow_core::log::Priority;
use marketflow_core::traits::{Broker, Trader};
use marketflow_core::types::{
    AppliedPrice, OrderKind, OrderLabel, OrderRequest, PriceMap, Quote, QuoteServer, Security,
};
use marketflow_indicators::{Ema, Indicator, StochasticK};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters of the live trading strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveTraderConfig {
    /// Fast EMA length
    pub fast_length: usize,
    /// Slow EMA length
    pub slow_length: usize,
    /// Stochastic %K lookback
    pub stochastic_length: usize,
    /// Price component the EMAs read
    pub applied_price: AppliedPrice,
    /// %K level above which longs are not opened
    pub overbought: f64,
    /// %K level below which shorts are not opened
    pub oversold: f64,
    /// Nominal amount per trade, rounded to the security's lot step
    pub trade_amount: f64,
}

impl Default for LiveTraderConfig {
    fn default() -> Self {
        Self {
            fast_length: 12,
            slow_length: 26,
            stochastic_length: 14,
            applied_price: AppliedPrice::Close,
            overbought: 80.0,
            oversold: 20.0,
            trade_amount: 1000.0,
        }
    }
}

impl LiveTraderConfig {
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.fast_length == 0 || self.slow_length == 0 || self.stochastic_length == 0 {
            return Err(MarketError::Config(
                "indicator lengths must be >= 1".into(),
            ));
        }
        if self.fast_length >= self.slow_length {
            return Err(MarketError::Config(format!(
                "fast EMA length {} must be below slow EMA length {}",
                self.fast_length, self.slow_length
            )));
        }
        if !(0.0..=100.0).contains(&self.overbought) || !(0.0..=100.0).contains(&self.oversold) {
            return Err(MarketError::Config(
                "stochastic levels must lie in 0..=100".into(),
            ));
        }
        if self.trade_amount <= 0.0 {
            return Err(MarketError::Config("trade amount must be positive".into()));
        }
        Ok(())
    }
}

/// Trades one security on EMA crossovers.
///
/// A bullish crossover closes any short and opens a long unless %K is
/// already overbought; bearish mirrors it. At most one order is open at a
/// time. Broker failures are logged and swallowed here so a broken
/// collaborator never poisons event delivery.
pub struct LiveTrader {
    broker: Arc<dyn Broker>,
    security: Security,
    config: LiveTraderConfig,
    quotes: QuoteServer,
    fast_ema: Ema,
    slow_ema: Ema,
    stochastic: StochasticK,
    /// Last non-degenerate %K; reused when the window goes flat.
    last_k: Option<f64>,
    prev_fast: Option<f64>,
    prev_slow: Option<f64>,
    open_order: Option<(OrderKind, OrderLabel)>,
}

impl LiveTrader {
    pub fn new(
        broker: Arc<dyn Broker>,
        security: Security,
        config: LiveTraderConfig,
    ) -> Result<Self, MarketError> {
        config.validate()?;
        let fast_ema = Ema::with_applied(config.fast_length, config.applied_price)?;
        let slow_ema = Ema::with_applied(config.slow_length, config.applied_price)?;
        let stochastic = StochasticK::new(config.stochastic_length)?;

        Ok(Self {
            broker,
            security,
            config,
            quotes: QuoteServer::new(),
            fast_ema,
            slow_ema,
            stochastic,
            last_k: None,
            prev_fast: None,
            prev_slow: None,
            open_order: None,
        })
    }

    /// Append this security's bar and roll the indicators forward.
    /// Returns false when the tick carries nothing usable for us.
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

        if let Err(err) = self.fast_ema.update(&self.quotes) {
            self.report_indicator("fast EMA", err);
        }
        if let Err(err) = self.slow_ema.update(&self.quotes) {
            self.report_indicator("slow EMA", err);
        }
        match self.stochastic.update(&self.quotes) {
            Ok(k) => self.last_k = Some(k),
            // Flat window: keep the previous %K as this bar's reading.
            Err(IndicatorError::DegenerateRange { .. }) => {}
            Err(err) => self.report_indicator("stochastic", err),
        }
        true
    }

    fn report_indicator(&self, name: &str, err: IndicatorError) {
        self.broker.log(
            &format!("{} update failed for {}: {}", name, self.security, err),
            Priority::Error,
        );
    }

    fn evaluate(&mut self, quote: Quote) {
        let (Some(fast), Some(slow)) = (self.fast_ema.last(), self.slow_ema.last()) else {
            return;
        };

        if self.quotes.len() >= self.config.slow_length {
            if let (Some(prev_fast), Some(prev_slow)) = (self.prev_fast, self.prev_slow) {
                let crossed_up = prev_fast <= prev_slow && fast > slow;
                let crossed_down = prev_fast >= prev_slow && fast < slow;

                if crossed_up && self.gate_allows(OrderKind::Buy) {
                    self.close_position();
                    self.open_position(OrderKind::Buy, quote);
                } else if crossed_down && self.gate_allows(OrderKind::Sell) {
                    self.close_position();
                    self.open_position(OrderKind::Sell, quote);
                }
            }
        }

        self.prev_fast = Some(fast);
        self.prev_slow = Some(slow);
    }

    fn gate_allows(&self, kind: OrderKind) -> bool {
        match self.last_k {
            Some(k) if kind.is_buy() => k <= self.config.overbought,
            Some(k) => k >= self.config.oversold,
            // No %K reading yet: trade on the crossover alone.
            None => true,
        }
    }

    fn open_position(&mut self, kind: OrderKind, quote: Quote) {
        if self.open_order.is_some() {
            return;
        }
        let amount = self.security.round_lot(self.config.trade_amount);
        let comment = format!(
            "Asset: {}, Quote: [ {} ], Side: {}",
            self.security, quote, kind
        );
        let request = OrderRequest::new(kind, self.security.clone(), amount, quote.close(), comment);

        match self.broker.submit_order(&request) {
            Ok(label) => {
                self.open_order = Some((kind, label));
            }
            Err(err) => self.broker.log(
                &format!("Order submission failed for {}: {}", self.security, err),
                Priority::Error,
            ),
        }
    }

    fn close_position(&mut self) {
        if let Some((_, label)) = self.open_order.take() {
            if self.broker.is_open(&label) {
                if let Err(err) = self.broker.close_order(&label) {
                    self.broker.log(
                        &format!("Order close failed for {}: {}", self.security, err),
                        Priority::Error,
                    );
                }
            }
        }
    }
}

impl Trader for LiveTrader {
    fn on_history(&mut self, prices: &PriceMap) {
        self.ingest(prices);
    }

    fn on_bar(&mut self, prices: &PriceMap) {
        if !self.ingest(prices) {
            return;
        }
        // ingest appended the bar, so last_value cannot fail here
        if let Ok(&quote) = self.quotes.last_value() {
            self.evaluate(quote);
        }
    }

    fn on_stop(&mut self) {
        self.close_position();
        self.broker
            .trace_event(&format!("Trader stopped: {}", self.security));
    }
}
