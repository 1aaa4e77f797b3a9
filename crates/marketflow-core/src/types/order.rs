//! Order request and label types consumed by the broker collaborator.

use crate::types::Security;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Buy,
    Sell,
}

impl OrderKind {
    #[inline]
    pub fn is_buy(&self) -> bool {
        matches!(self, OrderKind::Buy)
    }

    #[inline]
    pub fn is_sell(&self) -> bool {
        matches!(self, OrderKind::Sell)
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Buy => write!(f, "BUY"),
            OrderKind::Sell => write!(f, "SELL"),
        }
    }
}

/// A request submitted to the broker collaborator.
///
/// Stop-loss and take-profit levels are optional; brokers that do not
/// support them may reject requests carrying them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub kind: OrderKind,
    pub security: Security,
    pub amount: f64,
    pub price: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub comment: String,
}

impl OrderRequest {
    pub fn new(
        kind: OrderKind,
        security: Security,
        amount: f64,
        price: f64,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            security,
            amount,
            price,
            stop_loss: None,
            take_profit: None,
            comment: comment.into(),
        }
    }

    /// Attach protective stop-loss and take-profit levels.
    pub fn with_levels(mut self, stop_loss: f64, take_profit: f64) -> Self {
        self.stop_loss = Some(stop_loss);
        self.take_profit = Some(take_profit);
        self
    }
}

/// Opaque handle identifying a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLabel(String);

impl OrderLabel {
    /// Mint a fresh unique label.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
