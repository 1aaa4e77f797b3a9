//! Error types for the market engine.

use thiserror::Error;

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    #[error("Series error: {0}")]
    Series(#[from] SeriesError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bar construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("Non-finite price in bar at time {time}")]
    NonFinitePrice { time: i64 },

    #[error("OHLC range inverted at time {time}: low {low}, high {high}")]
    InvertedRange { time: i64, low: f64, high: f64 },
}

/// Time-series access errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("Lookup out of range: position {position}, size {size}")]
    OutOfRange { position: usize, size: usize },

    #[error("Series is empty")]
    Empty,

    #[error("Non-increasing timestamp: {time} appended after {last}")]
    OrderingViolation { time: i64, last: i64 },
}

/// Indicator construction and update errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Degenerate price range over the window ending at {time}")]
    DegenerateRange { time: i64 },

    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Series error: {0}")]
    Series(#[from] SeriesError),
}

/// Broker collaborator errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrokerError {
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Broker stopped")]
    Stopped,
}

/// Dispatcher errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Dispatcher already stopped")]
    Stopped,

    #[error("Trader for {symbol} unavailable: {reason}")]
    TraderUnavailable { symbol: String, reason: String },
}

/// Result type alias for engine operations.
pub type MarketResult<T> = Result<T, MarketError>;
