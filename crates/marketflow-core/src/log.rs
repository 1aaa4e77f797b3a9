//! Log collaborator surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered log severity.
///
/// A configured threshold allows a message iff
/// `threshold.is_allowed(message_priority)` — lower ranks are more verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Lowest rank, turns on all logging.
    All,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    /// Severe errors that will presumably abort the session.
    Fatal,
    /// Highest rank, turns off logging.
    Off,
}

impl Priority {
    /// Numeric rank; `All` = 0 up to `Off` = 7.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::All => 0,
            Priority::Trace => 1,
            Priority::Debug => 2,
            Priority::Info => 3,
            Priority::Warn => 4,
            Priority::Error => 5,
            Priority::Fatal => 6,
            Priority::Off => 7,
        }
    }

    /// Whether a message at `message` priority passes this threshold.
    pub fn is_allowed(&self, message: Priority) -> bool {
        self.rank() <= message.rank()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::All => "ALL",
            Priority::Trace => "TRACE",
            Priority::Debug => "DEBUG",
            Priority::Info => "INFO",
            Priority::Warn => "WARN",
            Priority::Error => "ERROR",
            Priority::Fatal => "FATAL",
            Priority::Off => "OFF",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Priority::All),
            "trace" => Ok(Priority::Trace),
            "debug" => Ok(Priority::Debug),
            "info" => Ok(Priority::Info),
            "warn" => Ok(Priority::Warn),
            "error" => Ok(Priority::Error),
            "fatal" => Ok(Priority::Fatal),
            "off" => Ok(Priority::Off),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// Sink for trader and dispatcher log events.
///
/// Implementors decide where messages go; the dispatch core only emits.
pub trait EventLog {
    /// Emit a message at the given priority.
    fn log(&self, message: &str, priority: Priority);

    /// Emit a trace-level diagnostic message.
    fn trace_event(&self, message: &str) {
        self.log(message, Priority::Trace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::All.rank() < Priority::Trace.rank());
        assert!(Priority::Error.rank() < Priority::Fatal.rank());
        assert!(Priority::Fatal.rank() < Priority::Off.rank());
    }

    #[test]
    fn test_is_allowed() {
        // An INFO threshold admits INFO and above.
        assert!(Priority::Info.is_allowed(Priority::Info));
        assert!(Priority::Info.is_allowed(Priority::Error));
        assert!(!Priority::Info.is_allowed(Priority::Debug));

        // ALL admits everything, OFF admits only OFF.
        assert!(Priority::All.is_allowed(Priority::Trace));
        assert!(!Priority::Off.is_allowed(Priority::Fatal));
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(Priority::from_str("info").unwrap(), Priority::Info);
        assert_eq!(Priority::from_str("WARN").unwrap(), Priority::Warn);
        assert!(Priority::from_str("loud").is_err());
    }
}
