//! Events delivered to traders.

use marketflow_core::types::PriceMap;
use std::sync::Arc;

/// One market-data notification for a trader.
///
/// Price maps are shared across all receiving traders, so a broadcast
/// allocates once regardless of how many assets are registered.
#[derive(Debug, Clone)]
pub enum TraderEvent {
    /// A batch of historical bars.
    History(Arc<PriceMap>),
    /// One new live bar across possibly multiple securities.
    Bar(Arc<PriceMap>),
    /// Terminal notification; the trader's channel closes after this.
    Stop,
}
