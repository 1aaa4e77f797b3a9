//! The per-asset trader contract.

use crate::types::PriceMap;

/// Per-asset strategy unit reacting to market-data events.
///
/// A trader owns its quote servers and indicator state exclusively; the
/// dispatcher guarantees serialized delivery, so implementations need no
/// internal synchronization. Collaborator failures (broker rejections, log
/// sink errors) are handled inside the trader — one trader's failure must
/// never disturb delivery to the others.
///
/// Event order per trader: historical batches first, then live bars in
/// non-decreasing time order, then stop.
pub trait Trader: Send {
    /// A batch of historical bars, one per security.
    fn on_history(&mut self, prices: &PriceMap);

    /// One new live bar across possibly multiple securities.
    fn on_bar(&mut self, prices: &PriceMap);

    /// Terminal notification; no events follow.
    fn on_stop(&mut self);
}
