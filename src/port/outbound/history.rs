//! History persistence port.

use crate::domain::History;
use crate::error::Result;

/// Durable storage for the price history snapshot.
pub trait HistoryStore: Send + Sync {
    /// Load the persisted history.
    ///
    /// Never fails: a missing or unreadable snapshot is an empty history.
    fn load(&self) -> History;

    /// Replace the persisted snapshot with `history`.
    fn save(&self, history: &History) -> Result<()>;
}
