//! Price source port.

use async_trait::async_trait;

use crate::error::Result;

/// Something that can read the current price text of the watched page.
///
/// Each call is an independent attempt. Implementations own any session they
/// open and must release it before returning, on success and on error.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current price as `"<amount> <currency>"`.
    ///
    /// Returns `Ok(None)` when the page loaded but the price elements were
    /// incomplete; nothing should be recorded in that case.
    async fn fetch_price(&self) -> Result<Option<String>>;
}
