//! Outbound adapters (driven side).

#[cfg(feature = "chromium")]
pub mod browser;
pub mod history;
pub mod notifier;
