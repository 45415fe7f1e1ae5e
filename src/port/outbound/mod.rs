//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod history;
pub mod notifier;
pub mod source;
