//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for the Telegram backend.

#[cfg(feature = "telegram")]
pub mod telegram;
