//! Notifier port for event notifications.
//!
//! This module defines the trait for sending notifications about
//! price events, currently only detected drops.

use crate::domain::PriceDrop;

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The newest observation is cheaper than the one before it.
    PriceDropped(PriceDropEvent),
}

/// Price drop event carrying both raw price texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDropEvent {
    /// Price text of the new observation.
    pub current: String,
    /// Price text of the previous observation.
    pub previous: String,
}

impl From<&PriceDrop> for PriceDropEvent {
    fn from(drop: &PriceDrop) -> Self {
        Self {
            current: drop.current.clone(),
            previous: drop.previous.clone(),
        }
    }
}

impl Event {
    /// Render the alert text sent to the chat.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Event::PriceDropped(e) => format!(
                "Alert: Price dropped! Current: {}, Previous: {}",
                e.current, e.previous
            ),
        }
    }
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget: `notify` must return quickly and must
/// not surface delivery failures to the caller. Implementations that talk to
/// the network hand the event to a background task, which logs failures.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::info;
        match &event {
            Event::PriceDropped(e) => {
                info!(current = %e.current, previous = %e.previous, "Price dropped");
            }
        }
    }
}
