//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the scrape pipeline and the outside world:
//! the page the price is read from, the file the history lives in, and the
//! chat the alerts go to.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │     Scrape pipeline     │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Browser │            │   History   │              │ Notifier  │
//! │ Adapter │            │    Store    │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod outbound;

pub use outbound::history::HistoryStore;
pub use outbound::notifier::{Event, LogNotifier, Notifier, NullNotifier, PriceDropEvent};
pub use outbound::source::PriceSource;
