//! Price observations and the bounded history they are recorded into.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Maximum number of observations kept in a [`History`].
pub const HISTORY_CAPACITY: usize = 100;

/// Layout of the human-readable `date` field (Italian locale, e.g. `6/10/2026, 15:00:03`).
const DATE_FORMAT: &str = "%-d/%-m/%Y, %H:%M:%S";

/// One recorded price sample.
///
/// The price text is kept exactly as extracted from the page (amount and
/// currency together); it is only decomposed when two samples are compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Creation time in Unix milliseconds. Strictly increasing within a history.
    pub id: i64,
    /// Creation time formatted for humans.
    pub date: String,
    /// Raw price text, e.g. `"10.99 USD"`.
    pub price: String,
}

impl Observation {
    /// Create an observation captured at `at`.
    ///
    /// When `previous` is given and the clock has not advanced past its id,
    /// the new id is bumped to `previous.id + 1`. A previous id already at
    /// `i64::MAX` (only reachable through a hand-edited file) is not bumped.
    pub fn capture<Tz>(price: impl Into<String>, at: DateTime<Tz>, previous: Option<&Observation>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut id = at.timestamp_millis();
        if let Some(next) = previous.and_then(|prev| prev.id.checked_add(1)) {
            id = id.max(next);
        }

        Self {
            id,
            date: at.format(DATE_FORMAT).to_string(),
            price: price.into(),
        }
    }
}

/// Ordered observations, newest first, never longer than [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<Observation>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from newest-first entries, dropping anything past the capacity.
    #[must_use]
    pub fn from_entries(mut entries: Vec<Observation>) -> Self {
        entries.truncate(HISTORY_CAPACITY);
        Self { entries }
    }

    /// Prepend an observation, evicting the oldest entries beyond capacity.
    pub fn record(&mut self, observation: Observation) {
        self.entries.insert(0, observation);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// The most recent observation, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Observation> {
        self.entries.first()
    }

    #[must_use]
    pub fn entries(&self) -> &[Observation] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
