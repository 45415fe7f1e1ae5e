//! Scrape pipeline: fetch the price, record it, alert on a drop.
//!
//! Every run is an independent attempt. Failures inside a run are logged and
//! end the cycle without touching the history; they never reach the caller.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::domain::{compare, Comparison, Observation};
use crate::error::Result;
use crate::port::{Event, HistoryStore, Notifier, PriceSource};

/// What a single pipeline run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new observation was stored. `drop` is true when an alert was raised.
    Recorded { price: String, drop: bool },
    /// The page was read but the price was incomplete; nothing stored.
    NoResult,
    /// Another run was in progress; this trigger was dropped.
    Skipped,
    /// The run failed; the error has been logged.
    Failed(String),
}

/// Sequential fetch → record → compare → notify pipeline.
///
/// At most one run executes at a time; a trigger that arrives while a run is
/// in progress is skipped.
pub struct ScrapePipeline {
    source: Arc<dyn PriceSource>,
    store: Arc<dyn HistoryStore>,
    notifier: Arc<dyn Notifier>,
    timezone: Tz,
    running: Mutex<()>,
}

impl ScrapePipeline {
    #[must_use]
    pub fn new(
        source: Arc<dyn PriceSource>,
        store: Arc<dyn HistoryStore>,
        notifier: Arc<dyn Notifier>,
        timezone: Tz,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            timezone,
            running: Mutex::new(()),
        }
    }

    /// Run one scrape cycle.
    pub async fn run(&self) -> CycleOutcome {
        let Ok(_guard) = self.running.try_lock() else {
            info!("Scrape already in progress, skipping this trigger");
            return CycleOutcome::Skipped;
        };

        info!("Starting scraping...");
        match self.cycle().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Error during scraping");
                CycleOutcome::Failed(e.to_string())
            }
        }
    }

    async fn cycle(&self) -> Result<CycleOutcome> {
        let Some(price) = self.source.fetch_price().await? else {
            info!("Price elements incomplete, nothing recorded");
            return Ok(CycleOutcome::NoResult);
        };

        let mut history = self.store.load();
        let previous = history.latest().cloned();
        let now = Utc::now().with_timezone(&self.timezone);
        history.record(Observation::capture(price.clone(), now, previous.as_ref()));
        self.store.save(&history)?;
        info!(price = %price, "Success: current price recorded");

        let drop = match previous {
            Some(previous) => self.check_drop(&previous.price, &price),
            None => false,
        };

        Ok(CycleOutcome::Recorded { price, drop })
    }

    /// Compare against the previous observation and alert on a drop.
    fn check_drop(&self, previous: &str, current: &str) -> bool {
        match compare(previous, current) {
            Comparison::Drop(drop) => {
                info!(
                    current = %drop.current,
                    previous = %drop.previous,
                    decrease = %(drop.previous_amount - drop.current_amount),
                    "Price drop detected"
                );
                self.notifier.notify(Event::PriceDropped((&drop).into()));
                true
            }
            Comparison::NoDrop => false,
            Comparison::Unparsable => {
                debug!(previous, current, "Prices not comparable, skipping drop check");
                false
            }
            Comparison::UnitChanged { previous, current } => {
                info!(%previous, %current, "Currency changed, skipping drop check");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::History;
    use crate::error::Error;
    use crate::port::PriceDropEvent;
    use async_trait::async_trait;
    use parking_lot::Mutex as SyncMutex;
    use std::time::Duration;

    struct FixedSource(Option<&'static str>);

    #[async_trait]
    impl PriceSource for FixedSource {
        async fn fetch_price(&self) -> Result<Option<String>> {
            Ok(self.0.map(str::to_string))
        }
    }

    struct SlowSource;

    #[async_trait]
    impl PriceSource for SlowSource {
        async fn fetch_price(&self) -> Result<Option<String>> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(Some("1 USD".into()))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        history: SyncMutex<History>,
        fail_writes: bool,
    }

    impl HistoryStore for MemoryStore {
        fn load(&self) -> History {
            self.history.lock().clone()
        }

        fn save(&self, history: &History) -> Result<()> {
            if self.fail_writes {
                return Err(Error::Io(std::io::Error::other("read-only medium")));
            }
            *self.history.lock() = history.clone();
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder(SyncMutex<Vec<Event>>);

    impl Notifier for Recorder {
        fn notify(&self, event: Event) {
            self.0.lock().push(event);
        }
    }

    fn seeded(prices: &[&str]) -> MemoryStore {
        let store = MemoryStore::default();
        let mut history = History::new();
        for (i, price) in prices.iter().rev().enumerate() {
            history.record(Observation {
                id: i64::try_from(i).unwrap(),
                date: String::new(),
                price: (*price).to_string(),
            });
        }
        *store.history.lock() = history;
        store
    }

    fn pipeline(
        source: impl PriceSource + 'static,
        store: Arc<MemoryStore>,
        notifier: Arc<Recorder>,
    ) -> ScrapePipeline {
        ScrapePipeline::new(Arc::new(source), store, notifier, chrono_tz::Europe::Rome)
    }

    #[tokio::test]
    async fn failed_save_records_nothing_and_sends_no_alert() {
        let store = Arc::new(MemoryStore {
            fail_writes: true,
            ..seeded(&["12.00 USD"])
        });
        let notifier = Arc::new(Recorder::default());

        let outcome = pipeline(FixedSource(Some("10.00 USD")), store.clone(), notifier.clone())
            .run()
            .await;

        assert!(matches!(outcome, CycleOutcome::Failed(_)));
        assert_eq!(store.load().len(), 1);
        assert!(notifier.0.lock().is_empty());
    }

    #[tokio::test]
    async fn drop_alert_carries_raw_texts() {
        let store = Arc::new(seeded(&["12.00 USD"]));
        let notifier = Arc::new(Recorder::default());

        pipeline(FixedSource(Some("10.00 USD")), store, notifier.clone())
            .run()
            .await;

        assert_eq!(
            notifier.0.lock().as_slice(),
            &[Event::PriceDropped(PriceDropEvent {
                current: "10.00 USD".into(),
                previous: "12.00 USD".into(),
            })]
        );
    }

    #[tokio::test]
    async fn concurrent_trigger_is_skipped() {
        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(Recorder::default());
        let pipeline = Arc::new(pipeline(SlowSource, store.clone(), notifier));

        let first = tokio::spawn({
            let pipeline = pipeline.clone();
            async move { pipeline.run().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = pipeline.run().await;

        assert_eq!(second, CycleOutcome::Skipped);
        assert!(matches!(
            first.await.unwrap(),
            CycleOutcome::Recorded { .. }
        ));
        assert_eq!(store.load().len(), 1);
    }
}
