//! Daily scheduler for the scrape pipeline.
//!
//! Equivalent to the cron expression `0 15 * * *` evaluated in a configured
//! timezone: one run at startup, then one run per day at the trigger time.
//! Missed triggers (process down, host suspended) are not caught up.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::info;

use super::pipeline::ScrapePipeline;

/// Daily wall-clock trigger in a fixed timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
    timezone: Tz,
}

impl DailySchedule {
    /// Hour of the default daily trigger.
    pub const DEFAULT_HOUR: u32 = 15;

    #[must_use]
    pub fn new(at: NaiveTime, timezone: Tz) -> Self {
        Self { at, timezone }
    }

    /// The default 15:00 trigger in `timezone`.
    #[must_use]
    pub fn at_default_hour(timezone: Tz) -> Self {
        let at = NaiveTime::from_hms_opt(Self::DEFAULT_HOUR, 0, 0)
            .expect("default hour is a valid time");
        Self::new(at, timezone)
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The first trigger strictly after `now`.
    ///
    /// A trigger time that does not exist on a given day (DST gap) moves to
    /// the next day.
    #[must_use]
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut date = now.with_timezone(&self.timezone).date_naive();
        loop {
            if let Some(candidate) = self
                .timezone
                .from_local_datetime(&date.and_time(self.at))
                .earliest()
            {
                let candidate = candidate.with_timezone(&Utc);
                if candidate > now {
                    return candidate;
                }
            }
            date = date + Days::new(1);
        }
    }

    /// The trigger after `now`, never at or before `last_fire`.
    ///
    /// Keeps the schedule moving forward when the wall clock is set back
    /// after a trigger has fired.
    #[must_use]
    pub fn next_fire(&self, now: DateTime<Utc>, last_fire: Option<DateTime<Utc>>) -> DateTime<Utc> {
        let reference = last_fire.map_or(now, |fired| fired.max(now));
        self.next_after(reference)
    }
}

/// Drives a [`ScrapePipeline`] on a [`DailySchedule`].
pub struct Scheduler {
    pipeline: Arc<ScrapePipeline>,
    schedule: DailySchedule,
}

impl Scheduler {
    #[must_use]
    pub fn new(pipeline: Arc<ScrapePipeline>, schedule: DailySchedule) -> Self {
        Self { pipeline, schedule }
    }

    /// Run once immediately, then at every trigger until the task is dropped.
    pub async fn run(self) {
        self.pipeline.run().await;

        let mut last_fire = None;
        loop {
            let now = Utc::now();
            let next = self.schedule.next_fire(now, last_fire);
            info!(
                next = %next.with_timezone(&self.schedule.timezone()),
                "Next scrape scheduled"
            );

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;
            last_fire = Some(next);
            self.pipeline.run().await;
        }
    }
}
