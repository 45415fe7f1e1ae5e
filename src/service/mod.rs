//! Application services: the scrape pipeline and the daily scheduler.

mod pipeline;
mod scheduler;

pub use pipeline::{CycleOutcome, ScrapePipeline};
pub use scheduler::{DailySchedule, Scheduler};
