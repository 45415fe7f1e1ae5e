//! Pricewatch - daily price scraping with drop alerts.
//!
//! Reads a single price from a web page, keeps the last 100 observations in
//! a JSON file, and alerts a Telegram chat when the price falls below the
//! previous observation.
//!
//! # Architecture
//!
//! - **`domain`** - Observations, the bounded history, price parsing and comparison
//! - **`port`** - Seams to the outside: [`port::PriceSource`], [`port::HistoryStore`],
//!   [`port::Notifier`]
//! - **`adapter`** - Headless Chromium source, JSON history file, Telegram bot
//! - **`service`** - The scrape pipeline and the daily scheduler
//! - **`infrastructure`** - Environment configuration and logging
//!
//! # Features
//!
//! - `chromium` - Headless browser price source
//! - `telegram` - Telegram alerts and `/start` / `/price` commands
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pricewatch::adapter::outbound::history::JsonHistoryStore;
//! use pricewatch::port::{HistoryStore, LogNotifier, PriceSource};
//! use pricewatch::service::ScrapePipeline;
//!
//! async fn once(source: Arc<dyn PriceSource>) {
//!     let store: Arc<dyn HistoryStore> = Arc::new(JsonHistoryStore::new("history.json"));
//!     let pipeline = ScrapePipeline::new(source, store, Arc::new(LogNotifier), chrono_tz::UTC);
//!     pipeline.run().await;
//! }
//! ```

pub mod adapter;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
pub mod service;
