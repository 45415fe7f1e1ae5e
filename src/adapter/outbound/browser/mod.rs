//! Headless browser price source.
//!
//! Drives a Chromium instance through the DevTools protocol to read the
//! price elements of a rendered page.

mod chromium;

pub use chromium::{ChromiumPriceSource, ChromiumSettings};
