//! Price history domain: observations, the bounded history, and price comparison.

mod observation;
mod price;

pub use observation::{History, Observation, HISTORY_CAPACITY};
pub use price::{compare, parse_price, price_unit, Comparison, PriceDrop};
