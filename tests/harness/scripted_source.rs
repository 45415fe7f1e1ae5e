use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pricewatch::error::{Error, Result};
use pricewatch::port::PriceSource;

/// Deterministic test double for the page price source.
///
/// Replays queued results in order; an exhausted script yields `Ok(None)`.
#[derive(Clone, Default)]
pub struct ScriptedPriceSource {
    results: Arc<Mutex<VecDeque<Result<Option<String>>>>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_price(&self, price: &str) -> &Self {
        self.push(Ok(Some(price.to_string())))
    }

    pub fn push_incomplete(&self) -> &Self {
        self.push(Ok(None))
    }

    pub fn push_timeout(&self) -> &Self {
        self.push(Err(Error::ElementTimeout {
            selector: "[data-cy-id=\"price_unit__value\"]",
            timeout: std::time::Duration::from_secs(15),
        }))
    }

    pub fn push_browser_error(&self, message: &str) -> &Self {
        self.push(Err(Error::Browser(message.to_string())))
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("lock call count")
    }

    fn push(&self, result: Result<Option<String>>) -> &Self {
        self.results
            .lock()
            .expect("lock scripted results")
            .push_back(result);
        self
    }
}

#[async_trait]
impl PriceSource for ScriptedPriceSource {
    async fn fetch_price(&self) -> Result<Option<String>> {
        *self.calls.lock().expect("lock call count") += 1;
        self.results
            .lock()
            .expect("lock scripted results")
            .pop_front()
            .unwrap_or(Ok(None))
    }
}
