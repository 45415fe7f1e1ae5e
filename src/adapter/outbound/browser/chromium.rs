//! Chromium-backed [`PriceSource`].

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, NavigateParams, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::{Element, Page};
use futures_util::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::port::PriceSource;

/// User agent presented to the target site.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Element holding the price amount.
pub const AMOUNT_SELECTOR: &str = r#"[data-cy-id="price_unit__value"]"#;

/// Element holding the price currency.
pub const CURRENCY_SELECTOR: &str = r#"[data-cy-id="price_unit__currency"]"#;

/// How long to wait for the amount element after navigation.
pub const ELEMENT_TIMEOUT: Duration = Duration::from_secs(15);

/// Upper bound on waiting for network activity to settle after navigation.
pub const NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Lifecycle events meaning at most two connections remain open.
const NETWORK_QUIET_EVENTS: &[&str] = &["networkAlmostIdle", "networkIdle"];

/// Flags that let Chromium run headless inside containers.
const LAUNCH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--no-zygote",
    "--disable-gpu",
    "--disable-web-security",
    "--disable-features=VizDisplayCompositor",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
];

/// Settings for the Chromium price source.
#[derive(Debug, Clone)]
pub struct ChromiumSettings {
    /// Page to scrape.
    pub target_url: String,
    /// Browser binary override. Auto-detected when `None`.
    pub executable: Option<PathBuf>,
}

/// Reads the price by launching a fresh headless browser per call.
pub struct ChromiumPriceSource {
    settings: ChromiumSettings,
}

impl ChromiumPriceSource {
    #[must_use]
    pub fn new(settings: ChromiumSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl PriceSource for ChromiumPriceSource {
    async fn fetch_price(&self) -> Result<Option<String>> {
        let session = Session::launch(&self.settings).await?;
        with_session(session, &self.settings.target_url).await
    }
}

/// An open automation session that can read the price once.
#[async_trait]
trait ScrapeSession: Send + Sync {
    async fn read_price(&self, url: &str) -> Result<Option<String>>;

    /// Release the session. Failures are logged, never returned.
    async fn close(&mut self);
}

/// Read the price through `session`, then close it whatever the outcome.
async fn with_session<S: ScrapeSession>(mut session: S, url: &str) -> Result<Option<String>> {
    let result = session.read_price(url).await;
    session.close().await;
    result
}

/// A running browser together with its event-loop task.
struct Session {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl Session {
    async fn launch(settings: &ChromiumSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder().args(LAUNCH_ARGS.iter().copied());
        if let Some(path) = &settings.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(Error::Browser)?;

        let (browser, mut events) = Browser::launch(config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("Browser launched");
        Ok(Self { browser, handler })
    }
}

#[async_trait]
impl ScrapeSession for Session {
    async fn read_price(&self, url: &str) -> Result<Option<String>> {
        let page = self.browser.new_page("about:blank").await?;
        page.set_user_agent(SetUserAgentOverrideParams::new(USER_AGENT))
            .await?;
        navigate_until_quiet(&page, url).await?;

        let amount = wait_for_element(&page, AMOUNT_SELECTOR, ELEMENT_TIMEOUT).await?;
        let amount = element_text(&amount).await?;
        let currency = match page.find_element(CURRENCY_SELECTOR).await {
            Ok(element) => element_text(&element).await?,
            Err(_) => None,
        };

        Ok(combine(amount, currency))
    }

    async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Failed to close browser cleanly");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Failed to wait for browser exit");
        }
        self.handler.abort();
        debug!("Browser closed");
    }
}

/// Navigate to `url` and wait until the page's network activity settles.
///
/// Waiting is bounded by [`NETWORK_IDLE_TIMEOUT`]; a page that never goes
/// quiet (long polling, streaming) is read anyway once the bound elapses.
async fn navigate_until_quiet(page: &Page, url: &str) -> Result<()> {
    page.execute(SetLifecycleEventsEnabledParams::new(true))
        .await?;
    // Subscribe before navigating so no lifecycle event is missed.
    let events = page
        .event_listener::<EventLifecycleEvent>()
        .await?
        .map(|event| {
            let loader: &str = event.loader_id.as_ref();
            (loader.to_string(), event.name.clone())
        });

    let navigation = page.execute(NavigateParams::new(url)).await?;
    if let Some(error) = &navigation.result.error_text {
        return Err(Error::Browser(format!("navigation to {url} failed: {error}")));
    }
    let Some(loader_id) = &navigation.result.loader_id else {
        // Same-document navigation: nothing new to load.
        return Ok(());
    };
    let loader_id: &str = loader_id.as_ref();

    match tokio::time::timeout(NETWORK_IDLE_TIMEOUT, wait_until_quiet(events, loader_id)).await {
        Ok(true) => debug!("Network idle"),
        Ok(false) => warn!("Lifecycle events ended before the network went idle"),
        Err(_) => warn!(
            timeout = ?NETWORK_IDLE_TIMEOUT,
            "Network still busy, reading the page anyway"
        ),
    }
    Ok(())
}

/// Consume `(loader_id, event_name)` pairs until the navigation identified
/// by `loader_id` reports near-idle network. Returns `false` if the stream ends first.
async fn wait_until_quiet<S>(events: S, loader_id: &str) -> bool
where
    S: Stream<Item = (String, String)>,
{
    let mut events = std::pin::pin!(events);
    while let Some((loader, name)) = events.next().await {
        if loader == loader_id && NETWORK_QUIET_EVENTS.contains(&name.as_str()) {
            return true;
        }
    }
    false
}

/// Poll for `selector` until it appears or `timeout` elapses.
async fn wait_for_element(page: &Page, selector: &'static str, timeout: Duration) -> Result<Element> {
    let poll = async {
        loop {
            if let Ok(element) = page.find_element(selector).await {
                return element;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| Error::ElementTimeout { selector, timeout })
}

async fn element_text(element: &Element) -> Result<Option<String>> {
    let text = element.inner_text().await?;
    Ok(text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()))
}

/// Join amount and currency as `"<amount> <currency>"`; both are required.
fn combine(amount: Option<String>, currency: Option<String>) -> Option<String> {
    match (amount, currency) {
        (Some(amount), Some(currency)) => Some(format!("{amount} {currency}")),
        _ => None,
    }
}
