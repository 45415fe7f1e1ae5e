//! Application configuration loading and validation.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file. It is read and validated once at startup; components receive
//! the pieces they need at construction.
//!
//! # Example
//!
//! ```no_run
//! use pricewatch::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use chrono_tz::Tz;
use url::Url;

use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

pub const DATA_PATH: &str = "DATA_PATH";
pub const TARGET_URL: &str = "TARGET_URL";
pub const BOT_TOKEN: &str = "BOT_TOKEN";
pub const CHAT_ID: &str = "CHAT_ID";
pub const BROWSER_EXECUTABLE_PATH: &str = "BROWSER_EXECUTABLE_PATH";
/// Older name of [`BROWSER_EXECUTABLE_PATH`], still honored.
pub const PUPPETEER_EXECUTABLE_PATH: &str = "PUPPETEER_EXECUTABLE_PATH";
pub const SCHEDULE_TIMEZONE: &str = "SCHEDULE_TIMEZONE";
pub use super::logging::{LOG_FORMAT, LOG_LEVEL};

/// Timezone of the daily trigger when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Rome;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the history snapshot.
    pub data_path: PathBuf,
    /// Page to scrape.
    pub target_url: String,
    /// Telegram bot token.
    pub bot_token: String,
    /// Chat receiving price alerts. Alerts are skipped when absent.
    pub chat_id: Option<i64>,
    /// Browser binary override.
    pub browser_executable: Option<PathBuf>,
    /// Timezone of the daily trigger and of recorded dates.
    pub timezone: Tz,
    /// Logging and tracing configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first if present;
    /// variables already set in the environment win.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_path = get(DATA_PATH)
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingField { field: DATA_PATH })?;
        let target_url = get(TARGET_URL).ok_or(ConfigError::MissingField { field: TARGET_URL })?;
        let bot_token = get(BOT_TOKEN).ok_or(ConfigError::MissingField { field: BOT_TOKEN })?;

        let chat_id = get(CHAT_ID)
            .map(|raw| {
                raw.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                    field: CHAT_ID,
                    reason: format!("`{raw}` is not a chat id: {e}"),
                })
            })
            .transpose()?;

        let browser_executable = get(BROWSER_EXECUTABLE_PATH)
            .or_else(|| get(PUPPETEER_EXECUTABLE_PATH))
            .map(PathBuf::from);

        let timezone = match get(SCHEDULE_TIMEZONE) {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: SCHEDULE_TIMEZONE,
                    reason: e.to_string(),
                })?,
            None => DEFAULT_TIMEZONE,
        };

        let logging = LoggingConfig::from_parts(get(LOG_LEVEL), get(LOG_FORMAT))?;

        let config = Self {
            data_path,
            target_url,
            bot_token,
            chat_id,
            browser_executable,
            timezone,
            logging,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.target_url).map_err(|e| ConfigError::InvalidValue {
            field: TARGET_URL,
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: TARGET_URL,
                reason: format!("unsupported scheme `{}`", url.scheme()),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging from this configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Telegram bot settings.
    #[cfg(feature = "telegram")]
    #[must_use]
    pub fn telegram(&self) -> crate::adapter::outbound::notifier::telegram::TelegramConfig {
        crate::adapter::outbound::notifier::telegram::TelegramConfig {
            bot_token: self.bot_token.clone(),
            chat_id: self.chat_id,
        }
    }

    /// Headless browser settings.
    #[cfg(feature = "chromium")]
    #[must_use]
    pub fn chromium(&self) -> crate::adapter::outbound::browser::ChromiumSettings {
        crate::adapter::outbound::browser::ChromiumSettings {
            target_url: self.target_url.clone(),
            executable: self.browser_executable.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::logging::LogFormat;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        (DATA_PATH, "/var/lib/pricewatch/history.json"),
        (TARGET_URL, "https://shop.example.com/item/42"),
        (BOT_TOKEN, "123:abc"),
    ];

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        REQUIRED.iter().copied().chain(extra.iter().copied()).collect()
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_lookup(lookup(REQUIRED)).unwrap();

        assert_eq!(config.data_path, PathBuf::from("/var/lib/pricewatch/history.json"));
        assert_eq!(config.target_url, "https://shop.example.com/item/42");
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.chat_id, None);
        assert_eq!(config.browser_executable, None);
        assert_eq!(config.timezone, chrono_tz::Europe::Rome);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn each_required_key_is_reported_when_missing() {
        for missing in [DATA_PATH, TARGET_URL, BOT_TOKEN] {
            let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != missing).collect();
            let result = Config::from_lookup(lookup(&pairs));

            assert!(
                matches!(
                    result,
                    Err(Error::Config(ConfigError::MissingField { field })) if field == missing
                ),
                "expected {missing} to be reported"
            );
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .map(|(k, v)| if k == DATA_PATH { (k, "  ") } else { (k, v) })
            .collect();

        assert!(matches!(
            Config::from_lookup(lookup(&pairs)),
            Err(Error::Config(ConfigError::MissingField { field: DATA_PATH }))
        ));
    }

    #[test]
    fn chat_id_is_parsed() {
        let config = Config::from_lookup(lookup(&with(&[(CHAT_ID, "-1001234567890")]))).unwrap();
        assert_eq!(config.chat_id, Some(-1_001_234_567_890));
    }

    #[test]
    fn invalid_chat_id_is_rejected() {
        let result = Config::from_lookup(lookup(&with(&[(CHAT_ID, "not-a-number")])));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: CHAT_ID, .. }))
        ));
    }

    #[test]
    fn browser_path_prefers_new_name() {
        let config = Config::from_lookup(lookup(&with(&[
            (BROWSER_EXECUTABLE_PATH, "/usr/bin/chromium"),
            (PUPPETEER_EXECUTABLE_PATH, "/opt/chrome"),
        ])))
        .unwrap();
        assert_eq!(config.browser_executable, Some(PathBuf::from("/usr/bin/chromium")));

        let config =
            Config::from_lookup(lookup(&with(&[(PUPPETEER_EXECUTABLE_PATH, "/opt/chrome")])))
                .unwrap();
        assert_eq!(config.browser_executable, Some(PathBuf::from("/opt/chrome")));
    }

    #[test]
    fn timezone_is_configurable() {
        let config =
            Config::from_lookup(lookup(&with(&[(SCHEDULE_TIMEZONE, "America/New_York")])))
                .unwrap();
        assert_eq!(config.timezone, chrono_tz::America::New_York);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let result = Config::from_lookup(lookup(&with(&[(SCHEDULE_TIMEZONE, "Mars/Olympus")])));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: SCHEDULE_TIMEZONE,
                ..
            }))
        ));
    }

    #[test]
    fn target_url_must_be_http() {
        for bad in ["not a url", "ftp://shop.example.com/item"] {
            let pairs: Vec<_> = REQUIRED
                .iter()
                .copied()
                .map(|(k, v)| if k == TARGET_URL { (k, bad) } else { (k, v) })
                .collect();

            assert!(matches!(
                Config::from_lookup(lookup(&pairs)),
                Err(Error::Config(ConfigError::InvalidValue { field: TARGET_URL, .. }))
            ));
        }
    }

    #[test]
    fn logging_overrides() {
        let config = Config::from_lookup(lookup(&with(&[
            (LOG_LEVEL, "debug"),
            (LOG_FORMAT, "json"),
        ])))
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);

        let result = Config::from_lookup(lookup(&with(&[(LOG_FORMAT, "xml")])));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: LOG_FORMAT, .. }))
        ));
    }
}
