//! Tracing subscriber setup.
//!
//! Two knobs come from the environment: `LOG_LEVEL`, an `EnvFilter` directive
//! string such as `info` or `pricewatch=debug,chromiumoxide=warn`, and
//! `LOG_FORMAT`, either `pretty` or `json`. A set `RUST_LOG` overrides
//! `LOG_LEVEL` at init time.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;

pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_LEVEL: &str = "info";

/// Output layout of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines for terminals.
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                field: LOG_FORMAT,
                reason: format!("expected `pretty` or `json`, got `{other}`"),
            }),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        })
    }
}

/// Validated logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directives applied when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Build from the raw `LOG_LEVEL` / `LOG_FORMAT` values; `None` means default.
    ///
    /// The level must parse as filter directives so a typo fails at startup
    /// instead of silently logging nothing.
    pub fn from_parts(level: Option<String>, format: Option<String>) -> Result<Self, ConfigError> {
        let level = level.unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        EnvFilter::try_new(&level).map_err(|e| ConfigError::InvalidValue {
            field: LOG_LEVEL,
            reason: e.to_string(),
        })?;

        let format = format.as_deref().map(str::parse).transpose()?.unwrap_or_default();

        Ok(Self { level, format })
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber. Later calls are no-ops.
    pub fn init(&self) {
        let builder = tracing_subscriber::fmt().with_env_filter(self.filter());
        let installed = match self.format {
            LogFormat::Pretty => builder.try_init(),
            LogFormat::Json => builder.json().flatten_event(true).try_init(),
        };
        if installed.is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.into(),
            format: LogFormat::Pretty,
        }
    }
}
