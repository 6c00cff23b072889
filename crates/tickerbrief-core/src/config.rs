//! Application configuration.
//!
//! Tickers and the analysis window come from a YAML file; Telegram
//! credentials come from the environment (optionally via `.env`, loaded by
//! the binary before configuration is read). The bot token is held as a
//! [`SecretString`] so it cannot leak through Debug output or logs.

use std::env;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::{Symbol, ValidationError};

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "TICKERBRIEF_CONFIG";
/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

const DEFAULT_DAYS: usize = 30;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file '{path}' was not found")]
    Missing { path: PathBuf },

    #[error("failed to read configuration file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file '{path}' is not valid YAML")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("tickers must be a non-empty list of symbols")]
    NoTickers,

    #[error(transparent)]
    Symbol(#[from] ValidationError),
}

/// Telegram delivery credentials, both optional.
pub struct TelegramConfig {
    pub bot_token: Option<SecretString>,
    pub chat_id: Option<String>,
}

impl TelegramConfig {
    pub fn from_env() -> Self {
        Self {
            bot_token: env::var(BOT_TOKEN_ENV)
                .ok()
                .map(|token| SecretString::new(token.into())),
            chat_id: env::var(CHAT_ID_ENV).ok(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Fully loaded application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub tickers: Vec<Symbol>,
    /// Analysis window in trading days.
    pub days: usize,
    pub telegram: TelegramConfig,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    tickers: Vec<String>,
    #[serde(default = "default_days")]
    days: usize,
}

fn default_days() -> usize {
    DEFAULT_DAYS
}

impl AppConfig {
    /// Load configuration from YAML and the environment.
    ///
    /// Path resolution: explicit override, then [`CONFIG_PATH_ENV`], then
    /// [`DEFAULT_CONFIG_PATH`]. Ticker entries are trimmed, blank entries
    /// dropped, and the remainder validated and uppercased.
    pub fn load(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path_override
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let contents = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::Missing { path: path.clone() }
            } else {
                ConfigError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let raw: RawConfig = serde_yaml::from_str(&contents).map_err(|source| {
            ConfigError::Parse {
                path: path.clone(),
                source,
            }
        })?;

        let tickers = raw
            .tickers
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .map(Symbol::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if tickers.is_empty() {
            return Err(ConfigError::NoTickers);
        }

        Ok(Self {
            tickers,
            days: raw.days,
            telegram: TelegramConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should be creatable");
        file.write_all(contents.as_bytes())
            .expect("temp file should be writable");
        file
    }

    #[test]
    fn loads_and_normalizes_tickers() {
        let file = write_config("tickers:\n  - aapl\n  - ' msft '\n  - ''\n");
        let config = AppConfig::load(Some(file.path())).expect("config should load");

        let tickers: Vec<&str> = config.tickers.iter().map(Symbol::as_str).collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(config.days, 30);
    }

    #[test]
    fn honors_configured_days() {
        let file = write_config("tickers: [SPY]\ndays: 60\n");
        let config = AppConfig::load(Some(file.path())).expect("config should load");
        assert_eq!(config.days, 60);
    }

    #[test]
    fn missing_file_is_a_distinct_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/tickerbrief.yml")))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn empty_ticker_list_is_rejected() {
        let file = write_config("tickers: []\n");
        let err = AppConfig::load(Some(file.path())).expect_err("must fail");
        assert!(matches!(err, ConfigError::NoTickers));
    }

    #[test]
    fn invalid_ticker_is_rejected() {
        let file = write_config("tickers: ['AA$PL']\n");
        let err = AppConfig::load(Some(file.path())).expect_err("must fail");
        assert!(matches!(err, ConfigError::Symbol(_)));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let file = write_config("tickers: [unclosed\n");
        let err = AppConfig::load(Some(file.path())).expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn debug_output_redacts_the_bot_token() {
        let config = TelegramConfig {
            bot_token: Some(SecretString::new("123:secret".into())),
            chat_id: Some(String::from("42")),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
