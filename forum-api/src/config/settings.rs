//! Environment settings.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use forum_repository::retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};
use forum_repository::{CounterMode, NotionConfig, RetryPolicy};
use forum_repository::notion::{DEFAULT_NOTION_BASE_URL, DEFAULT_NOTION_TIMEOUT};

use super::cors::DEFAULT_CORS_ORIGINS;
use crate::errors::ConfigError;

/// Default bind host.
const DEFAULT_SERVER_HOST: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

/// Default bind port.
const DEFAULT_SERVER_PORT: u16 = 8080;

/// Where forum data is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Notion databases (production).
    Notion,
    /// Process memory; data is lost on restart.
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "notion" => Some(Self::Notion),
            "memory" | "in-memory" | "inmemory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable console output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`. Unknown values fall back to pretty output.
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Parsed configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub backend: StoreBackend,
    /// Present when `backend` is `Notion`.
    pub notion: Option<NotionConfig>,
    pub retry: RetryPolicy,
    pub counter_mode: CounterMode,
    /// `None` disables identity verification.
    pub firebase_project_id: Option<String>,
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `SERVER_HOST` / `SERVER_PORT`: bind address (default: 127.0.0.1:8080)
    /// - `STORE_BACKEND`: "notion" or "memory" (default: notion)
    /// - `NOTION_API_KEY`, `NOTION_POSTS_DB_ID`, `NOTION_COMMENTS_DB_ID`,
    ///   `NOTION_UPVOTES_DB_ID`: required for the Notion backend
    /// - `NOTION_BASE_URL`: API root (default: https://api.notion.com/v1)
    /// - `NOTION_TIMEOUT_SECS`: request timeout (default: 30)
    /// - `RETRY_MAX_RETRIES` / `RETRY_BASE_DELAY_MS`: retry policy (default: 4 / 400)
    /// - `COUNTER_MODE`: "read-modify-write" or "serialized" (default: read-modify-write)
    /// - `FIREBASE_PROJECT_ID`: enables ID token verification
    /// - `CORS_ALLOWED_ORIGINS`: comma separated origins (default: localhost dev servers)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let var = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = match var("SERVER_HOST") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::invalid("SERVER_HOST", raw))?,
            None => DEFAULT_SERVER_HOST,
        };
        let port = parse_or("SERVER_PORT", var("SERVER_PORT"), DEFAULT_SERVER_PORT)?;

        let backend = match var("STORE_BACKEND") {
            Some(raw) => {
                StoreBackend::parse(&raw).ok_or_else(|| ConfigError::invalid("STORE_BACKEND", raw))?
            }
            None => StoreBackend::Notion,
        };

        let notion = match backend {
            StoreBackend::Notion => {
                let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));
                let timeout_secs = parse_or(
                    "NOTION_TIMEOUT_SECS",
                    var("NOTION_TIMEOUT_SECS"),
                    DEFAULT_NOTION_TIMEOUT.as_secs(),
                )?;

                Some(
                    NotionConfig::new(
                        required("NOTION_API_KEY")?,
                        required("NOTION_POSTS_DB_ID")?,
                        required("NOTION_COMMENTS_DB_ID")?,
                        required("NOTION_UPVOTES_DB_ID")?,
                    )
                    .with_base_url(
                        var("NOTION_BASE_URL").unwrap_or_else(|| DEFAULT_NOTION_BASE_URL.to_string()),
                    )
                    .with_timeout(Duration::from_secs(timeout_secs)),
                )
            }
            StoreBackend::Memory => None,
        };

        let max_retries = parse_or("RETRY_MAX_RETRIES", var("RETRY_MAX_RETRIES"), DEFAULT_MAX_RETRIES)?;
        let base_delay_ms = parse_or(
            "RETRY_BASE_DELAY_MS",
            var("RETRY_BASE_DELAY_MS"),
            DEFAULT_BASE_DELAY.as_millis() as u64,
        )?;
        if base_delay_ms == 0 {
            return Err(ConfigError::invalid("RETRY_BASE_DELAY_MS", "0"));
        }

        let counter_mode = match var("COUNTER_MODE") {
            Some(raw) => {
                CounterMode::parse(&raw).ok_or_else(|| ConfigError::invalid("COUNTER_MODE", raw))?
            }
            None => CounterMode::default(),
        };

        let cors_origins = match var("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
            backend,
            notion,
            retry: RetryPolicy::new(max_retries, Duration::from_millis(base_delay_ms)),
            counter_mode,
            firebase_project_id: var("FIREBASE_PROJECT_ID"),
            cors_origins,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::invalid(name, raw)),
        None => Ok(default),
    }
}
