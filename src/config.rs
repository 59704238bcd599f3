//! Configuration management for the relay
//!
//! Configuration is loaded from environment variables once at startup and
//! never mutated afterwards.

use std::fmt;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Marker that allows every origin when present in `ALLOWED_ORIGINS`
pub const WILDCARD_ORIGIN: &str = "*";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_MS: u64 = 25_000;
const DEFAULT_PORT: u16 = 7860;

/// Origins permitted to call the relay from a browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// `*` was configured: every origin is accepted
    Any,
    /// Only these exact origins are accepted
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parse a comma-separated origin list. Any `*` entry turns the whole
    /// list into a wildcard.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.iter().any(|o| o == WILDCARD_ORIGIN) {
            Self::Any
        } else {
            Self::List(origins)
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Exact, case-sensitive membership check
    pub fn contains(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(origins) => origins.iter().any(|o| o == origin),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Upstream completion API base URL
    pub openai_api_url: String,
    /// Upstream API key, sent as a bearer credential
    pub openai_api_key: Option<String>,

    /// Shared secret callers present in `X-Relay-Key`.
    /// Protected routes answer 500 while this is unset.
    pub relay_key: Option<String>,

    /// Model used when the caller omits one
    pub default_model: String,
    /// Upper bound for each outbound call
    pub upstream_timeout: Duration,

    pub allowed_origins: AllowedOrigins,
    /// Whether a non-preflight request without an `Origin` header passes the
    /// origin guard when `allowed_origins` is a fixed list
    pub allow_missing_origin: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let timeout_ms: u64 = match var("TIMEOUT_AI") {
            Some(raw) => raw.trim().parse().context("Invalid TIMEOUT_AI")?,
            None => DEFAULT_TIMEOUT_MS,
        };
        if timeout_ms == 0 {
            bail!("TIMEOUT_AI must be a positive number of milliseconds");
        }

        Ok(Self {
            host: var("RELAY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: match var("PORT") {
                Some(raw) => raw.trim().parse().context("Invalid PORT")?,
                None => DEFAULT_PORT,
            },

            openai_api_url: var("OPENAI_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            openai_api_key: var("OPENAI_API_KEY"),

            relay_key: var("RELAY_KEY"),

            default_model: var("MODEL_DEFAULT").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            upstream_timeout: Duration::from_millis(timeout_ms),

            allowed_origins: AllowedOrigins::parse(
                var("ALLOWED_ORIGINS").as_deref().unwrap_or(WILDCARD_ORIGIN),
            ),
            allow_missing_origin: var("RELAY_ALLOW_MISSING_ORIGIN")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        })
    }

    /// Timeout in whole milliseconds, for logs and error messages
    pub fn timeout_ms(&self) -> u64 {
        self.upstream_timeout.as_millis() as u64
    }
}

// Secrets are reported only as set/unset.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("openai_api_url", &self.openai_api_url)
            .field("openai_api_key_set", &self.openai_api_key.is_some())
            .field("relay_key_set", &self.relay_key.is_some())
            .field("default_model", &self.default_model)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("allowed_origins", &self.allowed_origins)
            .field("allow_missing_origin", &self.allow_missing_origin)
            .finish()
    }
}
