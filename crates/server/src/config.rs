//! Server configuration loaded from `GLOSSA_*` environment variables.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use glossa_core::{FetchConfig, LookupConfig, RateLimit, RateLimitConfig};
use url::Url;

/// Application configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub fetch: FetchConfig,
    pub lookup: LookupConfig,
    pub rate_limits: RateLimitConfig,
    /// Allowed CORS origins; empty allows any origin.
    pub allowed_origins: Vec<String>,
    /// Upper bound on handling one request, in seconds.
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            fetch: FetchConfig::default(),
            lookup: LookupConfig::default(),
            rate_limits: RateLimitConfig::default(),
            allowed_origins: Vec::new(),
            request_timeout: 60,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a configuration from a variable lookup, falling back to defaults.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `GLOSSA_BIND_ADDR` | `0.0.0.0:8080` |
    /// | `GLOSSA_REQUEST_TIMEOUT` | `60` |
    /// | `GLOSSA_FETCH_TIMEOUT` | `30` |
    /// | `GLOSSA_USER_AGENT` | Glossa user agent |
    /// | `GLOSSA_LLM_BASE_URL` | `https://api.openai.com/v1` |
    /// | `GLOSSA_LLM_API_KEY` | required |
    /// | `GLOSSA_LLM_MODEL` | `gpt-4o-mini` |
    /// | `GLOSSA_LLM_TIMEOUT` | `20` |
    /// | `GLOSSA_PARSE_LIMIT` | `10` |
    /// | `GLOSSA_LOOKUP_LIMIT` | `60` |
    /// | `GLOSSA_RATE_WINDOW` | `60` |
    /// | `GLOSSA_ALLOWED_ORIGINS` | any origin |
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let fetch = FetchConfig {
            timeout: parse_var(&var, "GLOSSA_FETCH_TIMEOUT", defaults.fetch.timeout)?,
            user_agent: var("GLOSSA_USER_AGENT").unwrap_or(defaults.fetch.user_agent),
        };

        let base_url = var("GLOSSA_LLM_BASE_URL").unwrap_or(defaults.lookup.base_url);
        Url::parse(&base_url).with_context(|| format!("GLOSSA_LLM_BASE_URL is not a valid URL: {}", base_url))?;

        let lookup = LookupConfig {
            base_url,
            api_key: var("GLOSSA_LLM_API_KEY").context("GLOSSA_LLM_API_KEY must be set")?,
            model: var("GLOSSA_LLM_MODEL").unwrap_or(defaults.lookup.model),
            temperature: defaults.lookup.temperature,
            timeout: parse_var(&var, "GLOSSA_LLM_TIMEOUT", defaults.lookup.timeout)?,
        };

        let window = Duration::from_secs(parse_var(&var, "GLOSSA_RATE_WINDOW", 60)?);
        let rate_limits = RateLimitConfig {
            parse: RateLimit::new(
                parse_var(&var, "GLOSSA_PARSE_LIMIT", defaults.rate_limits.parse.max_requests)?,
                window,
            ),
            lookup: RateLimit::new(
                parse_var(&var, "GLOSSA_LOOKUP_LIMIT", defaults.rate_limits.lookup.max_requests)?,
                window,
            ),
        };

        let allowed_origins = var("GLOSSA_ALLOWED_ORIGINS")
            .map(|origins| {
                origins.split(',').map(str::trim).filter(|o| !o.is_empty()).map(str::to_string).collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr: parse_var(&var, "GLOSSA_BIND_ADDR", defaults.bind_addr)?,
            fetch,
            lookup,
            rate_limits,
            allowed_origins,
            request_timeout: parse_var(&var, "GLOSSA_REQUEST_TIMEOUT", defaults.request_timeout)?,
        })
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(value) => value.trim().parse().with_context(|| format!("{} has an invalid value: {}", key, value)),
        None => Ok(default),
    }
}
