//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ROLLCALL_API_BASE_URL` - Record service origin (default: <https://backend.nurdcells.com>)
//! - `ROLLCALL_API_TOKEN` - Bearer token sent with every request
//! - `ROLLCALL_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: 15, max: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://backend.nurdcells.com";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Minimum character entropy expected of an API token.
const MIN_TOKEN_BITS_PER_CHAR: f64 = 3.0;

/// Lowercase fragments of the values people leave in `.env` templates.
const PLACEHOLDER_FRAGMENTS: &[&str] = &["your-", "changeme", "placeholder", "example", "xxx"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin client configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct AdminConfig {
    /// Origin of the record service; collection paths are joined under `/api/`.
    pub api_base_url: Url,
    /// Optional bearer token for the record service.
    pub api_token: Option<SecretString>,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .finish()
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            api_token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = match lookup("ROLLCALL_API_BASE_URL") {
            Some(raw) => parse_base_url("ROLLCALL_API_BASE_URL", &raw)?,
            None => default_base_url(),
        };

        let api_token = lookup("ROLLCALL_API_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .map(|token| {
                if let Some(reason) = weak_token_reason(&token) {
                    tracing::warn!(%reason, "ROLLCALL_API_TOKEN does not look like an issued token");
                }
                SecretString::from(token)
            });

        let request_timeout = match lookup("ROLLCALL_HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_timeout("ROLLCALL_HTTP_TIMEOUT_SECS", &raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty());
        let sentry_environment = lookup("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = lookup("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            api_base_url,
            api_token,
            request_timeout,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }

    /// Replace the record service origin (e.g. from a command-line flag).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `raw` is not an absolute http(s) URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base_url("--base-url", raw)?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn default_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).unwrap_or_else(|_| unreachable!("invalid default base URL"))
}

/// Parse and normalize the service origin.
///
/// The path is kept (so a service mounted under a prefix works) and always
/// ends with `/` so later joins append rather than replace.
fn parse_base_url(var_name: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must not contain a query string or fragment".to_string(),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn parse_timeout(var_name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be between 1 and {MAX_TIMEOUT_SECS} seconds (got {secs})"),
        ));
    }

    Ok(Duration::from_secs(secs))
}

/// Character entropy of `s` in bits.
fn bits_per_char(s: &str) -> f64 {
    let mut counts: HashMap<char, u32> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }
    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }

    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / f64::from(total);
            -p * p.log2()
        })
        .sum()
}

/// Why `token` looks hand-typed, if it does.
fn weak_token_reason(token: &str) -> Option<String> {
    let lower = token.to_lowercase();
    if let Some(fragment) = PLACEHOLDER_FRAGMENTS.iter().find(|f| lower.contains(**f)) {
        return Some(format!("contains placeholder text '{fragment}'"));
    }

    let bits = bits_per_char(token);
    (bits < MIN_TOKEN_BITS_PER_CHAR).then(|| format!("only {bits:.2} bits of entropy per character"))
}
