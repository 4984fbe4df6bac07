//! Relay configuration.
//!
//! [`RelayArgs`] is the clap front: every flag falls back to an environment
//! variable and then to a default. [`RelayConfig`] is the plain struct the
//! server runs on, so tests can build one without touching the process
//! environment.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

/// Default upstream API origin.
pub const DEFAULT_UPSTREAM_URL: &str = "https://generativelanguage.googleapis.com";

/// Default multimodal model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Default upstream request timeout in seconds; matches the request-duration ceiling.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default request body limit: five 10 MiB images plus multipart overhead.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Environment variable holding the upstream credential.
pub const API_KEY_ENV: &str = "GOOGLE_CLOUD_API_KEY";

/// Command-line arguments for `ecg-relay`.
#[derive(Parser, Debug, Clone)]
#[command(name = "ecg-relay")]
#[command(author, version, about = "ECG analysis relay server", long_about = None)]
pub struct RelayArgs {
    /// Address to listen on
    #[arg(long, env = "ECG_RELAY_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Upstream API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upstream API origin
    #[arg(long, env = "ECG_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Upstream model name
    #[arg(long, env = "ECG_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "ECG_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Maximum request body size in bytes
    #[arg(long, env = "ECG_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl RelayArgs {
    /// Converts parsed arguments into a server configuration.
    pub fn into_config(self) -> RelayConfig {
        RelayConfig {
            bind: self.bind,
            api_key: self.api_key.filter(|k| !k.trim().is_empty()),
            upstream_url: self.upstream_url,
            model: self.model,
            timeout: Duration::from_secs(self.timeout_secs),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// Configuration the relay server runs on.
#[derive(Clone)]
pub struct RelayConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Upstream credential; `None` makes every analysis request fail with 500
    pub api_key: Option<String>,
    /// Upstream API origin
    pub upstream_url: String,
    /// Upstream model name
    pub model: String,
    /// Upstream request timeout
    pub timeout: Duration,
    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
}

impl RelayConfig {
    /// Returns the API key if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the upstream origin.
    pub fn with_upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = url.into();
        self
    }

    /// Sets the upstream request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

// Keeps the key out of logs.
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bind", &self.bind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("upstream_url", &self.upstream_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}
