//! Upstream endpoints and fixed timing settings.

use std::time::Duration;

use crate::error::ConfigError;

use super::env::{http_timeout_override_with, open_browser_override_with};

/// OAuth token endpoint for code exchange and refresh.
pub const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
/// Consent page the operator opens during bootstrap.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://id.twitch.tv/oauth2/authorize";
/// Helix REST base.
pub const DEFAULT_HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_BOOTSTRAP_RETRY_DELAY: Duration = Duration::from_secs(5);
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream URLs. Only tests point these anywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token_url: String,
    pub authorize_url: String,
    pub helix_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            helix_base_url: DEFAULT_HELIX_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Route every endpoint to one mock server base.
    pub fn for_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            token_url: format!("{base}/oauth2/token"),
            authorize_url: format!("{base}/oauth2/authorize"),
            helix_base_url: format!("{base}/helix"),
        }
    }
}

/// Timing knobs for the polling loop and bootstrap retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Sleep between polling iterations.
    pub poll_interval: Duration,
    /// Sleep after a failed bootstrap verification.
    pub bootstrap_retry_delay: Duration,
    /// Request timeout for OAuth and Helix calls.
    pub http_timeout: Duration,
    /// Launch a browser for the consent page during bootstrap.
    pub open_browser: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            bootstrap_retry_delay: DEFAULT_BOOTSTRAP_RETRY_DELAY,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            open_browser: true,
        }
    }
}

impl Settings {
    /// Defaults with environment overrides applied.
    pub fn from_env_with<FEnv>(env_lookup: &FEnv) -> Result<Self, ConfigError>
    where
        FEnv: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(timeout) = http_timeout_override_with(env_lookup)? {
            settings.http_timeout = timeout;
        }
        if let Some(open_browser) = open_browser_override_with(env_lookup)? {
            settings.open_browser = open_browser;
        }
        Ok(settings)
    }

    /// Zero delays and no browser, for driving loops in tests.
    pub fn immediate() -> Self {
        Self {
            poll_interval: Duration::ZERO,
            bootstrap_retry_delay: Duration::ZERO,
            http_timeout: Duration::from_secs(5),
            open_browser: false,
        }
    }
}
