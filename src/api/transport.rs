//! Shared HTTP client construction.

use std::time::Duration;

const USER_AGENT: &str = concat!("twitch-client/", env!("CARGO_PKG_VERSION"));

/// Build the one HTTP client used for OAuth and Helix calls.
pub fn build_http_client(timeout: Duration) -> reqwest::Client {
    // Fall back to reqwest defaults if builder creation fails for any reason.
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
