//! Environment lookups used during startup resolution.
//!
//! Resolution helpers take an `env_lookup` closure instead of reading the
//! process environment directly, so tests can feed fixed maps.

use std::time::Duration;

use crate::error::ConfigError;

/// Overrides the config root; the config directory is `<root>/.streaming`.
pub const ENV_API_DIR: &str = "TWITCH_API_DIR";
/// Overrides the HTTP timeout applied to OAuth and Helix requests.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "TWITCH_HTTP_TIMEOUT_SECS";
/// `0`/`false`/`no`/`off` stops bootstrap from launching a browser.
pub const ENV_OPEN_BROWSER: &str = "TWITCH_OPEN_BROWSER";

/// Process-environment lookup with blank values treated as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| normalized_string(&value))
}

/// Look up a key and drop blank values.
pub(crate) fn lookup_nonempty<FEnv>(env_lookup: &FEnv, key: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(key).and_then(|value| normalized_string(&value))
}

/// Parse the HTTP timeout override, if one is set.
pub(super) fn http_timeout_override_with<FEnv>(
    env_lookup: &FEnv,
) -> Result<Option<Duration>, ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup_nonempty(env_lookup, ENV_HTTP_TIMEOUT_SECS) else {
        return Ok(None);
    };
    // Clamp to at least 1 second to avoid "no-timeout" accidental behavior.
    let secs = raw.parse::<u64>().map_err(|_| {
        ConfigError::Invalid(format!(
            "invalid {ENV_HTTP_TIMEOUT_SECS} value `{raw}`: expected positive integer seconds"
        ))
    })?;
    Ok(Some(Duration::from_secs(secs.max(1))))
}

/// Parse the browser-launch toggle, if one is set.
pub(super) fn open_browser_override_with<FEnv>(
    env_lookup: &FEnv,
) -> Result<Option<bool>, ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup_nonempty(env_lookup, ENV_OPEN_BROWSER) else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid(format!(
            "invalid {ENV_OPEN_BROWSER} value `{raw}`: expected true or false"
        ))),
    }
}

fn normalized_string(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
