//! Unified error types for the credential lifecycle and polling client.

use std::fmt;

use crate::auth::{PromptError, RefreshError, Secret};

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when resolving or preparing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    /// Neither `TWITCH_API_DIR` nor a home directory could be resolved.
    NoConfigRoot,
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::NoConfigRoot => write!(
                f,
                "cannot determine home directory; set TWITCH_API_DIR to choose a config root"
            ),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the Helix REST lookups.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the API.
    Status(u16, String),
    /// Body did not match the expected `{ "data": [...] }` shape.
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status code when the API answered with a non-success status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(code, _) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// BootstrapError
// ---------------------------------------------------------------------------

/// Failures that end the interactive bootstrap.
///
/// Everything an operator can fix is turned into another loop iteration, so
/// the only way out is losing the input source itself.
#[derive(Debug)]
pub enum BootstrapError {
    Prompt(PromptError),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt(e) => write!(f, "prompt: {e}"),
        }
    }
}

impl std::error::Error for BootstrapError {}

impl From<PromptError> for BootstrapError {
    fn from(e: PromptError) -> Self {
        Self::Prompt(e)
    }
}

// ---------------------------------------------------------------------------
// RunError: top-level for the polling loop
// ---------------------------------------------------------------------------

/// Fatal errors of the steady-state polling loop.
#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    /// A credential required by `run` is neither in the environment nor on disk.
    MissingCredential(Secret),
    Refresh(RefreshError),
    Api(ApiError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::MissingCredential(secret) => write!(
                f,
                "no {} found; set {} or run `twitch-client bootstrap` first",
                secret.label(),
                secret.env_var()
            ),
            Self::Refresh(e) => write!(f, "failed to refresh token: {e}"),
            Self::Api(e) => write!(f, "api: {e}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<RefreshError> for RunError {
    fn from(e: RefreshError) -> Self {
        Self::Refresh(e)
    }
}

impl From<ApiError> for RunError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}
