//! Credential lifecycle error definitions.

use std::fmt;
use std::path::PathBuf;

use super::types::Secret;

/// A secret or result file could not be written.
///
/// Callers treat this as a warning: the in-memory value stays valid for the
/// current process.
#[derive(Debug)]
pub struct StoreError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to write `{}`: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Reading operator input failed.
#[derive(Debug)]
pub enum PromptError {
    Io(std::io::Error),
    /// Standard input reached end-of-file while a value was still required.
    InputClosed,
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::InputClosed => write!(f, "input closed before a value was entered"),
        }
    }
}

impl std::error::Error for PromptError {}

impl From<std::io::Error> for PromptError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Authorization-code exchange failures. Always recoverable by re-prompting.
#[derive(Debug)]
pub enum ExchangeError {
    InvalidUri(String),
    MissingCode,
    Http(reqwest::Error),
    Status(u16, String),
    Decode(String),
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUri(msg) => write!(f, "invalid redirect URI: {msg}"),
            Self::MissingCode => write!(f, "no code found in URI"),
            Self::Http(err) => write!(f, "http: {err}"),
            Self::Status(code, body) => write!(f, "token exchange failed: status {code}: {body}"),
            Self::Decode(msg) => write!(f, "unexpected token response: {msg}"),
        }
    }
}

impl std::error::Error for ExchangeError {}

impl From<reqwest::Error> for ExchangeError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Access-token refresh failures.
#[derive(Debug)]
pub enum RefreshError {
    Http(reqwest::Error),
    Status(u16, String),
    /// The provider refused the refresh token or client credentials.
    Rejected(u16, String),
    Invalid(String),
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "http: {err}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::Rejected(code, body) => write!(
                f,
                "refresh token was rejected (status {code}: {body}); \
                 run `twitch-client bootstrap` again"
            ),
            Self::Invalid(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RefreshError {}

impl From<reqwest::Error> for RefreshError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Build a store error for `secret`'s file.
pub(crate) fn store_error(path: PathBuf, source: std::io::Error) -> StoreError {
    StoreError { path, source }
}

/// Human label used in warnings, e.g. "failed to save refresh token".
pub(crate) fn persist_warning(secret: Secret, err: &StoreError) -> String {
    format!("failed to save {}: {err}", secret.label())
}
