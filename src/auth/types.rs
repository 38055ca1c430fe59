//! Public auth model types.

use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Tokens expiring within this window are refreshed early.
pub(crate) const REFRESH_SAFETY_WINDOW_SECS: i64 = 60;
/// Lifetime assumed when the provider omits `expires_in`.
pub(crate) const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// One of the three persisted credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Secret {
    ClientId,
    ClientSecret,
    RefreshToken,
}

impl Secret {
    pub const ALL: [Secret; 3] = [Self::ClientId, Self::ClientSecret, Self::RefreshToken];

    /// Environment variable that overrides the file value.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::ClientId => "TWITCH_CLIENT_ID",
            Self::ClientSecret => "TWITCH_CLIENT_SECRET",
            Self::RefreshToken => "TWITCH_REFRESH_TOKEN",
        }
    }

    /// File name inside the config directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::ClientId => "client_id.txt",
            Self::ClientSecret => "client_secret.txt",
            Self::RefreshToken => "refresh_token.txt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ClientId => "client id",
            Self::ClientSecret => "client secret",
            Self::RefreshToken => "refresh token",
        }
    }

    /// Whether terminal echo should be suppressed while typing this value.
    pub fn is_sensitive(self) -> bool {
        !matches!(self, Self::ClientId)
    }
}

/// Where a loaded secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Env,
    File,
}

/// Registered application credentials plus the token endpoint they talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
}

/// Token pair returned by an authorization-code exchange.
///
/// The provider's expiry is not trusted here; callers pick a conservative
/// placeholder when they use the access token directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Access token handed out by [`super::TokenSession::ensure_fresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshToken {
    pub access_token: String,
    /// True when this call rotated (and persisted) the refresh token.
    pub rotated: bool,
}

/// OAuth token endpoint response shape.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub(crate) access_token: Option<String>,
    /// May be omitted on refresh.
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub(crate) expires_in: Option<i64>,
}

pub(crate) fn unix_now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
