//! Self-refreshing access-token session over a refresh token.

use super::error::RefreshError;
use super::store::CredentialStore;
use super::types::{
    unix_now_secs, FreshToken, OAuthClient, Secret, TokenResponse, DEFAULT_EXPIRES_IN_SECS,
    REFRESH_SAFETY_WINDOW_SECS,
};

/// Cached access-token state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Next `ensure_fresh` must call the token endpoint.
    Expired,
    Valid {
        access_token: String,
        expires_at_unix: i64,
    },
}

/// Tokens returned by one refresh call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at_unix: i64,
}

/// Refresh token plus the access token derived from it.
///
/// A session built with [`TokenSession::new`] starts `Expired`, so the
/// refresh token is checked against the provider before any authenticated
/// call goes out.
#[derive(Debug, Clone)]
pub struct TokenSession {
    client: OAuthClient,
    refresh_token: String,
    state: SessionState,
}

impl TokenSession {
    pub fn new(client: OAuthClient, refresh_token: impl Into<String>) -> Self {
        Self {
            client,
            refresh_token: refresh_token.into(),
            state: SessionState::Expired,
        }
    }

    /// Session that already holds an access token valid until `expires_at_unix`.
    pub fn with_access_token(
        client: OAuthClient,
        refresh_token: impl Into<String>,
        access_token: impl Into<String>,
        expires_at_unix: i64,
    ) -> Self {
        Self {
            client,
            refresh_token: refresh_token.into(),
            state: SessionState::Valid {
                access_token: access_token.into(),
                expires_at_unix,
            },
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// True when the next `ensure_fresh` will hit the token endpoint.
    pub fn needs_refresh(&self) -> bool {
        match &self.state {
            SessionState::Expired => true,
            SessionState::Valid {
                expires_at_unix, ..
            } => unix_now_secs().saturating_add(REFRESH_SAFETY_WINDOW_SECS) >= *expires_at_unix,
        }
    }

    /// Drop the cached access token, e.g. after the API answered 401.
    pub fn mark_expired(&mut self) {
        self.state = SessionState::Expired;
    }

    /// Return a usable access token, refreshing first when needed.
    ///
    /// A rotated refresh token is written to `store` before this returns. A
    /// failed write is logged; the in-memory token is still updated.
    pub async fn ensure_fresh(
        &mut self,
        http: &reqwest::Client,
        store: &CredentialStore,
    ) -> Result<FreshToken, RefreshError> {
        if !self.needs_refresh() {
            if let SessionState::Valid { access_token, .. } = &self.state {
                return Ok(FreshToken {
                    access_token: access_token.clone(),
                    rotated: false,
                });
            }
        }

        let refreshed = refresh_access_token(http, &self.client, &self.refresh_token).await?;
        let rotated = refreshed.refresh_token != self.refresh_token;
        if rotated {
            tracing::info!("refresh token rotated; persisting new token");
            store.save_or_warn(Secret::RefreshToken, &refreshed.refresh_token);
            self.refresh_token = refreshed.refresh_token;
        }
        self.state = SessionState::Valid {
            access_token: refreshed.access_token.clone(),
            expires_at_unix: refreshed.expires_at_unix,
        };
        Ok(FreshToken {
            access_token: refreshed.access_token,
            rotated,
        })
    }
}

/// One `grant_type=refresh_token` call against the client's token endpoint.
pub async fn refresh_access_token(
    http: &reqwest::Client,
    client: &OAuthClient,
    refresh_token: &str,
) -> Result<RefreshedTokens, RefreshError> {
    let form = [
        ("client_id", client.client_id.as_str()),
        ("client_secret", client.client_secret.as_str()),
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ];

    let response = http.post(&client.token_url).form(&form).send().await?;
    let status = response.status();
    if !status.is_success() {
        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = code, "token refresh rejected");
        // Twitch answers 400 for revoked tokens and 401/403 for bad client credentials.
        if matches!(code, 400 | 401 | 403) {
            return Err(RefreshError::Rejected(code, body));
        }
        return Err(RefreshError::Status(code, body));
    }

    let body = response.text().await?;
    let payload: TokenResponse = serde_json::from_str(&body).map_err(|err| {
        RefreshError::Invalid(format!("token refresh response was not valid JSON: {err}"))
    })?;
    let access_token = payload.access_token.unwrap_or_default().trim().to_string();
    if access_token.is_empty() {
        return Err(RefreshError::Invalid(
            "token refresh response did not include access_token".to_string(),
        ));
    }
    // An omitted refresh token means the current one stays valid.
    let refresh_token = payload
        .refresh_token
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| refresh_token.to_string());

    let expires_in = payload.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS).max(60);
    Ok(RefreshedTokens {
        access_token,
        refresh_token,
        expires_at_unix: unix_now_secs().saturating_add(expires_in),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OAuthClient {
        OAuthClient {
            client_id: "cid".into(),
            client_secret: "csec".into(),
            token_url: "http://127.0.0.1:9/oauth2/token".into(),
        }
    }

    #[test]
    fn new_session_starts_expired() {
        let session = TokenSession::new(client(), "rt");
        assert_eq!(session.state(), &SessionState::Expired);
        assert!(session.needs_refresh());
    }

    #[test]
    fn session_with_access_token_is_valid_until_near_expiry() {
        let healthy =
            TokenSession::with_access_token(client(), "rt", "at", unix_now_secs() + 3600);
        assert!(!healthy.needs_refresh());

        let almost = TokenSession::with_access_token(client(), "rt", "at", unix_now_secs() + 30);
        assert!(almost.needs_refresh());

        let past = TokenSession::with_access_token(client(), "rt", "at", unix_now_secs() - 5);
        assert!(past.needs_refresh());
    }

    #[test]
    fn mark_expired_forces_refresh() {
        let mut session =
            TokenSession::with_access_token(client(), "rt", "at", unix_now_secs() + 3600);
        session.mark_expired();
        assert!(session.needs_refresh());
        assert_eq!(session.refresh_token(), "rt");
    }
}
