//! Interactive bootstrap: from missing credentials to a verified session.
//!
//! The flow is an explicit state machine:
//!
//! ```text
//! CollectClientId -> CollectClientSecret -> AcquireRefreshToken(TryFile)
//! AcquireRefreshToken(TryFile)    token on file  -> Verify
//!                                 nothing        -> AcquireRefreshToken(PromptCode)
//! AcquireRefreshToken(PromptCode) pasted URI     -> exchange -> verified lookup -> Complete
//!                                 empty line     -> token on file -> Verify
//! Verify                          refresh ok     -> verified lookup -> Complete
//!                                 failure        -> sleep, AcquireRefreshToken(PromptCode)
//! ```
//!
//! There is no retry limit. Without a working token source and an operator
//! to type one, bootstrap keeps looping between the file check and the
//! redirect prompt; only a closed input stream ends it.

use crate::auth::{
    authorize_url, exchange_authorization_code, try_open_browser, unix_now_secs,
    CredentialStore, LineInput, OAuthClient, PromptError, Secret, TokenSession, REDIRECT_URL,
    SCOPES,
};
use crate::context::AppContext;
use crate::error::BootstrapError;
use crate::ui::RenderSink;

/// Placeholder lifetime for the access token returned by a code exchange.
///
/// The exchange response's expiry is not trusted; this only has to cover the
/// single verification call, and the next `run` refreshes regardless.
pub const EXCHANGED_ACCESS_TOKEN_TTL_SECS: i64 = 3600;

const PROMPT_CLIENT_ID: &str = "Enter TWITCH_CLIENT_ID: ";
const PROMPT_CLIENT_SECRET: &str = "Enter TWITCH_CLIENT_SECRET: ";
const PROMPT_REDIRECT_URI: &str =
    "Paste full Twitch redirect URI (or press Enter to read from file): ";

/// How the next refresh-token acquisition attempt is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireStep {
    /// Read the token from the environment or token file once, silently.
    TryFile,
    /// Show the consent URL and ask for a redirect URI.
    PromptCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapState {
    CollectClientId,
    CollectClientSecret,
    AcquireRefreshToken(AcquireStep),
    Verify { refresh_token: String },
    Complete(BootstrapOutcome),
}

/// Result of a successful bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub broadcaster_id: String,
    /// Refresh token in effect at the end (after any rotation).
    pub refresh_token: String,
}

/// True when any of client id, client secret, or refresh token is missing.
pub fn needs_bootstrap(store: &CredentialStore) -> bool {
    Secret::ALL.into_iter().any(|secret| !store.has(secret))
}

/// One bootstrap run over a context, an input source, and an output sink.
pub struct Bootstrap<'a> {
    ctx: &'a AppContext,
    input: &'a mut dyn LineInput,
    sink: &'a dyn RenderSink,
    client_id: String,
    client_secret: String,
    browser_opened: bool,
}

impl<'a> Bootstrap<'a> {
    pub fn new(
        ctx: &'a AppContext,
        input: &'a mut dyn LineInput,
        sink: &'a dyn RenderSink,
    ) -> Self {
        Self {
            ctx,
            input,
            sink,
            client_id: String::new(),
            client_secret: String::new(),
            browser_opened: false,
        }
    }

    /// Drive the state machine until it completes.
    pub async fn run(mut self) -> Result<BootstrapOutcome, BootstrapError> {
        self.sink.section("bootstrap");
        self.sink.field(
            "config",
            &self.ctx.config_dir().path().display().to_string(),
        );

        let mut state = BootstrapState::CollectClientId;
        loop {
            state = match state {
                BootstrapState::Complete(outcome) => return Ok(outcome),
                other => self.step(other).await?,
            };
        }
    }

    /// Perform one transition.
    pub async fn step(&mut self, state: BootstrapState) -> Result<BootstrapState, BootstrapError> {
        match state {
            BootstrapState::CollectClientId => {
                self.client_id = self.ctx.store.prompt_and_store(
                    Secret::ClientId,
                    PROMPT_CLIENT_ID,
                    &mut *self.input,
                )?;
                Ok(BootstrapState::CollectClientSecret)
            }
            BootstrapState::CollectClientSecret => {
                self.client_secret = self.ctx.store.prompt_and_store(
                    Secret::ClientSecret,
                    PROMPT_CLIENT_SECRET,
                    &mut *self.input,
                )?;
                Ok(BootstrapState::AcquireRefreshToken(AcquireStep::TryFile))
            }
            BootstrapState::AcquireRefreshToken(AcquireStep::TryFile) => {
                Ok(match self.ctx.store.load(Secret::RefreshToken) {
                    Some(refresh_token) => BootstrapState::Verify { refresh_token },
                    None => {
                        self.sink
                            .activity("No refresh token on file; authorization required.");
                        BootstrapState::AcquireRefreshToken(AcquireStep::PromptCode)
                    }
                })
            }
            BootstrapState::AcquireRefreshToken(AcquireStep::PromptCode) => {
                self.prompt_for_code().await
            }
            BootstrapState::Verify { refresh_token } => {
                let session = TokenSession::new(self.oauth_client(), refresh_token);
                Ok(self.verify(session).await)
            }
            BootstrapState::Complete(outcome) => Ok(BootstrapState::Complete(outcome)),
        }
    }

    fn oauth_client(&self) -> OAuthClient {
        self.ctx.oauth_client(&self.client_id, &self.client_secret)
    }

    async fn prompt_for_code(&mut self) -> Result<BootstrapState, BootstrapError> {
        let url = authorize_url(
            &self.ctx.endpoints.authorize_url,
            &self.client_id,
            REDIRECT_URL,
            &SCOPES,
        );
        self.sink.activity("Authorize the application in a browser:");
        self.sink.detail(&url);
        if self.ctx.settings.open_browser && !self.browser_opened {
            self.browser_opened = try_open_browser(&url);
        }

        let Some(line) = self
            .input
            .read_line(PROMPT_REDIRECT_URI, false)
            .map_err(PromptError::from)?
        else {
            return Err(PromptError::InputClosed.into());
        };
        let pasted = line.trim();

        if pasted.is_empty() {
            return Ok(match self.ctx.store.load(Secret::RefreshToken) {
                Some(refresh_token) => BootstrapState::Verify { refresh_token },
                None => {
                    self.sink
                        .activity("No token found in file, please try again.");
                    BootstrapState::AcquireRefreshToken(AcquireStep::PromptCode)
                }
            });
        }

        let client = self.oauth_client();
        let tokens =
            match exchange_authorization_code(&self.ctx.http, &client, pasted, REDIRECT_URL).await
            {
                Ok(tokens) => tokens,
                Err(err) => {
                    self.sink
                        .error(&format!("Failed to exchange code for refresh token: {err}"));
                    return Ok(BootstrapState::AcquireRefreshToken(AcquireStep::PromptCode));
                }
            };

        if !self
            .ctx
            .store
            .save_or_warn(Secret::RefreshToken, &tokens.refresh_token)
        {
            self.sink.warn(
                "Could not save the refresh token; it is only kept in memory for this run.",
            );
        }
        let session = TokenSession::with_access_token(
            client,
            tokens.refresh_token,
            tokens.access_token,
            unix_now_secs().saturating_add(EXCHANGED_ACCESS_TOKEN_TTL_SECS),
        );
        Ok(self.verify(session).await)
    }

    /// Make sure the session yields an access token, then confirm it with
    /// the current-user lookup.
    async fn verify(&mut self, mut session: TokenSession) -> BootstrapState {
        let fresh = match session.ensure_fresh(&self.ctx.http, &self.ctx.store).await {
            Ok(fresh) => fresh,
            Err(err) => {
                self.sink.error(&format!("Failed to refresh token: {err}"));
                return self.back_off().await;
            }
        };
        if fresh.rotated {
            self.sink.activity("Refresh token rotated, saved new token.");
        }

        let helix = self.ctx.helix(&self.client_id);
        match helix.current_user_id(&fresh.access_token).await {
            Ok(broadcaster_id) => {
                self.sink.success(&format!(
                    "Bootstrap successful. Broadcaster ID: {broadcaster_id}"
                ));
                tracing::info!(broadcaster_id = %broadcaster_id, "bootstrap complete");
                BootstrapState::Complete(BootstrapOutcome {
                    broadcaster_id,
                    refresh_token: session.refresh_token().to_string(),
                })
            }
            Err(err) => {
                self.sink
                    .error(&format!("Failed to look up broadcaster id: {err}"));
                self.back_off().await
            }
        }
    }

    async fn back_off(&self) -> BootstrapState {
        let delay = self.ctx.settings.bootstrap_retry_delay;
        self.sink
            .activity(&format!("Retrying in {} seconds...", delay.as_secs()));
        tokio::time::sleep(delay).await;
        BootstrapState::AcquireRefreshToken(AcquireStep::PromptCode)
    }
}
