//! Credential lifecycle: secret storage, code exchange, and token refresh.
//!
//! Secrets are plain trimmed files under the config directory
//! (`~/.streaming/*.txt` by default), each overridable by a `TWITCH_*`
//! environment variable. The refresh token file is the only state carried
//! between runs, so nothing in this module ever deletes it.

mod browser;
mod error;
mod exchange;
mod input;
mod session;
mod store;
mod types;

pub use browser::try_open_browser;
pub use error::{ExchangeError, PromptError, RefreshError, StoreError};
pub use exchange::{
    authorize_url, exchange_authorization_code, extract_authorization_code, REDIRECT_URL, SCOPES,
};
pub use input::{LineInput, ScriptedInput, StdinInput};
pub use session::{refresh_access_token, RefreshedTokens, SessionState, TokenSession};
pub use store::CredentialStore;
pub use types::{ExchangedTokens, FreshToken, OAuthClient, Secret, SecretSource};

pub(crate) use types::unix_now_secs;
