//! Startup-resolved context shared by bootstrap and the polling loop.

use crate::api::{build_http_client, HelixClient};
use crate::auth::{CredentialStore, OAuthClient};
use crate::config::{process_env, ConfigDir, Endpoints, Settings};
use crate::error::ConfigError;

/// Config directory, credential store, endpoints, settings, and HTTP client.
///
/// Built once in `main` and passed by reference; nothing here changes after
/// construction except the files behind the store.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub store: CredentialStore,
    pub endpoints: Endpoints,
    pub settings: Settings,
    pub http: reqwest::Client,
}

impl AppContext {
    pub fn new(store: CredentialStore, endpoints: Endpoints, settings: Settings) -> Self {
        let http = build_http_client(settings.http_timeout);
        Self {
            store,
            endpoints,
            settings,
            http,
        }
    }

    /// Resolve the config directory, overrides, and settings from `env_lookup`.
    pub fn from_env_with<FEnv>(env_lookup: &FEnv) -> Result<Self, ConfigError>
    where
        FEnv: Fn(&str) -> Option<String>,
    {
        let dir = ConfigDir::resolve_with(env_lookup)?;
        let settings = Settings::from_env_with(env_lookup)?;
        let store = CredentialStore::new(dir, env_lookup);
        Ok(Self::new(store, Endpoints::default(), settings))
    }

    pub fn from_process_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&process_env)
    }

    pub fn config_dir(&self) -> &ConfigDir {
        self.store.dir()
    }

    pub fn oauth_client(&self, client_id: &str, client_secret: &str) -> OAuthClient {
        OAuthClient {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: self.endpoints.token_url.clone(),
        }
    }

    pub fn helix(&self, client_id: &str) -> HelixClient {
        HelixClient::new(self.http.clone(), &self.endpoints.helix_base_url, client_id)
    }
}
