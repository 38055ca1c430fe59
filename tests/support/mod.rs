//! Shared fixtures for integration tests: temp config dirs and mock-backed contexts.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use twitch_client::auth::CredentialStore;
use twitch_client::config::{ConfigDir, Endpoints, Settings};
use twitch_client::context::AppContext;
use wiremock::MockServer;

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary config directory removed on drop.
pub struct TempConfig {
    path: PathBuf,
}

impl TempConfig {
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let path = std::env::temp_dir().join(format!(
            "twitch-client-it-{prefix}-{}-{millis}-{suffix}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.path.join(name), content).expect("write fixture");
    }

    pub fn read(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.path.join(name)).ok()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path.join(name).exists()
    }
}

impl Drop for TempConfig {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Context over `dir`, with every endpoint on `server` and no sleeps.
pub fn context(dir: &TempConfig, server: &MockServer, env: &[(&str, &str)]) -> AppContext {
    let env: BTreeMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config_dir = ConfigDir::create(dir.path()).expect("config dir");
    let store = CredentialStore::new(config_dir, &|key: &str| env.get(key).cloned());
    AppContext::new(store, Endpoints::for_base_url(&server.uri()), Settings::immediate())
}

/// Write all three credential files.
pub fn seed_credentials(dir: &TempConfig, refresh_token: &str) {
    dir.write("client_id.txt", "cid");
    dir.write("client_secret.txt", "csec");
    dir.write("refresh_token.txt", refresh_token);
}

pub fn token_body(access_token: &str, refresh_token: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": 14400,
        "scope": ["moderator:read:followers", "channel:read:subscriptions"],
        "token_type": "bearer"
    })
}

/// Twitch-style error body, e.g. `{"status": 400, "message": "Invalid refresh token"}`.
pub fn error_body(status: u16, message: &str) -> serde_json::Value {
    serde_json::json!({ "status": status, "message": message })
}

pub fn users_body(id: &str) -> serde_json::Value {
    serde_json::json!({ "data": [{ "id": id, "login": "streamer", "display_name": "Streamer" }] })
}

pub fn names_body(names: &[&str]) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = names
        .iter()
        .map(|name| serde_json::json!({ "user_id": "1", "user_name": name }))
        .collect();
    serde_json::json!({ "data": rows, "total": rows.len() })
}
