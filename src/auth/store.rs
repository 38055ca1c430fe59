//! Persistent credential store.
//!
//! Each secret lives in its own trimmed text file under the config
//! directory. A non-empty environment variable overrides the file and is
//! captured once, when the store is built.

use std::collections::BTreeMap;

use crate::config::{lookup_env_nonempty, ConfigDir};

use super::error::{persist_warning, store_error, PromptError, StoreError};
use super::input::LineInput;
use super::types::{Secret, SecretSource};

/// File-backed secrets with per-secret environment overrides.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: ConfigDir,
    overrides: BTreeMap<Secret, String>,
}

impl CredentialStore {
    /// Build a store over `dir`, snapshotting overrides from `env_lookup`.
    pub fn new<FEnv>(dir: ConfigDir, env_lookup: &FEnv) -> Self
    where
        FEnv: Fn(&str) -> Option<String>,
    {
        let overrides = Secret::ALL
            .into_iter()
            .filter_map(|secret| {
                lookup_env_nonempty(env_lookup, secret.env_var()).map(|value| (secret, value))
            })
            .collect();
        Self { dir, overrides }
    }

    pub fn dir(&self) -> &ConfigDir {
        &self.dir
    }

    /// Current value: environment first, then the secret's file.
    pub fn load(&self, secret: Secret) -> Option<String> {
        if let Some(value) = self.overrides.get(&secret) {
            return Some(value.clone());
        }
        match self.dir.read_trimmed(secret.file_name()) {
            Ok(Some(value)) => {
                tracing::info!(secret = secret.label(), "loaded from file");
                Some(value)
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(
                    secret = secret.label(),
                    error = %err,
                    "failed to read secret file"
                );
                None
            }
        }
    }

    /// Where `load` would take the value from, without logging.
    pub fn source(&self, secret: Secret) -> Option<SecretSource> {
        if self.overrides.contains_key(&secret) {
            return Some(SecretSource::Env);
        }
        match self.dir.read_trimmed(secret.file_name()) {
            Ok(Some(_)) => Some(SecretSource::File),
            _ => None,
        }
    }

    pub fn has(&self, secret: Secret) -> bool {
        self.source(secret).is_some()
    }

    /// Write the trimmed value to the secret's file. Blank values are ignored.
    pub fn save(&self, secret: Secret, value: &str) -> Result<(), StoreError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        self.dir
            .write_private(secret.file_name(), trimmed)
            .map_err(|err| store_error(self.dir.file(secret.file_name()), err))?;
        tracing::debug!(secret = secret.label(), "saved to file");
        Ok(())
    }

    /// `save`, logging failure as a warning instead of returning it.
    pub fn save_or_warn(&self, secret: Secret, value: &str) -> bool {
        match self.save(secret, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("{}", persist_warning(secret, &err));
                false
            }
        }
    }

    /// Load the secret, or keep asking until the operator types a value.
    ///
    /// Blank answers re-prompt. A typed value is saved before it is
    /// returned; a failed save is only logged.
    pub fn prompt_and_store(
        &self,
        secret: Secret,
        prompt: &str,
        input: &mut dyn LineInput,
    ) -> Result<String, PromptError> {
        loop {
            if let Some(value) = self.load(secret) {
                return Ok(value);
            }
            let Some(line) = input.read_line(prompt, secret.is_sensitive())? else {
                return Err(PromptError::InputClosed);
            };
            let value = line.trim();
            if value.is_empty() {
                continue;
            }
            self.save_or_warn(secret, value);
            return Ok(value.to_string());
        }
    }

    /// Overwrite a poll result file (`latestFollow.txt`, ...).
    pub fn write_result(&self, file_name: &str, value: &str) -> Result<(), StoreError> {
        self.dir
            .write_private(file_name, value.trim())
            .map_err(|err| store_error(self.dir.file(file_name), err))
    }
}
