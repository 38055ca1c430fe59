//! The config directory holding secrets and poll results.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::env::{lookup_nonempty, ENV_API_DIR};

/// Directory name created under the config root.
pub const CONFIG_DIR_NAME: &str = ".streaming";

/// A config directory that is known to exist.
///
/// The only constructors create the directory (with parents), so every file
/// read or write through this type happens after creation. The path never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir {
    path: PathBuf,
}

impl ConfigDir {
    /// Resolve `<TWITCH_API_DIR or home>/.streaming` and create it.
    pub fn resolve_with<FEnv>(env_lookup: &FEnv) -> Result<Self, ConfigError>
    where
        FEnv: Fn(&str) -> Option<String>,
    {
        let root = lookup_nonempty(env_lookup, ENV_API_DIR)
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::NoConfigRoot)?;
        Self::create(root.join(CONFIG_DIR_NAME))
    }

    /// Use an explicit directory path, creating it if needed.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let existed = path.is_dir();
        std::fs::create_dir_all(&path)?;
        // An existing directory keeps whatever mode the operator gave it.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if !existed {
                let _ = std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o750));
            }
        }
        #[cfg(not(unix))]
        let _ = existed;
        tracing::debug!(path = %path.display(), "config directory ready");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file directly inside the config directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Read a file and trim it. Missing or blank files yield `None`.
    pub fn read_trimmed(&self, name: &str) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(self.file(name)) {
            Ok(text) => {
                let trimmed = text.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Overwrite a file with owner-only permissions.
    pub fn write_private(&self, name: &str, contents: &str) -> std::io::Result<()> {
        let path = self.file(name);
        let mut options = std::fs::OpenOptions::new();
        options.create(true).truncate(true).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        #[cfg(unix)]
        {
            // Files created by older builds may carry wider modes.
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    #[test]
    fn resolve_uses_api_dir_override_as_root() {
        let tmp = TestTempDir::new("config-root");
        let root = tmp.path().to_string_lossy().to_string();
        let lookup = move |key: &str| (key == ENV_API_DIR).then(|| root.clone());

        let dir = ConfigDir::resolve_with(&lookup).expect("resolve");
        assert_eq!(dir.path(), tmp.child(CONFIG_DIR_NAME));
        assert!(dir.path().is_dir());
    }

    #[test]
    fn create_makes_missing_parents() {
        let tmp = TestTempDir::new("config-nested");
        let dir = ConfigDir::create(tmp.child("a/b/c")).expect("create");
        assert!(dir.path().is_dir());
    }

    #[test]
    fn read_trimmed_treats_missing_and_blank_as_absent() {
        let tmp = TestTempDir::new("config-read");
        let dir = ConfigDir::create(tmp.path()).expect("create");
        assert_eq!(dir.read_trimmed("nope.txt").expect("read"), None);

        tmp.write_text("blank.txt", " \n\t ");
        assert_eq!(dir.read_trimmed("blank.txt").expect("read"), None);

        tmp.write_text("value.txt", "  hello \n");
        assert_eq!(
            dir.read_trimmed("value.txt").expect("read").as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn write_private_overwrites_whole_file() {
        let tmp = TestTempDir::new("config-write");
        let dir = ConfigDir::create(tmp.path()).expect("create");
        dir.write_private("f.txt", "a much longer first value")
            .expect("write");
        dir.write_private("f.txt", "short").expect("write");
        assert_eq!(
            std::fs::read_to_string(dir.file("f.txt")).expect("read"),
            "short"
        );
    }

    #[cfg(unix)]
    #[test]
    fn write_private_sets_owner_only_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TestTempDir::new("config-mode");
        let dir = ConfigDir::create(tmp.path()).expect("create");
        dir.write_private("secret.txt", "x").expect("write");
        let mode = std::fs::metadata(dir.file("secret.txt"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn create_leaves_existing_directory_mode_alone() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TestTempDir::new("config-existing-mode");
        let path = tmp.child("locked");
        std::fs::create_dir_all(&path).expect("mkdir");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o700)).expect("chmod");

        let dir = ConfigDir::create(&path).expect("create");
        let mode = std::fs::metadata(dir.path())
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[cfg(unix)]
    #[test]
    fn create_gives_new_directory_group_read_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TestTempDir::new("config-new-mode");
        let dir = ConfigDir::create(tmp.child("fresh")).expect("create");
        let mode = std::fs::metadata(dir.path())
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o750);
    }
}
