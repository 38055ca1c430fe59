//! Configuration directory, upstream endpoints, and runtime settings.
//!
//! Everything here is resolved once at startup and handed to the rest of the
//! crate by reference through [`crate::context::AppContext`].

mod dir;
mod env;
mod settings;

pub use dir::{ConfigDir, CONFIG_DIR_NAME};
pub(crate) use env::lookup_nonempty as lookup_env_nonempty;
pub use env::{process_env, ENV_API_DIR, ENV_HTTP_TIMEOUT_SECS, ENV_OPEN_BROWSER};
pub use settings::{
    Endpoints, Settings, DEFAULT_AUTHORIZE_URL, DEFAULT_HELIX_BASE_URL, DEFAULT_TOKEN_URL,
};
