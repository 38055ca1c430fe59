//! twitch-client: OAuth2 credential manager and stream-stats poller for Twitch.
//!
//! `bootstrap` walks an operator from nothing to a verified refresh token;
//! `run` keeps an access token fresh and writes the latest follower and
//! subscriber to small text files for stream overlays to read.
//!
//! # Quick start
//!
//! ```no_run
//! use twitch_client::context::AppContext;
//! use twitch_client::runner::run_polling;
//! use twitch_client::ui::Renderer;
//!
//! # async fn example() {
//! let ctx = AppContext::from_process_env().unwrap();
//! run_polling(&ctx, &Renderer::for_stderr()).await.unwrap();
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod context;
pub mod error;
pub mod runner;
#[cfg(test)]
pub mod testsupport;
pub mod ui;
