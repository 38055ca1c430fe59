//! CLI argument parsing via clap.

use clap::{Parser, ValueEnum};

/// Twitch OAuth credential manager and follower/subscriber poller.
///
/// Without a command, runs `bootstrap` when any credential is missing and
/// `run` otherwise.
#[derive(Debug, Parser)]
#[command(name = "twitch-client", version)]
pub struct Args {
    /// `bootstrap` to set up credentials, `run` to start polling.
    #[arg(value_enum)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Command {
    /// Collect client credentials and obtain a refresh token interactively.
    Bootstrap,
    /// Refresh the access token and poll Helix every 30 seconds.
    Run,
}
