//! Steady-state polling: refresh, look up, write result files, sleep.

use crate::api::{HelixClient, NOT_AVAILABLE};
use crate::auth::{Secret, TokenSession};
use crate::context::AppContext;
use crate::error::{ApiError, RunError};
use crate::ui::RenderSink;

/// Display name of the most recent follower, or `N/A`.
pub const LATEST_FOLLOW_FILE: &str = "latestFollow.txt";
/// Display name of the first listed subscriber, or `N/A`.
pub const LATEST_SUBSCRIBER_FILE: &str = "latestSubscriber.txt";

/// What one successful poll observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub broadcaster_id: String,
    pub follower: String,
    pub subscriber: String,
    /// The refresh token rotated (and was persisted) during this poll.
    pub rotated: bool,
}

#[derive(Debug, Clone, Copy)]
enum Lookup {
    Follower,
    Subscriber,
}

impl Lookup {
    fn label(self) -> &'static str {
        match self {
            Self::Follower => "Most recent follower",
            Self::Subscriber => "Most recent subscriber",
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            Self::Follower => LATEST_FOLLOW_FILE,
            Self::Subscriber => LATEST_SUBSCRIBER_FILE,
        }
    }
}

/// Session and Helix client for the polling loop.
pub struct Poller<'a> {
    ctx: &'a AppContext,
    session: TokenSession,
    helix: HelixClient,
}

impl<'a> Poller<'a> {
    /// Build from stored credentials; all three must be present.
    pub fn from_store(ctx: &'a AppContext) -> Result<Self, RunError> {
        let client_id = require(ctx, Secret::ClientId)?;
        let client_secret = require(ctx, Secret::ClientSecret)?;
        let refresh_token = require(ctx, Secret::RefreshToken)?;

        Ok(Self {
            ctx,
            session: TokenSession::new(ctx.oauth_client(&client_id, &client_secret), refresh_token),
            helix: ctx.helix(&client_id),
        })
    }

    pub fn session(&self) -> &TokenSession {
        &self.session
    }

    /// One iteration.
    ///
    /// Refresh and current-user failures are fatal and leave the result
    /// files untouched. Follower and subscriber failures degrade to `N/A`.
    pub async fn poll_once(&mut self, sink: &dyn RenderSink) -> Result<PollReport, RunError> {
        let fresh = self
            .session
            .ensure_fresh(&self.ctx.http, &self.ctx.store)
            .await?;
        if fresh.rotated {
            sink.activity("Refresh token rotated, saved new token.");
        }

        let broadcaster_id = self.helix.current_user_id(&fresh.access_token).await?;

        let result = self
            .helix
            .latest_follower(&fresh.access_token, &broadcaster_id)
            .await;
        let follower = self.resolve(Lookup::Follower, result, sink);

        let result = self
            .helix
            .latest_subscriber(&fresh.access_token, &broadcaster_id)
            .await;
        let subscriber = self.resolve(Lookup::Subscriber, result, sink);

        Ok(PollReport {
            broadcaster_id,
            follower,
            subscriber,
            rotated: fresh.rotated,
        })
    }

    /// Poll forever, sleeping the configured interval between iterations.
    pub async fn run(mut self, sink: &dyn RenderSink) -> Result<(), RunError> {
        loop {
            let report = self.poll_once(sink).await?;
            tracing::debug!(
                broadcaster_id = %report.broadcaster_id,
                follower = %report.follower,
                subscriber = %report.subscriber,
                "poll complete"
            );
            tokio::time::sleep(self.ctx.settings.poll_interval).await;
        }
    }

    /// Turn a lookup result into the value to show and save, then save it.
    fn resolve(
        &mut self,
        lookup: Lookup,
        result: Result<Option<String>, ApiError>,
        sink: &dyn RenderSink,
    ) -> String {
        let value = match result {
            Ok(Some(name)) => name,
            Ok(None) => NOT_AVAILABLE.to_string(),
            Err(err) => {
                if err.status_code() == Some(401) {
                    self.session.mark_expired();
                }
                tracing::warn!(lookup = lookup.label(), error = %err, "lookup failed");
                sink.warn(&format!("{} lookup failed: {err}", lookup.label()));
                NOT_AVAILABLE.to_string()
            }
        };

        sink.field(lookup.label(), &value);
        if let Err(err) = self.ctx.store.write_result(lookup.file_name(), &value) {
            tracing::warn!(file = lookup.file_name(), error = %err, "failed to save poll result");
            sink.warn(&err.to_string());
        }
        value
    }
}

fn require(ctx: &AppContext, secret: Secret) -> Result<String, RunError> {
    ctx.store
        .load(secret)
        .ok_or(RunError::MissingCredential(secret))
}

/// Entry point for `run`.
pub async fn run_polling(ctx: &AppContext, sink: &dyn RenderSink) -> Result<(), RunError> {
    let poller = Poller::from_store(ctx)?;
    sink.section("polling");
    sink.field("config", &ctx.config_dir().path().display().to_string());
    sink.field(
        "interval",
        &format!("{}s", ctx.settings.poll_interval.as_secs()),
    );
    poller.run(sink).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionState;
    use crate::config::{Endpoints, Settings};
    use crate::testsupport::{store_with_env, TestTempDir};
    use crate::ui::RecordingSink;

    fn context(tmp: &TestTempDir) -> AppContext {
        AppContext::new(
            store_with_env(tmp, &[]),
            Endpoints::for_base_url("http://127.0.0.1:9"),
            Settings::immediate(),
        )
    }

    #[test]
    fn from_store_names_the_first_missing_secret() {
        let tmp = TestTempDir::new("runner-missing");
        tmp.write_text("client_id.txt", "cid");
        tmp.write_text("client_secret.txt", "csec");
        let ctx = context(&tmp);

        let err = Poller::from_store(&ctx).err().expect("missing refresh token");
        assert!(matches!(
            err,
            RunError::MissingCredential(Secret::RefreshToken)
        ));
    }

    #[test]
    fn from_store_starts_with_an_expired_session() {
        let tmp = TestTempDir::new("runner-session");
        tmp.write_text("client_id.txt", "cid");
        tmp.write_text("client_secret.txt", "csec");
        tmp.write_text("refresh_token.txt", "rt");
        let ctx = context(&tmp);

        let poller = Poller::from_store(&ctx).expect("poller");
        assert_eq!(poller.session().state(), &SessionState::Expired);
        assert_eq!(poller.session().refresh_token(), "rt");
    }

    #[test]
    fn failed_lookup_degrades_and_unauthorized_expires_session() {
        let tmp = TestTempDir::new("runner-degrade");
        tmp.write_text("client_id.txt", "cid");
        tmp.write_text("client_secret.txt", "csec");
        tmp.write_text("refresh_token.txt", "rt");
        let ctx = context(&tmp);
        let mut poller = Poller::from_store(&ctx).expect("poller");
        poller.session = TokenSession::with_access_token(
            ctx.oauth_client("cid", "csec"),
            "rt",
            "at",
            i64::MAX,
        );
        let sink = RecordingSink::new();

        let value = poller.resolve(
            Lookup::Follower,
            Err(ApiError::Status(401, "expired".into())),
            &sink,
        );
        assert_eq!(value, NOT_AVAILABLE);
        assert_eq!(poller.session().state(), &SessionState::Expired);
        assert_eq!(tmp.read_text(LATEST_FOLLOW_FILE).as_deref(), Some("N/A"));
        assert!(sink.contains("Most recent follower lookup failed"));
    }

    #[test]
    fn empty_lookup_writes_sentinel_without_warning() {
        let tmp = TestTempDir::new("runner-empty");
        tmp.write_text("client_id.txt", "cid");
        tmp.write_text("client_secret.txt", "csec");
        tmp.write_text("refresh_token.txt", "rt");
        let ctx = context(&tmp);
        let mut poller = Poller::from_store(&ctx).expect("poller");
        let sink = RecordingSink::new();

        let value = poller.resolve(Lookup::Subscriber, Ok(None), &sink);
        assert_eq!(value, "N/A");
        assert_eq!(
            tmp.read_text(LATEST_SUBSCRIBER_FILE).as_deref(),
            Some("N/A")
        );
        assert!(!sink.lines().iter().any(|line| line.starts_with("warn:")));
    }
}
