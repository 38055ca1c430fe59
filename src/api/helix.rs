//! Current user, latest follower, and latest subscriber lookups.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;

/// Stored in result files when a lookup returned nothing or failed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Helix list envelope: every endpoint used here wraps rows in `data`.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: String,
}

/// Follower and subscription rows both carry the viewer's display name.
#[derive(Debug, Deserialize)]
struct NamedRow {
    #[serde(default)]
    user_name: String,
}

/// Authenticated Helix calls for one application client id.
#[derive(Debug, Clone)]
pub struct HelixClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
}

impl HelixClient {
    pub fn new(http: reqwest::Client, base_url: &str, client_id: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
        }
    }

    /// Id of the user that owns `access_token` (the broadcaster).
    pub async fn current_user_id(&self, access_token: &str) -> Result<String, ApiError> {
        let rows: Vec<UserRow> = self.get_data("users", &[], access_token).await?;
        rows.into_iter()
            .next()
            .map(|row| row.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("no user data returned".to_string()))
    }

    /// Display name of the most recent follower, if any.
    pub async fn latest_follower(
        &self,
        access_token: &str,
        broadcaster_id: &str,
    ) -> Result<Option<String>, ApiError> {
        let rows: Vec<NamedRow> = self
            .get_data(
                "channels/followers",
                &[("broadcaster_id", broadcaster_id), ("first", "1")],
                access_token,
            )
            .await?;
        Ok(first_name(rows))
    }

    /// Display name of the first subscriber Helix lists, if any.
    pub async fn latest_subscriber(
        &self,
        access_token: &str,
        broadcaster_id: &str,
    ) -> Result<Option<String>, ApiError> {
        let rows: Vec<NamedRow> = self
            .get_data(
                "subscriptions",
                &[("broadcaster_id", broadcaster_id), ("first", "1")],
                access_token,
            )
            .await?;
        Ok(first_name(rows))
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        access_token: &str,
    ) -> Result<Vec<T>, ApiError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(query)
            .header("Client-Id", &self.client_id)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status(status.as_u16(), body));
        }

        let text = response.text().await?;
        let envelope: DataEnvelope<T> = serde_json::from_str(&text)
            .map_err(|err| ApiError::InvalidResponse(format!("{path}: {err}")))?;
        tracing::debug!(path, rows = envelope.data.len(), "helix lookup");
        Ok(envelope.data)
    }
}

fn first_name(rows: Vec<NamedRow>) -> Option<String> {
    rows.into_iter()
        .next()
        .map(|row| row.user_name.trim().to_string())
        .filter(|name| !name.is_empty())
}
