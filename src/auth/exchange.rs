//! Authorization-code exchange for the first refresh/access token pair.

use url::Url;

use super::error::ExchangeError;
use super::types::{ExchangedTokens, OAuthClient, TokenResponse};

/// Redirect registered for the application; must match on exchange.
pub const REDIRECT_URL: &str = "http://localhost";
/// Scopes needed for the follower and subscriber lookups.
pub const SCOPES: [&str; 2] = ["moderator:read:followers", "channel:read:subscriptions"];

/// Build the consent URL the operator opens in a browser.
pub fn authorize_url(
    endpoint: &str,
    client_id: &str,
    redirect_url: &str,
    scopes: &[&str],
) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_url)
        .append_pair("response_type", "code")
        .append_pair("scope", &scopes.join(" "))
        .finish();
    format!("{endpoint}?{query}")
}

/// Pull the `code` parameter out of a pasted redirect URI.
///
/// The query string is checked first; a query string after `#` is the
/// fallback.
pub fn extract_authorization_code(redirect_uri: &str) -> Result<String, ExchangeError> {
    let parsed = Url::parse(redirect_uri.trim())
        .map_err(|err| ExchangeError::InvalidUri(format!("`{}`: {err}", redirect_uri.trim())))?;

    let from_query = code_param(parsed.query_pairs());
    let code = from_query.or_else(|| {
        parsed
            .fragment()
            .and_then(|fragment| code_param(url::form_urlencoded::parse(fragment.as_bytes())))
    });
    code.ok_or(ExchangeError::MissingCode)
}

fn code_param<'a>(
    mut pairs: impl Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
) -> Option<String> {
    pairs
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Exchange the code in `redirect_uri` for a token pair. Single attempt.
///
/// `redirect_url` must be the exact redirect used to obtain the code; the
/// provider rejects mismatches and that rejection surfaces as
/// [`ExchangeError::Status`].
pub async fn exchange_authorization_code(
    http: &reqwest::Client,
    client: &OAuthClient,
    redirect_uri: &str,
    redirect_url: &str,
) -> Result<ExchangedTokens, ExchangeError> {
    let code = extract_authorization_code(redirect_uri)?;
    let form = [
        ("client_id", client.client_id.as_str()),
        ("client_secret", client.client_secret.as_str()),
        ("code", code.as_str()),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_url),
    ];

    let response = http.post(&client.token_url).form(&form).send().await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(ExchangeError::Status(status.as_u16(), body));
    }

    let payload: TokenResponse =
        serde_json::from_str(&body).map_err(|err| ExchangeError::Decode(err.to_string()))?;
    let access_token = payload.access_token.unwrap_or_default().trim().to_string();
    if access_token.is_empty() {
        return Err(ExchangeError::Decode(
            "token exchange response did not include access_token".to_string(),
        ));
    }
    let refresh_token = payload.refresh_token.unwrap_or_default().trim().to_string();
    if refresh_token.is_empty() {
        return Err(ExchangeError::Decode(
            "token exchange response did not include refresh_token".to_string(),
        ));
    }

    tracing::info!("authorization code exchanged for a new token pair");
    Ok(ExchangedTokens {
        access_token,
        refresh_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_code_from_query() {
        let code = extract_authorization_code(
            "http://localhost/?code=ABC123&scope=moderator%3Aread%3Afollowers",
        )
        .expect("code");
        assert_eq!(code, "ABC123");
    }

    #[test]
    fn extracts_code_from_query_without_path() {
        assert_eq!(
            extract_authorization_code("http://localhost?code=abc").expect("code"),
            "abc"
        );
    }

    #[test]
    fn extracts_code_from_fragment() {
        assert_eq!(
            extract_authorization_code("http://localhost/#code=ABC123").expect("code"),
            "ABC123"
        );
    }

    #[test]
    fn query_code_wins_over_fragment() {
        assert_eq!(
            extract_authorization_code("http://localhost/?code=Q#code=F").expect("code"),
            "Q"
        );
    }

    #[test]
    fn empty_query_code_falls_back_to_fragment() {
        assert_eq!(
            extract_authorization_code("http://localhost/?code=#state=x&code=F").expect("code"),
            "F"
        );
    }

    #[test]
    fn missing_code_is_an_error() {
        let err = extract_authorization_code("http://localhost/?error=access_denied")
            .expect_err("no code");
        assert!(matches!(err, ExchangeError::MissingCode));
        assert_eq!(err.to_string(), "no code found in URI");
    }

    #[test]
    fn unparseable_uri_is_an_error() {
        let err = extract_authorization_code("not a uri").expect_err("invalid");
        assert!(matches!(err, ExchangeError::InvalidUri(_)), "got: {err:?}");
    }

    #[test]
    fn authorize_url_carries_client_redirect_and_scopes() {
        let url = authorize_url(
            "https://id.twitch.tv/oauth2/authorize",
            "cid",
            REDIRECT_URL,
            &SCOPES,
        );
        let parsed = Url::parse(&url).expect("valid url");
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "cid".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "http://localhost".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&(
            "scope".into(),
            "moderator:read:followers channel:read:subscriptions".into()
        )));
    }
}
