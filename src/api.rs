//! HTTP client for the FirstPR matching service
//!
//! Every failure mode collapses into an [`ApiError`] whose `Display` text is
//! exactly what the error banner shows.

use crate::types::{MatchRequest, MatchResponse, ProfileUpdate, User};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Session cookie name issued by the service after the GitHub OAuth hop.
const SESSION_COOKIE: &str = "access_token";

#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 from a session endpoint.
    #[error("{0}")]
    Unauthorized(String),
    /// Non-2xx carrying a `detail` payload, already stringified.
    #[error("{0}")]
    Api(String),
    /// Non-2xx without a parseable `detail` body.
    #[error("HTTP error! Status: {0}")]
    Status(u16),
    /// Connect, transport, or body-decode failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

/// Thin typed wrapper over `reqwest`. Cheap to clone; clones share the
/// connection pool but carry their own session token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("firstpr-desktop/", env!("CARGO_PKG_VERSION"))),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Same client, different session token.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Interactive GitHub sign-in entry point, opened in the system browser.
    pub fn login_url(&self) -> String {
        format!("{}/auth/github/login", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        // The service session is a browser cookie; a native client attaches it
        // by hand on every authenticated call.
        if let Some(token) = &self.token {
            builder = builder.header(COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }
        builder
    }

    /// `POST /matches` - submit a skills profile, get ranked issues back.
    pub async fn find_matches(&self, user_profile: &str) -> Result<MatchResponse, ApiError> {
        debug!(chars = user_profile.len(), "POST /matches");
        let response = self
            .request(Method::POST, "/matches")
            .json(&MatchRequest {
                user_profile: user_profile.to_string(),
            })
            .send()
            .await?;
        decode_json(response).await
    }

    /// `GET /auth/me` - the user behind the current session, or 401.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        debug!("GET /auth/me");
        let response = self.request(Method::GET, "/auth/me").send().await?;
        decode_json(response).await
    }

    /// `PUT /auth/me` - save name and bio, returning the updated user.
    ///
    /// Older service builds answer `{"ok": true}` instead of the user, in
    /// which case the fresh state is fetched with a follow-up `GET /auth/me`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        debug!("PUT /auth/me");
        let response = self
            .request(Method::PUT, "/auth/me")
            .json(update)
            .send()
            .await?;
        let body: serde_json::Value = decode_json(response).await?;
        match serde_json::from_value::<User>(body) {
            Ok(user) => Ok(user),
            Err(_) => self.current_user().await,
        }
    }

    /// `POST /auth/logout` - clear the server-side session.
    pub async fn logout(&self) -> Result<(), ApiError> {
        debug!("POST /auth/logout");
        let response = self.request(Method::POST, "/auth/logout").send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(error_from_body(
                status,
                response.text().await.unwrap_or_default(),
            ))
        }
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_from_body(status, body));
    }
    Ok(response.json::<T>().await?)
}

/// Extract the displayable message from a `{"detail": string | object}` error
/// body. Non-string details are pretty-printed JSON, matching what the
/// service's validation errors look like.
fn error_from_body(status: StatusCode, body: String) -> ApiError {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| match b.detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string())),
        });

    match (status, message) {
        (StatusCode::UNAUTHORIZED, Some(m)) => ApiError::Unauthorized(m),
        (StatusCode::UNAUTHORIZED, None) => ApiError::Unauthorized("Unauthorized".to_string()),
        (_, Some(m)) => ApiError::Api(m),
        (s, None) => ApiError::Status(s.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, token: Option<&str>) -> ApiClient {
        ApiClient::new(server.uri(), token.map(str::to_string))
    }

    #[tokio::test]
    async fn find_matches_decodes_ranked_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/matches"))
            .and(body_json(serde_json::json!({"user_profile": "I know Rust"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "matches": [
                    {"repo_name": "serde-rs/serde", "title": "Improve error spans", "score": 0.91,
                     "labels": ["good first issue"], "url": "https://github.com/serde-rs/serde/issues/1"},
                    {"title": "Docs pass", "score": 0.4, "labels": [],
                     "url": "https://github.com/x/y/issues/2"}
                ],
                "issues_scanned": 812,
                "profile_summary": "I know Rust"
            })))
            .mount(&server)
            .await;

        let response = client(&server, None).find_matches("I know Rust").await.unwrap();
        assert_eq!(response.matches.len(), 2);
        assert_eq!(response.matches[0].repo_name.as_deref(), Some("serde-rs/serde"));
        assert_eq!(response.matches[1].repo_name, None);
        assert_eq!(response.issues_scanned, Some(812));
    }

    #[tokio::test]
    async fn string_detail_becomes_the_banner_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/matches"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "detail": "No issues found in the local database. Please run the scanner first."
            })))
            .mount(&server)
            .await;

        let err = client(&server, None).find_matches("x").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "No issues found in the local database. Please run the scanner first."
        );
    }

    #[tokio::test]
    async fn object_detail_is_pretty_printed() {
        let server = MockServer::start().await;
        let detail = serde_json::json!([
            {"loc": ["body", "user_profile"], "msg": "field required", "type": "value_error.missing"}
        ]);
        Mock::given(method("POST"))
            .and(path("/matches"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"detail": detail.clone()})),
            )
            .mount(&server)
            .await;

        let err = client(&server, None).find_matches("x").await.unwrap_err();
        assert_eq!(err.to_string(), serde_json::to_string_pretty(&detail).unwrap());
    }

    #[tokio::test]
    async fn detail_free_error_reports_the_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/matches"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let err = client(&server, None).find_matches("x").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! Status: 500");
    }

    #[tokio::test]
    async fn current_user_sends_the_session_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("cookie", "access_token=tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "username": "octocat",
                "name": "The Octocat",
                "email": "octo@example.com",
                "avatar_url": "https://avatars.example/octocat.png",
                "bio": null
            })))
            .mount(&server)
            .await;

        let user = client(&server, Some("tok-123")).current_user().await.unwrap();
        assert_eq!(user.username, "octocat");
        assert_eq!(user.bio, None);
    }

    #[tokio::test]
    async fn expired_session_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"detail": "Unauthorized"})),
            )
            .mount(&server)
            .await;

        let err = client(&server, Some("stale")).current_user().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Unauthorized");
    }

    #[tokio::test]
    async fn update_profile_accepts_the_legacy_ok_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/auth/me"))
            .and(body_json(serde_json::json!({"name": "Ada", "bio": "Systems"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "username": "ada", "name": "Ada", "bio": "Systems"
            })))
            .mount(&server)
            .await;

        let user = client(&server, Some("tok"))
            .update_profile(&ProfileUpdate {
                name: "Ada".to_string(),
                bio: "Systems".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(user.bio.as_deref(), Some("Systems"));
    }

    #[tokio::test]
    async fn update_profile_uses_the_returned_user_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "username": "ada", "name": "Ada L.", "bio": "Analytical engines"
            })))
            .mount(&server)
            .await;

        let user = client(&server, Some("tok"))
            .update_profile(&ProfileUpdate {
                name: "Ada L.".to_string(),
                bio: "Analytical engines".to_string(),
            })
            .await
            .unwrap();
        // No GET fallback mounted; parsing the PUT body directly must succeed.
        assert_eq!(user.name.as_deref(), Some("Ada L."));
    }

    #[tokio::test]
    async fn logout_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        client(&server, Some("tok")).logout().await.unwrap();
    }
}
