//! Remote fetcher for the read-only user API.
//!
//! The adapter owns transport details only: URL building, the request timeout,
//! HTTP status mapping, and JSON decoding into [`User`] records. It performs
//! exactly one request per call and never retries; retry policy belongs to the
//! caller.

use crate::error::{DirectoryError, Result};
use crate::model::{User, UserId};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not complete: DNS, connection, timeout, or a non-2xx status.
    #[error("network error: {message}")]
    Network { message: String },

    /// The response body did not match the expected user shape.
    #[error("decode error: {message}")]
    Decode { message: String },
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Summary suitable for showing next to a retry prompt.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "Failed to fetch users: the server could not be reached".to_string()
            }
            Self::Decode { .. } => {
                "Failed to fetch users: the server sent an unexpected response".to_string()
            }
        }
    }
}

/// Port for reading the canonical remote user collection.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// `GET /users`
    async fn fetch_all(&self) -> std::result::Result<Vec<User>, FetchError>;

    /// `GET /users/{id}`. A 404 is reported as `Ok(None)`.
    async fn fetch_one(&self, id: UserId) -> std::result::Result<Option<User>, FetchError>;
}

pub struct HttpUserSource {
    client: Client,
    base_url: Url,
}

impl HttpUserSource {
    /// Build a source for `base_url` with a client-level request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim_end_matches('/');
        let base_url = Url::parse(&format!("{}/", trimmed))
            .map_err(|e| DirectoryError::Config(format!("Invalid API URL {}: {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Config(format!("Could not build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::network(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn get(&self, url: Url) -> std::result::Result<(StatusCode, Vec<u8>), FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl UserSource for HttpUserSource {
    #[instrument(level = "debug", skip(self), fields(base = %self.base_url))]
    async fn fetch_all(&self) -> std::result::Result<Vec<User>, FetchError> {
        let (status, body) = self.get(self.endpoint("users")?).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_users(&body)
    }

    #[instrument(level = "debug", skip(self), fields(base = %self.base_url))]
    async fn fetch_one(&self, id: UserId) -> std::result::Result<Option<User>, FetchError> {
        let (status, body) = self.get(self.endpoint(&format!("users/{}", id))?).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_user(&body).map(Some)
    }
}

fn parse_users(body: &[u8]) -> std::result::Result<Vec<User>, FetchError> {
    serde_json::from_slice(body)
        .map_err(|e| FetchError::decode(format!("invalid users payload: {}", e)))
}

fn parse_user(body: &[u8]) -> std::result::Result<User, FetchError> {
    serde_json::from_slice(body)
        .map_err(|e| FetchError::decode(format!("invalid user payload: {}", e)))
}

fn map_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::network(format!("request timed out: {}", error))
    } else {
        FetchError::network(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FetchError {
    let preview = body_preview(body);
    if preview.is_empty() {
        FetchError::network(format!("status {}", status.as_u16()))
    } else {
        FetchError::network(format!("status {}: {}", status.as_u16(), preview))
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{}...", preview)
    } else {
        preview
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::NewUser;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A user with only the required fields set.
    pub fn user(id: UserId, name: &str, email: &str) -> User {
        NewUser::new(name, email).into_user(id)
    }

    /// A source that answers every call with the same canned result.
    pub struct StaticSource {
        response: std::result::Result<Vec<User>, FetchError>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        pub fn users(users: Vec<User>) -> Self {
            Self {
                response: Ok(users),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(error: FetchError) -> Self {
            Self {
                response: Err(error),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserSource for StaticSource {
        async fn fetch_all(&self) -> std::result::Result<Vec<User>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }

        async fn fetch_one(&self, id: UserId) -> std::result::Result<Option<User>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map(|users| users.into_iter().find(|u| u.id == id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        let result = HttpUserSource::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(DirectoryError::Config(_))));
    }

    #[test]
    fn endpoints_keep_base_path() {
        let source = HttpUserSource::new("http://localhost:8080/api/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            source.endpoint("users/3").unwrap().as_str(),
            "http://localhost:8080/api/users/3"
        );

        let bare = HttpUserSource::new("http://localhost:8080", Duration::from_secs(1)).unwrap();
        assert_eq!(
            bare.endpoint("users").unwrap().as_str(),
            "http://localhost:8080/users"
        );
    }

    #[test]
    fn non_success_status_maps_to_network_error() {
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, b"{\"error\": \"down\"}");
        assert_eq!(
            error,
            FetchError::network("status 500: {\"error\": \"down\"}")
        );
    }

    #[test]
    fn wrong_shape_maps_to_decode_error() {
        let error = parse_users(br#"{"users": []}"#).unwrap_err();
        assert!(matches!(error, FetchError::Decode { .. }));

        let error = parse_users(br#"[{"id": 1, "name": "missing the rest"}]"#).unwrap_err();
        assert!(matches!(error, FetchError::Decode { .. }));
    }

    #[test]
    fn long_bodies_are_truncated_in_messages() {
        let body = "x".repeat(500);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 123);
    }

    #[test]
    fn user_messages_name_the_failure_kind() {
        assert!(FetchError::network("x").user_message().contains("could not be reached"));
        assert!(FetchError::decode("x").user_message().contains("unexpected response"));
    }
}
