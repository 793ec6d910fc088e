//! # HTTP Control Repository
//!
//! [`ControlRepository`] over the control service's JSON API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/controls` | list |
//! | POST   | `/submit` | create |
//! | PUT    | `/controls/{controlId}` | update (pre-edit id in the path) |
//! | DELETE | `/controls/{controlId}` | delete |
//!
//! ## Error Mapping
//!
//! - Non-2xx on a mutation: the body's `error` string if present and
//!   non-empty, otherwise the operation's default message.
//! - Non-2xx on list: always `"Unable to fetch controls"`.
//! - Transport failure on a mutation: the generic network message.
//! - Transport failure on list: the transport error's text, falling back
//!   to the default list message.
//! - Undecodable list body: the default list message.
//!
//! No retries. Every failure is terminal for that attempt.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use cfu_core::Control;

use crate::config::ClientConfig;
use crate::error::{ClientError, RepositoryError};
use crate::repository::{ControlRepository, Operation, NETWORK_ERROR};

/// Error body returned by the service on rejected requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the control collection.
#[derive(Debug, Clone)]
pub struct HttpControlRepository {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpControlRepository {
    /// Create a new repository from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Build a repository from `CFU_API_URL` / `CFU_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RepositoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RepositoryError::transport("invalid service base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a mutating request and map its outcome.
    async fn send_mutation(
        &self,
        op: Operation,
        request: reqwest::RequestBuilder,
    ) -> Result<(), RepositoryError> {
        let resp = request.send().await.map_err(|e| {
            tracing::warn!(operation = %op, error = %e, "control service unreachable");
            RepositoryError::transport(NETWORK_ERROR)
        })?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(operation = %op, status = status.as_u16(), "control service accepted request");
            return Ok(());
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(operation = %op, error = %e, "could not read error body");
                String::new()
            }
        };
        let message = server_error_message(&body).unwrap_or_else(|| op.default_failure().to_string());
        tracing::warn!(
            operation = %op,
            status = status.as_u16(),
            %message,
            "control service rejected request"
        );
        Err(RepositoryError::request(status.as_u16(), message))
    }
}

/// The non-empty `error` string of a JSON error body, if any.
fn server_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

fn list_transport_error(e: &reqwest::Error) -> RepositoryError {
    let message = e.to_string();
    if message.trim().is_empty() {
        RepositoryError::transport(Operation::List.default_failure())
    } else {
        RepositoryError::transport(message)
    }
}

#[async_trait]
impl ControlRepository for HttpControlRepository {
    async fn list(&self) -> Result<Vec<Control>, RepositoryError> {
        let url = self.endpoint(&["controls"])?;
        tracing::debug!(%url, "fetching controls");

        let resp = self.http.get(url).send().await.map_err(|e| {
            tracing::warn!(error = %e, "control list unreachable");
            list_transport_error(&e)
        })?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "control list rejected");
            return Err(RepositoryError::request(
                status.as_u16(),
                Operation::List.default_failure(),
            ));
        }

        let controls: Vec<Control> = resp.json().await.map_err(|e| {
            tracing::warn!(error = %e, "control list body undecodable");
            RepositoryError::transport(Operation::List.default_failure())
        })?;
        tracing::debug!(count = controls.len(), "fetched controls");
        Ok(controls)
    }

    async fn create(&self, control: &Control) -> Result<(), RepositoryError> {
        let url = self.endpoint(&["submit"])?;
        tracing::debug!(control_id = %control.control_id, "creating control");
        self.send_mutation(Operation::Create, self.http.post(url).json(control))
            .await
    }

    async fn update(&self, original_id: &str, control: &Control) -> Result<(), RepositoryError> {
        let url = self.endpoint(&["controls", original_id])?;
        tracing::debug!(
            original_id,
            control_id = %control.control_id,
            "updating control"
        );
        self.send_mutation(Operation::Update, self.http.put(url).json(control))
            .await
    }

    async fn delete(&self, control_id: &str) -> Result<(), RepositoryError> {
        let url = self.endpoint(&["controls", control_id])?;
        tracing::debug!(control_id, "deleting control");
        self.send_mutation(Operation::Delete, self.http.delete(url))
            .await
    }
}
