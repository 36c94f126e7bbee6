use super::{ApiError, CategoryApi, CreateCategory, UpdateCategory};
use crate::category::{CategoryId, CategoryNode};
use futures::StreamExt;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Accepts both `[...]` and `{ "data": [...] }` response shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

/// [`CategoryApi`] over JSON/HTTPS.
///
/// Routes, relative to the configured base URL:
///
/// | operation | request |
/// |-----------|---------|
/// | fetch     | `GET    /categories` |
/// | create    | `POST   /categories` |
/// | update    | `PATCH  /categories/{id}` |
/// | delete    | `DELETE /categories/{id}` (409 = in use) |
pub struct HttpCategoryApi {
    client: reqwest::Client,
    base: Url,
    token: Option<SecretString>,
    timeout: Duration,
}

impl std::fmt::Debug for HttpCategoryApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCategoryApi")
            .field("base", &self.base.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpCategoryApi {
    /// Build a client for `base_url`.
    ///
    /// HTTPS is required so the bearer token never travels in clear text;
    /// plain HTTP is only accepted for `localhost`/`127.0.0.1`.
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base = validate_base_url(base_url)?;
        Ok(Self {
            client,
            base,
            token,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, id: Option<&CategoryId>) -> Url {
        let mut url = self.base.clone();
        // Bases are validated in `new`, so they always have path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("categories");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        request.send().await.map_err(ApiError::Network)
    }

    /// Run one whole exchange under the configured timeout. `send` resolves
    /// once headers arrive, so the body read has to sit inside the deadline
    /// too.
    async fn within_deadline<T>(
        &self,
        exchange: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                tracing::warn!(timeout = ?self.timeout, "Category backend request timed out");
                ApiError::Timeout(self.timeout.as_secs())
            })?
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let bytes = read_limited(response, MAX_RESPONSE_SIZE).await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.into_inner())
    }
}

fn json_body<T: serde::Serialize>(
    request: reqwest::RequestBuilder,
    payload: &T,
) -> Result<reqwest::RequestBuilder, ApiError> {
    let body = serde_json::to_vec(payload)?;
    Ok(request
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body))
}

fn ensure_success(response: &reqwest::Response, op: &'static str) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    tracing::warn!(op, status = status.as_u16(), "Category backend rejected request");
    Err(ApiError::HttpStatus(status.as_u16()))
}

impl CategoryApi for HttpCategoryApi {
    async fn fetch_tree(&self) -> Result<Vec<CategoryNode>, ApiError> {
        let url = self.endpoint(None);
        tracing::debug!(url = %url, "Fetching category tree");

        self.within_deadline(async {
            let response = self.send(self.client.get(url)).await?;
            ensure_success(&response, "fetch")?;
            Self::read_json(response).await
        })
        .await
    }

    async fn create_category(&self, payload: CreateCategory) -> Result<CategoryNode, ApiError> {
        let url = self.endpoint(None);
        tracing::debug!(url = %url, parent_id = ?payload.parent_id, "Creating category");

        self.within_deadline(async {
            let response = self.send(json_body(self.client.post(url), &payload)?).await?;
            ensure_success(&response, "create")?;
            Self::read_json(response).await
        })
        .await
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        payload: UpdateCategory,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(Some(id));
        tracing::debug!(url = %url, "Updating category");

        self.within_deadline(async {
            let response = self.send(json_body(self.client.patch(url), &payload)?).await?;
            ensure_success(&response, "update")
        })
        .await
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), ApiError> {
        let url = self.endpoint(Some(id));
        tracing::debug!(url = %url, "Deleting category");

        self.within_deadline(async {
            let response = self.send(self.client.delete(url)).await?;
            if response.status() == StatusCode::CONFLICT {
                tracing::info!(category_id = %id, "Delete refused: category still referenced");
                return Err(ApiError::InUse);
            }
            ensure_success(&response, "delete")
        })
        .await
    }
}

/// Parse and vet the configured base URL.
fn validate_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(format!("'{}' cannot be a base", raw)));
    }

    match url.scheme() {
        "https" => Ok(url),
        "http" => {
            let local = matches!(url.host_str(), Some("localhost") | Some("127.0.0.1"));
            if local {
                tracing::warn!(base_url = %url, "Using non-HTTPS API base URL (localhost only)");
                Ok(url)
            } else {
                tracing::error!(base_url = %url, "Rejecting non-HTTPS API base URL");
                Err(ApiError::InsecureBaseUrl)
            }
        }
        other => Err(ApiError::InvalidBaseUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

/// Read a response body, refusing anything larger than `limit` bytes.
async fn read_limited(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ApiError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
