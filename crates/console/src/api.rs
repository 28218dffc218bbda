//! Platform API client for remote mode.
//!
//! Thin JSON/REST client over reqwest. Success responses wrap the entity
//! under a named key (`review`, `reviews`, `stats`, ...) plus an optional
//! `message`; failures are normalized into [`ApiError`] so the store layer
//! only ever sees one error shape. Bodies use snake_case field names.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::config::RemoteConfig;

/// Errors from the platform API boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The server answered 404 for the requested entity.
    #[error("{0}")]
    NotFound(String),

    /// The server answered with an error status and (optionally) a message.
    #[error("{0}")]
    Remote(String),

    /// Transport-level failure (connection refused, DNS, TLS).
    #[error("{0}")]
    Http(String),

    /// The response body was not the expected shape.
    #[error("unexpected response payload: {0}")]
    Decode(String),
}

impl ApiError {
    fn from_reqwest(err: &reqwest::Error, context: &str) -> Self {
        if err.is_timeout() {
            Self::Timeout(context.to_string())
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Platform API client.
///
/// Cheap to clone; all clones share one connection pool and configuration.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

/// Server response to a delete request.
///
/// Guarded resources (coupons with usage, merchants with history) are
/// deactivated server-side instead of removed; the response carries the flag.
#[derive(Debug, serde::Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub deactivated: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying HTTP client cannot be
    /// constructed (e.g. an invalid bearer token value).
    pub fn new(config: &RemoteConfig) -> Result<Self, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &config.api_token {
            let value = format!("Bearer {}", token.expose_secret());
            let mut value = reqwest::header::HeaderValue::from_str(&value)
                .map_err(|e| ApiError::Http(format!("invalid api token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Http(format!("failed to build http client: {e}")))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                timeout: config.timeout,
            }),
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Http(format!("invalid path {path}: {e}")))
    }

    /// Execute a request and return the parsed JSON body.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let context = format!("{method} {path}");
        let url = self.url_for(path)?;

        let mut request = self.inner.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e, &context))?;

        let status = response.status();
        let payload: Value = match response.json().await {
            Ok(v) => v,
            // Some error responses carry no body at all.
            Err(_) if !status.is_success() => Value::Null,
            Err(e) => return Err(ApiError::from_reqwest(&e, &context)),
        };

        if status == StatusCode::NOT_FOUND {
            let message = extract_message(&payload)
                .unwrap_or_else(|| format!("{context}: not found"));
            return Err(ApiError::NotFound(message));
        }

        if !status.is_success() {
            let message = extract_message(&payload)
                .unwrap_or_else(|| format!("{context}: {status}"));
            return Err(ApiError::Remote(message));
        }

        Ok(payload)
    }

    /// Fetch a list of entities wrapped under `key`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the envelope does not
    /// contain `key`.
    #[instrument(skip(self, query))]
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        key: &str,
    ) -> Result<Vec<T>, ApiError> {
        let payload = self.execute(Method::GET, path, query, None).await?;
        unwrap_key(payload, key)
    }

    /// Fetch a single entity wrapped under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for a 404, or another [`ApiError`] on
    /// failure.
    #[instrument(skip(self))]
    pub async fn get_one<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<T, ApiError> {
        let payload = self.execute(Method::GET, path, &[], None).await?;
        unwrap_key(payload, key)
    }

    /// POST `body` and return the created entity wrapped under `key`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the envelope does not
    /// contain `key`.
    #[instrument(skip(self, body))]
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        key: &str,
    ) -> Result<T, ApiError> {
        let body = to_value(body)?;
        let payload = self.execute(Method::POST, path, &[], Some(&body)).await?;
        unwrap_key(payload, key)
    }

    /// PATCH `body` and return the updated entity wrapped under `key`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the envelope does not
    /// contain `key`.
    #[instrument(skip(self, body))]
    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        key: &str,
    ) -> Result<T, ApiError> {
        let body = to_value(body)?;
        let payload = self.execute(Method::PATCH, path, &[], Some(&body)).await?;
        unwrap_key(payload, key)
    }

    /// DELETE the entity at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<DeleteResponse, ApiError> {
        let payload = self.execute(Method::DELETE, path, &[], None).await?;
        serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// The configured request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }
}

fn to_value(body: &impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn unwrap_key<T: DeserializeOwned>(mut payload: Value, key: &str) -> Result<T, ApiError> {
    let entity = payload
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApiError::Decode(format!("response missing '{key}' key")))?;
    serde_json::from_value(entity).map_err(|e| ApiError::Decode(e.to_string()))
}

fn extract_message(payload: &Value) -> Option<String> {
    payload
        .get("message")
        .and_then(Value::as_str)
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_key_extracts_the_named_entity() {
        let payload = serde_json::json!({
            "review": { "note": "tasty" },
            "message": "created"
        });
        let entity: Value = unwrap_key(payload, "review").unwrap();
        assert_eq!(entity["note"], "tasty");
    }

    #[test]
    fn unwrap_key_reports_missing_envelope_keys() {
        let payload = serde_json::json!({ "reviews": [] });
        let err = unwrap_key::<Value>(payload, "review").unwrap_err();
        assert!(err.to_string().contains("'review'"));
    }

    #[test]
    fn extract_message_reads_the_optional_field() {
        let payload = serde_json::json!({ "message": "coupon code already exists" });
        assert_eq!(
            extract_message(&payload).as_deref(),
            Some("coupon code already exists")
        );
        assert_eq!(extract_message(&Value::Null), None);
    }

    #[test]
    fn delete_response_defaults_to_hard_delete() {
        let response: DeleteResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(!response.deactivated);

        let response: DeleteResponse =
            serde_json::from_value(serde_json::json!({ "deactivated": true })).unwrap();
        assert!(response.deactivated);
    }
}
