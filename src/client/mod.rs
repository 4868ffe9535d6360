// ABOUTME: HTTP client for the collaborator REST contract
// ABOUTME: Attaches the session credential and normalizes transport and status failures into ApiError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Remote API Client
//!
//! Every outbound call goes through a single send path, which:
//!
//! 1. joins the endpoint path beneath the configured base URL
//! 2. tags the request with a fresh `x-request-id`
//! 3. attaches `Authorization: Bearer <credential>` when the session holds one
//! 4. turns connection failures into `TransportFailure` and non-2xx answers
//!    into status-mapped [`ApiError`]s
//!
//! The client never retries and never writes to the session.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{field, instrument, Span};
use url::Url;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::constants::{defaults, headers};
use crate::errors::{ApiError, ApiResult};
use crate::logging::ConsoleLogger;
use crate::session::SessionReader;

/// FastAPI-style error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Client for the collaborator
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: SessionReader,
}

impl ApiClient {
    /// Create a client reading its credential from `session`
    ///
    /// `base_url` should end in `/` (see
    /// [`crate::config::environment::parse_api_url`]) so endpoint paths
    /// join beneath it.
    #[must_use]
    pub fn new(http: Client, base_url: Url, session: SessionReader) -> Self {
        Self {
            http,
            base_url,
            session,
        }
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Read handle on the session this client authenticates with
    #[must_use]
    pub const fn session(&self) -> &SessionReader {
        &self.session
    }

    /// GET `path` and decode the JSON body
    ///
    /// # Errors
    ///
    /// Returns transport, status or decoding failures
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self
            .execute(Method::GET, path, &[], None::<&()>)
            .await?;
        decode(&body)
    }

    /// POST a JSON body to `path` and decode the JSON response
    ///
    /// # Errors
    ///
    /// Returns transport, status or decoding failures
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::POST, path, &[], Some(body)).await?;
        decode(&response)
    }

    /// POST a JSON body to `path`, ignoring the response body
    ///
    /// # Errors
    ///
    /// Returns transport or status failures
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.execute(Method::POST, path, &[], Some(body)).await?;
        Ok(())
    }

    /// PUT a JSON body to `path`, ignoring the response body
    ///
    /// # Errors
    ///
    /// Returns transport or status failures
    pub async fn put_unit<B>(&self, path: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.put_unit_with_query(path, &[], body).await
    }

    /// PUT a JSON body plus query parameters to `path`, ignoring the response body
    ///
    /// # Errors
    ///
    /// Returns transport or status failures
    pub async fn put_unit_with_query<B>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> ApiResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.execute(Method::PUT, path, query, Some(body)).await?;
        Ok(())
    }

    /// DELETE `path`, ignoring the response body
    ///
    /// # Errors
    ///
    /// Returns transport or status failures
    pub async fn delete_unit(&self, path: &str) -> ApiResult<()> {
        self.execute(Method::DELETE, path, &[], None::<&()>)
            .await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::invalid_input(format!("invalid endpoint path {path:?}: {e}")))
    }

    /// Send one request and return the body of a 2xx response
    #[instrument(
        skip(self, query, body),
        fields(http.method = %method, http.path = %path, request.id = field::Empty)
    )]
    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> ApiResult<String>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint(path)?;
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request.id", request_id.as_str());

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(headers::REQUEST_ID, &request_id);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(credential) = self.session.current_credential() {
            let bearer = Zeroizing::new(format!("{}{}", headers::BEARER_PREFIX, credential.as_str()));
            let mut value = HeaderValue::from_str(&bearer).map_err(|_| {
                ApiError::invalid_input("credential contains characters not allowed in a header")
                    .with_request_id(&request_id)
            })?;
            value.set_sensitive(true);
            request = request.header(AUTHORIZATION, value);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| send_error(e).with_request_id(&request_id))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ApiError::transport(format!("failed to read response body: {e}"))
                .with_source(e)
                .with_request_id(&request_id)
        })?;

        ConsoleLogger::log_api_request(method.as_str(), path, status.as_u16(), &request_id);

        if !status.is_success() {
            return Err(
                ApiError::http_status(status.as_u16(), error_message(status, &text))
                    .with_request_id(request_id),
            );
        }
        Ok(text)
    }
}

/// Percent-encode an identifier for use as one path segment
///
/// # Errors
///
/// Returns a validation error for empty ids and for `.`/`..`, which URL
/// resolution would treat as relative segments
pub fn path_segment(id: &str) -> ApiResult<String> {
    match id {
        "" => Err(ApiError::missing_field("id")),
        "." | ".." => Err(ApiError::invalid_input(format!(
            "{id:?} is not a valid resource id"
        ))),
        _ => Ok(urlencoding::encode(id).into_owned()),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|e| {
        ApiError::invalid_response(format!("could not decode response body: {e}")).with_source(e)
    })
}

fn send_error(error: reqwest::Error) -> ApiError {
    if error.is_builder() {
        return ApiError::invalid_input(format!("request could not be built: {error}"))
            .with_source(error);
    }
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        format!("request failed: {error}")
    };
    ApiError::transport(message).with_source(error)
}

/// Human-readable message for a non-2xx response
fn error_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned();
    }

    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(ErrorBody {
            detail: Some(Value::String(detail)),
        }) => truncate(&detail),
        Ok(ErrorBody {
            detail: Some(Value::Array(items)),
        }) => truncate(&render_detail_list(&items)),
        Ok(ErrorBody {
            detail: Some(other),
        }) => truncate(&other.to_string()),
        _ => truncate(trimmed),
    }
}

/// Render a validation list like `[{"loc": ["body", "email"], "msg": "field required"}]`
fn render_detail_list(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| {
            let msg = item
                .get("msg")
                .and_then(Value::as_str)
                .map_or_else(|| item.to_string(), ToOwned::to_owned);
            let location = item.get("loc").and_then(Value::as_array).map(|parts| {
                parts
                    .iter()
                    .map(|part| match part {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".")
            });
            match location {
                Some(location) if !location.is_empty() => format!("{location}: {msg}"),
                _ => msg,
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn truncate(message: &str) -> String {
    if message.chars().count() <= defaults::MAX_ERROR_BODY_CHARS {
        return message.to_owned();
    }
    let mut truncated: String = message
        .chars()
        .take(defaults::MAX_ERROR_BODY_CHARS)
        .collect();
    truncated.push_str("...");
    truncated
}
