// ABOUTME: Unified error type for remote calls, local validation and credential storage
// ABOUTME: Maps collaborator HTTP statuses onto stable error codes and kinds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Every console operation reports failure through [`ApiError`]. The error
//! carries a stable [`ErrorCode`], the HTTP status when the collaborator
//! answered with one, a human-readable message and the id of the request
//! that failed.
//!
//! The three kinds callers usually branch on are exposed through
//! [`ErrorKind`]: transport failures (nothing reached the collaborator),
//! HTTP status failures (the collaborator rejected the call) and validation
//! failures (the call was never made).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the console
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Transport
    /// The collaborator could not be reached
    #[serde(rename = "TRANSPORT_FAILURE")]
    TransportFailure,

    // HTTP status failures reported by the collaborator
    /// 401: credential missing, expired or wrong username/password
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid,
    /// 403: the credential is valid but lacks the privilege
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied,
    /// 404: the addressed resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    /// 409: the resource conflicts with existing state
    #[serde(rename = "RESOURCE_CONFLICT")]
    ResourceConflict,
    /// 400/422: the collaborator rejected the request content
    #[serde(rename = "REMOTE_VALIDATION")]
    RemoteValidation,
    /// Any other 4xx/5xx answer
    #[serde(rename = "REMOTE_ERROR")]
    RemoteError,

    // Local validation, raised before a request is issued
    /// A required field was empty
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    /// A value is outside its allowed set
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// An operation needs a selected account and none is selected
    #[serde(rename = "TARGET_NOT_SELECTED")]
    TargetNotSelected,

    // Internal
    /// A success response could not be decoded
    #[serde(rename = "INVALID_RESPONSE")]
    InvalidResponse,
    /// The credential store failed to load, save or clear
    #[serde(rename = "STORAGE_ERROR")]
    StorageError,
    /// Configuration is missing or malformed
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid,
}

/// Coarse classification of an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network unreachable, connection reset, timeout
    Transport,
    /// The collaborator answered with a 4xx/5xx status
    HttpStatus,
    /// Caught locally before any request was made
    Validation,
    /// Decoding, storage or configuration problems
    Internal,
}

impl ErrorCode {
    /// Map a collaborator HTTP status onto an error code
    #[must_use]
    pub const fn from_http_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::RemoteValidation,
            401 => Self::AuthInvalid,
            403 => Self::PermissionDenied,
            404 => Self::ResourceNotFound,
            409 => Self::ResourceConflict,
            _ => Self::RemoteError,
        }
    }

    /// Classify this code
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TransportFailure => ErrorKind::Transport,
            Self::AuthInvalid
            | Self::PermissionDenied
            | Self::ResourceNotFound
            | Self::ResourceConflict
            | Self::RemoteValidation
            | Self::RemoteError => ErrorKind::HttpStatus,
            Self::MissingRequiredField | Self::InvalidInput | Self::TargetNotSelected => {
                ErrorKind::Validation
            }
            Self::InvalidResponse | Self::StorageError | Self::ConfigInvalid => {
                ErrorKind::Internal
            }
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::TransportFailure => "The remote service could not be reached",
            Self::AuthInvalid => "Authentication failed",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceConflict => "The resource conflicts with existing data",
            Self::RemoteValidation => "The remote service rejected the request",
            Self::RemoteError => "The remote service returned an error",
            Self::MissingRequiredField => "A required field is missing",
            Self::InvalidInput => "The provided input is invalid",
            Self::TargetNotSelected => "No account is selected",
            Self::InvalidResponse => "The remote service returned an unexpected response",
            Self::StorageError => "Credential storage failed",
            Self::ConfigInvalid => "Configuration is invalid",
        }
    }
}

/// Unified error type for the console
#[derive(Debug, Error)]
pub struct ApiError {
    /// Error code
    pub code: ErrorCode,
    /// HTTP status returned by the collaborator, if any
    pub status_code: Option<u16>,
    /// Human-readable error message
    pub message: String,
    /// Id of the outgoing request that failed
    pub request_id: Option<String>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status_code: None,
            message: message.into(),
            request_id: None,
            source: None,
        }
    }

    /// Attach the id of the request that produced this error
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Classify this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    /// True when the collaborator rejected the credential (HTTP 401)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == Some(401)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status) => write!(
                f,
                "{} (HTTP {status}): {}",
                self.code.description(),
                self.message
            ),
            None => write!(f, "{}: {}", self.code.description(), self.message),
        }
    }
}

/// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;

/// Convenience functions for creating common errors
impl ApiError {
    /// Network-level failure before any status was received
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransportFailure, message)
    }

    /// The collaborator answered with a non-success status
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        let mut error = Self::new(ErrorCode::from_http_status(status), message);
        error.status_code = Some(status);
        error
    }

    /// A required field was empty
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{field} must not be empty"),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// The operation needs a selected account
    #[must_use]
    pub fn target_not_selected() -> Self {
        Self::new(
            ErrorCode::TargetNotSelected,
            "select an account before changing its password",
        )
    }

    /// Undecodable success response
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidResponse, message)
    }

    /// Credential store failure
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_response(format!("JSON parse error: {error}")).with_source(error)
    }
}
