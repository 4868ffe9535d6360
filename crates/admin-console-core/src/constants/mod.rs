// ABOUTME: Constants describing the collaborator REST contract and console configuration keys
// ABOUTME: Endpoint paths, header names, environment variable names and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain. Endpoint paths are relative (no leading
//! slash) so they join beneath a base URL that carries a path prefix.

/// Collaborator endpoint paths
pub mod endpoints {
    /// Login: exchanges username/password for a bearer credential
    pub const LOGIN: &str = "token";
    /// Self-registration
    pub const REGISTER: &str = "register/";
    /// Account collection
    pub const USERS: &str = "users/";
    /// Password of the authenticated user
    pub const OWN_PASSWORD: &str = "users/me/password";
    /// API token collection
    pub const TOKENS: &str = "tokens/";

    /// Path of a single account
    #[must_use]
    pub fn user(id: &str) -> String {
        format!("users/{id}")
    }

    /// Role of a single account
    #[must_use]
    pub fn user_role(id: &str) -> String {
        format!("users/{id}/type")
    }

    /// Password of a single account
    #[must_use]
    pub fn user_password(id: &str) -> String {
        format!("users/{id}/password")
    }

    /// Path of a single API token
    #[must_use]
    pub fn token(id: &str) -> String {
        format!("tokens/{id}")
    }
}

/// HTTP header names
pub mod headers {
    /// Correlation id attached to every outgoing request
    pub const REQUEST_ID: &str = "x-request-id";
    /// Authorization scheme prefix
    pub const BEARER_PREFIX: &str = "Bearer ";
}

/// Environment variable names read by the console configuration
pub mod env_config {
    /// Collaborator base URL
    pub const API_URL: &str = "ADMIN_CONSOLE_API_URL";
    /// Credential store kind (`memory` or `file`)
    pub const CREDENTIAL_STORE: &str = "ADMIN_CONSOLE_CREDENTIAL_STORE";
    /// Directory of the file credential store
    pub const CREDENTIAL_DIR: &str = "ADMIN_CONSOLE_CREDENTIAL_DIR";
    /// Key (file name) of the stored credential
    pub const CREDENTIAL_KEY: &str = "ADMIN_CONSOLE_CREDENTIAL_KEY";
    /// Optional whole-request timeout
    pub const REQUEST_TIMEOUT_SECS: &str = "ADMIN_CONSOLE_REQUEST_TIMEOUT_SECS";
    /// Optional connect timeout
    pub const CONNECT_TIMEOUT_SECS: &str = "ADMIN_CONSOLE_CONNECT_TIMEOUT_SECS";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Default values
pub mod defaults {
    /// Application directory name under the platform config dir
    pub const APP_DIR: &str = "admin-console";
    /// Key under which the session credential is persisted
    pub const CREDENTIAL_KEY: &str = "token";
    /// Longest collaborator error body kept in an error message
    pub const MAX_ERROR_BODY_CHARS: usize = 512;
}

/// Service identity used in logs
pub mod service_names {
    /// Name reported by the logging setup
    pub const ADMIN_CONSOLE: &str = "admin-console";
}
