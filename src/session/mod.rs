// ABOUTME: Session lifecycle: acquiring, persisting, attaching and clearing the bearer credential
// ABOUTME: The manager owns the only writer of the session slot; clients hold read handles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Manager
//!
//! One [`Session`] value exists per console. It starts [`Session::Anonymous`],
//! becomes [`Session::Authenticated`] after a successful login or restore,
//! and returns to anonymous on logout or an explicit clear.
//!
//! The slot is a `tokio::sync::watch` channel. [`SessionManager`] holds the
//! sender and is the only writer; the [`ApiClient`] it builds holds a
//! [`SessionReader`] and reads the credential at the moment each request
//! is sent. A 401 from the collaborator never changes the session by
//! itself: callers decide, optionally through
//! [`SessionManager::invalidate_if_unauthorized`].

/// Credential persistence backends
pub mod store;

use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use tokio::sync::watch;
use tracing::{instrument, warn};
use url::Url;
use zeroize::Zeroizing;

use crate::client::ApiClient;
use crate::constants::endpoints;
use crate::errors::{ApiError, ApiResult};
use crate::logging::ConsoleLogger;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest};
use crate::utils::validation::require_all;

pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};

/// Opaque bearer credential issued by the collaborator
///
/// The backing memory is wiped on drop and `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Wrap an issued bearer string
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// The raw bearer value, for building the authorization header
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Current authentication state of the console
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// No credential
    #[default]
    Anonymous,
    /// A credential is active and attached to every request
    Authenticated(Credential),
}

impl Session {
    /// Whether a credential is active
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The active credential, if any
    #[must_use]
    pub const fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(credential) => Some(credential),
        }
    }
}

/// Read-only handle on the session slot
#[derive(Debug, Clone)]
pub struct SessionReader {
    rx: watch::Receiver<Session>,
}

impl SessionReader {
    /// The credential active right now
    #[must_use]
    pub fn current_credential(&self) -> Option<Credential> {
        self.rx.borrow().credential().cloned()
    }
}

/// Owner of the session slot and the credential store
pub struct SessionManager {
    state: watch::Sender<Session>,
    store: Arc<dyn CredentialStore>,
    client: ApiClient,
}

impl SessionManager {
    /// Create an anonymous session and the client that reads it
    #[must_use]
    pub fn new(http: Client, base_url: Url, store: Arc<dyn CredentialStore>) -> Self {
        let (state, rx) = watch::channel(Session::Anonymous);
        let client = ApiClient::new(http, base_url, SessionReader { rx });
        Self {
            state,
            store,
            client,
        }
    }

    /// Client whose requests carry this session's credential
    #[must_use]
    pub fn client(&self) -> ApiClient {
        self.client.clone()
    }

    /// Exchange username and password for a credential
    ///
    /// On success the session becomes authenticated and the credential is
    /// persisted. On failure the session is left as it was.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty inputs, or the collaborator's
    /// rejection (typically `AuthInvalid`) or a transport failure
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        require_all(&[("username", username), ("password", password)])?;

        let response: LoginResponse = self
            .client
            .post(endpoints::LOGIN, &LoginRequest { username, password })
            .await?;
        if response.access_token.is_empty() {
            return Err(ApiError::invalid_response(
                "login response carried an empty access_token",
            ));
        }

        let credential = Credential::new(response.access_token);
        if let Err(e) = self.store.save(&credential).await {
            warn!(error = %e, "Credential could not be persisted; session will not survive a restart");
        }
        self.state.send_replace(Session::Authenticated(credential));
        ConsoleLogger::log_session_event("login", true);
        Ok(())
    }

    /// Create a new account through self-registration
    ///
    /// The session is not changed; the caller logs in afterwards.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty inputs or the collaborator's
    /// rejection
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: &str, password: &str) -> ApiResult<()> {
        require_all(&[("email", email), ("password", password)])?;
        self.client
            .post_unit(endpoints::REGISTER, &RegisterRequest { email, password })
            .await
    }

    /// Load a persisted credential into the session
    ///
    /// Returns whether the session is authenticated afterwards. An empty
    /// store leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read
    pub async fn restore(&self) -> ApiResult<bool> {
        if let Some(credential) = self.store.load().await? {
            self.state.send_replace(Session::Authenticated(credential));
            ConsoleLogger::log_session_event("restore", true);
        }
        Ok(self.is_authenticated())
    }

    /// Forget the credential in memory and in the store
    ///
    /// Always succeeds; calling it on an anonymous session is a no-op.
    pub async fn logout(&self) {
        self.clear("logout").await;
    }

    /// Explicitly drop the active credential
    pub async fn clear_credential(&self) {
        self.clear("clear").await;
    }

    /// Clear the session if `error` is a credential rejection (HTTP 401)
    ///
    /// Returns whether the session was cleared.
    pub async fn invalidate_if_unauthorized(&self, error: &ApiError) -> bool {
        if !error.is_unauthorized() {
            return false;
        }
        self.clear("invalidated").await;
        true
    }

    async fn clear(&self, event: &str) {
        self.state.send_replace(Session::Anonymous);
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Persisted credential could not be removed");
        }
        ConsoleLogger::log_session_event(event, false);
    }

    /// The credential attached to outgoing requests, if any
    #[must_use]
    pub fn current_credential(&self) -> Option<Credential> {
        self.state.borrow().credential().cloned()
    }

    /// Whether a credential is active
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Snapshot of the session
    #[must_use]
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
