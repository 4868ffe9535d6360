// ABOUTME: Console facade wiring configuration, session manager and controllers together
// ABOUTME: The single value a view layer holds to drive the admin console
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::info;

use crate::config::environment::{ConsoleConfig, CredentialStoreConfig};
use crate::controllers::{AdminController, ProfileController};
use crate::errors::{ApiError, ApiResult};
use crate::session::store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use crate::session::SessionManager;
use crate::utils::http_client::build_client;

/// Session manager plus both controllers sharing one HTTP client
#[derive(Debug)]
pub struct AdminConsole {
    session: SessionManager,
    profile: ProfileController,
    admin: AdminController,
}

impl AdminConsole {
    /// Build a console from configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the HTTP client cannot be built, or
    /// `InvalidInput` for an unusable credential key
    pub fn new(config: &ConsoleConfig) -> ApiResult<Self> {
        let store: Arc<dyn CredentialStore> = match &config.credential_store {
            CredentialStoreConfig::Memory => Arc::new(MemoryCredentialStore::new()),
            CredentialStoreConfig::File { dir, key } => {
                Arc::new(FileCredentialStore::new(dir.clone(), key.clone())?)
            }
        };
        Self::with_store(config, store)
    }

    /// Build a console persisting its credential in `store`
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the HTTP client cannot be built
    pub fn with_store(config: &ConsoleConfig, store: Arc<dyn CredentialStore>) -> ApiResult<Self> {
        let http = build_client(&config.http)?;
        let session = SessionManager::new(http, config.api_url.clone(), store);
        let profile = ProfileController::new(session.client());
        let admin = AdminController::new(session.client());

        info!(api_url = %config.api_url, "Admin console ready");
        Ok(Self {
            session,
            profile,
            admin,
        })
    }

    /// Build a console from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for missing or malformed configuration
    pub fn from_env() -> ApiResult<Self> {
        let config = ConsoleConfig::from_env().map_err(|e| ApiError::config(format!("{e:#}")))?;
        Self::new(&config)
    }

    /// Restore a persisted session and, if that yields one, load both collections
    ///
    /// Returns whether the console is authenticated. A failed initial
    /// listing is logged and does not fail startup.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the credential store cannot be read
    pub async fn start(&self) -> ApiResult<bool> {
        let authenticated = self.session.restore().await?;
        if authenticated {
            // Non-admin sessions get PermissionDenied here; already logged by the controller
            if self.admin.refresh_all().await.is_err() {
                info!("Initial admin listing unavailable for this session");
            }
        }
        Ok(authenticated)
    }

    /// Session manager
    #[must_use]
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Self-service profile controller
    #[must_use]
    pub const fn profile(&self) -> &ProfileController {
        &self.profile
    }

    /// Admin resource controller
    #[must_use]
    pub const fn admin(&self) -> &AdminController {
        &self.admin
    }
}
