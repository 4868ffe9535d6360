// ABOUTME: Persistence for the session credential so a session survives a restart
// ABOUTME: In-memory and file-backed single-slot stores behind one async trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Credential stores
//!
//! A store is a single overwritable slot. `save` replaces whatever was
//! there, `clear` is safe on an empty slot, and `load` on an empty slot
//! yields `None`.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use super::Credential;
use crate::constants::defaults;
use crate::errors::{ApiError, ApiResult};

/// Persistence backend for the session credential
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the persisted credential, if any
    async fn load(&self) -> ApiResult<Option<Credential>>;

    /// Replace the persisted credential
    async fn save(&self, credential: &Credential) -> ApiResult<()>;

    /// Remove the persisted credential; succeeds when already empty
    async fn clear(&self) -> ApiResult<()>;
}

/// Process-local credential slot
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `credential`
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> ApiResult<Option<Credential>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, credential: &Credential) -> ApiResult<()> {
        *self.slot.lock().await = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> ApiResult<()> {
        self.slot.lock().await.take();
        Ok(())
    }
}

/// Credential persisted as one file named after the store key
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
    key: String,
}

impl FileCredentialStore {
    /// Create a store for `key` under `dir`
    ///
    /// The directory is created on first save.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `key` is empty or is not a plain file name
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> ApiResult<Self> {
        let key = key.into();
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(ApiError::invalid_input(format!(
                "credential key {key:?} must be a plain file name"
            )));
        }
        Ok(Self {
            dir: dir.into(),
            key,
        })
    }

    /// Default store location
    ///
    /// - macOS: `~/Library/Application Support/admin-console/`
    /// - Linux: `~/.config/admin-console/`
    #[must_use]
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(defaults::APP_DIR)
    }

    /// Path of the credential file
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.key)
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!(".{}.tmp", self.key))
    }

    async fn write_restricted(path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(path).await?;
        file.write_all(contents).await?;
        file.sync_all().await
    }
}

fn storage_error(action: &str, path: &Path, error: io::Error) -> ApiError {
    ApiError::storage(format!(
        "failed to {action} credential at {}: {error}",
        path.display()
    ))
    .with_source(error)
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> ApiResult<Option<Credential>> {
        let path = self.path();
        match fs::read_to_string(&path).await {
            // Stored verbatim; only an empty file means no credential
            Ok(contents) if contents.is_empty() => Ok(None),
            Ok(contents) => {
                debug!("Loaded persisted credential from {:?}", path);
                Ok(Some(Credential::new(contents)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error("read", &path, e)),
        }
    }

    async fn save(&self, credential: &Credential) -> ApiResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error("create directory for", &self.dir, e))?;

        // Write beside the target and rename so a crash never leaves a torn file
        let temp = self.temp_path();
        Self::write_restricted(&temp, credential.as_str().as_bytes())
            .await
            .map_err(|e| storage_error("write", &temp, e))?;

        let path = self.path();
        fs::rename(&temp, &path)
            .await
            .map_err(|e| storage_error("replace", &path, e))?;
        debug!("Persisted credential to {:?}", path);
        Ok(())
    }

    async fn clear(&self) -> ApiResult<()> {
        let path = self.path();
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", &path, e)),
        }
    }
}
