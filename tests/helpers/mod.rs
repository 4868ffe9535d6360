// ABOUTME: Shared test helpers for integration tests
// ABOUTME: Mock collaborator plus console construction shortcuts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod mock_collaborator;

use std::sync::Arc;

use admin_console::config::environment::ConsoleConfig;
use admin_console::console::AdminConsole;
use admin_console::session::store::{CredentialStore, MemoryCredentialStore};

use mock_collaborator::{MockCollaborator, ADMIN_EMAIL, ADMIN_PASSWORD, USER_EMAIL, USER_PASSWORD};

/// Console talking to `mock` with an in-memory credential store
pub fn console_for(mock: &MockCollaborator) -> AdminConsole {
    let config = ConsoleConfig::new(&mock.base_url).unwrap();
    AdminConsole::new(&config).unwrap()
}

/// Console talking to `mock`, persisting into `store`
pub fn console_with_store(
    mock: &MockCollaborator,
    store: Arc<dyn CredentialStore>,
) -> AdminConsole {
    let config = ConsoleConfig::new(&mock.base_url).unwrap();
    AdminConsole::with_store(&config, store).unwrap()
}

/// Mock collaborator plus a console logged in as the seeded admin
pub async fn logged_in_admin() -> (MockCollaborator, AdminConsole) {
    let mock = MockCollaborator::start().await;
    let console = console_for(&mock);
    console
        .session()
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    (mock, console)
}

/// Mock collaborator plus a console logged in as the seeded non-admin user
pub async fn logged_in_user() -> (MockCollaborator, AdminConsole) {
    let mock = MockCollaborator::start().await;
    let console = console_for(&mock);
    console
        .session()
        .login(USER_EMAIL, USER_PASSWORD)
        .await
        .unwrap();
    (mock, console)
}

/// Fresh in-memory store
pub fn memory_store() -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::new())
}
