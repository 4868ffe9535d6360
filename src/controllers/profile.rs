// ABOUTME: Self-service profile controller: the authenticated user rotates their own password
// ABOUTME: Publishes a pending flag and success/failure notices through a watch channel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::instrument;

use super::{report, Notice, Operation};
use crate::client::ApiClient;
use crate::constants::endpoints;
use crate::errors::ApiResult;
use crate::models::PasswordChangeRequest;

/// Observable state of the profile view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    /// At least one password change is in flight
    pub pending: bool,
    /// Outcome of the last password change
    pub last_notice: Option<Notice>,
}

/// Controller for the authenticated user's own account
#[derive(Debug)]
pub struct ProfileController {
    client: ApiClient,
    state: watch::Sender<ProfileState>,
    in_flight: AtomicUsize,
}

impl ProfileController {
    /// Create a controller issuing requests through `client`
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(ProfileState::default());
        Self {
            client,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Change the authenticated user's password
    ///
    /// Inputs are passed through as given; the form layer is expected to
    /// have rejected empty fields and the collaborator enforces strength
    /// rules.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's rejection or a transport failure
    #[instrument(skip_all)]
    pub async fn change_own_password(&self, old_password: &str, new_password: &str) -> ApiResult<()> {
        // Counter and flag change together under the channel's write lock
        self.state.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.pending = true;
        });

        let result = self
            .client
            .put_unit(
                endpoints::OWN_PASSWORD,
                &PasswordChangeRequest {
                    old_password,
                    new_password,
                },
            )
            .await;

        let notice = report(Operation::ChangeOwnPassword, result.as_ref().err());
        self.state.send_modify(|state| {
            state.pending = self.in_flight.fetch_sub(1, Ordering::SeqCst) > 1;
            state.last_notice = notice;
        });
        result
    }

    /// Drop the last notice once the view has shown it
    pub fn dismiss_notice(&self) {
        self.state.send_if_modified(|state| state.last_notice.take().is_some());
    }

    /// Current state
    #[must_use]
    pub fn snapshot(&self) -> ProfileState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }
}
