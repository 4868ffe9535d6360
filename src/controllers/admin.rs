// ABOUTME: Admin resource controller: accounts and API tokens with fetch-after-mutate caches
// ABOUTME: Sequences refreshes so a stale listing never overwrites a newer one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Admin Resource Controller
//!
//! Holds client-side mirrors of the account and token collections. The
//! mirrors are never patched locally: every successful mutation re-fetches
//! the affected collection wholesale, and a failed mutation leaves it alone.
//!
//! No role check happens here. A credential without admin rights makes every
//! call fail with `PermissionDenied`, which is returned and surfaced.
//!
//! ## Refresh sequencing
//!
//! Each listing takes a ticket from a per-collection counter when it is
//! issued. A result is applied only if its ticket is newer than the ticket
//! of the listing already applied, so a slow early listing cannot overwrite
//! a faster later one. Since a mutation's refresh is issued after the
//! mutation resolves, concurrent mutations settle to the collaborator's
//! actual collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use super::{report, Notice, Operation, Reporting};
use crate::client::{path_segment, ApiClient};
use crate::constants::endpoints;
use crate::errors::{ApiError, ApiResult};
use crate::logging::ConsoleLogger;
use crate::models::{
    Account, AccountRole, ApiToken, ChangeRoleRequest, CreateAccountRequest, CreateTokenRequest,
    IssuedToken, PasswordChangeRequest, ResourceId,
};
use crate::utils::validation::{require_all, require_non_empty};

/// Observable state of the admin view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminState {
    /// Mirror of the account collection
    pub accounts: Vec<Account>,
    /// Mirror of the token collection
    pub tokens: Vec<ApiToken>,
    /// Target of the admin password-change flow
    pub selected_account: Option<ResourceId>,
    /// Most recently issued token, until its secret is taken
    pub issued_token: Option<IssuedTokenReceipt>,
    /// Outcome of the last surfaced operation
    pub last_notice: Option<Notice>,
    /// Ticket of the account listing currently applied
    pub accounts_revision: u64,
    /// Ticket of the token listing currently applied
    pub tokens_revision: u64,
}

/// Public part of an issued token
///
/// The secret never enters [`AdminState`]; it only leaves the controller
/// through [`AdminController::take_issued_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTokenReceipt {
    /// Identifier, when the collaborator returned one
    pub id: Option<ResourceId>,
    /// Display name, when the collaborator returned one
    pub name: Option<String>,
}

impl From<&IssuedToken> for IssuedTokenReceipt {
    fn from(issued: &IssuedToken) -> Self {
        Self {
            id: issued.id.clone(),
            name: issued.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Collection {
    Accounts,
    Tokens,
}

impl Collection {
    const fn list_operation(self) -> Operation {
        match self {
            Self::Accounts => Operation::ListAccounts,
            Self::Tokens => Operation::ListTokens,
        }
    }
}

/// Controller for account and API token management
#[derive(Debug)]
pub struct AdminController {
    client: ApiClient,
    state: watch::Sender<AdminState>,
    issued: Mutex<Option<IssuedToken>>,
    account_tickets: AtomicU64,
    token_tickets: AtomicU64,
}

impl AdminController {
    /// Create a controller issuing requests through `client`
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(AdminState::default());
        Self {
            client,
            state,
            issued: Mutex::new(None),
            account_tickets: AtomicU64::new(0),
            token_tickets: AtomicU64::new(0),
        }
    }

    // ================================================================================================
    // Collections
    // ================================================================================================

    /// Fetch all accounts and replace the mirror
    ///
    /// # Errors
    ///
    /// Returns the collaborator's rejection or a transport failure; the
    /// failure is logged only
    pub async fn list_accounts(&self) -> ApiResult<Vec<Account>> {
        let result = self.fetch_accounts().await;
        if let Err(e) = &result {
            log_listing_failure(Operation::ListAccounts, e);
        }
        result
    }

    /// Fetch all tokens and replace the mirror
    ///
    /// # Errors
    ///
    /// Returns the collaborator's rejection or a transport failure; the
    /// failure is logged only
    pub async fn list_tokens(&self) -> ApiResult<Vec<ApiToken>> {
        let result = self.fetch_tokens().await;
        if let Err(e) = &result {
            log_listing_failure(Operation::ListTokens, e);
        }
        result
    }

    /// Fetch both collections concurrently, as on first display
    ///
    /// # Errors
    ///
    /// Returns the first failure; the other collection is still applied if
    /// its listing succeeded
    pub async fn refresh_all(&self) -> ApiResult<()> {
        let (accounts, tokens) = tokio::join!(self.list_accounts(), self.list_tokens());
        accounts?;
        tokens?;
        Ok(())
    }

    #[instrument(skip(self), fields(ticket = tracing::field::Empty))]
    async fn fetch_accounts(&self) -> ApiResult<Vec<Account>> {
        let ticket = self.account_tickets.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("ticket", ticket);

        let accounts: Vec<Account> = self.client.get(endpoints::USERS).await?;
        self.state.send_if_modified(|state| {
            if ticket <= state.accounts_revision {
                debug!(applied = state.accounts_revision, "Discarding stale account listing");
                return false;
            }
            state.accounts.clone_from(&accounts);
            state.accounts_revision = ticket;
            true
        });
        Ok(accounts)
    }

    #[instrument(skip(self), fields(ticket = tracing::field::Empty))]
    async fn fetch_tokens(&self) -> ApiResult<Vec<ApiToken>> {
        let ticket = self.token_tickets.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("ticket", ticket);

        let tokens: Vec<ApiToken> = self.client.get(endpoints::TOKENS).await?;
        self.state.send_if_modified(|state| {
            if ticket <= state.tokens_revision {
                debug!(applied = state.tokens_revision, "Discarding stale token listing");
                return false;
            }
            state.tokens.clone_from(&tokens);
            state.tokens_revision = ticket;
            true
        });
        Ok(tokens)
    }

    // ================================================================================================
    // Accounts
    // ================================================================================================

    /// Create an account, then refresh the account mirror
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty email or password (no
    /// request is made), otherwise the collaborator's rejection
    #[instrument(skip(self, password), fields(email = %email, role = %role))]
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        role: AccountRole,
    ) -> ApiResult<()> {
        let result = self.send_create_account(email, password, role).await;
        self.complete(Operation::CreateAccount, result, Some(Collection::Accounts))
            .await
    }

    /// Delete an account by id, then refresh the account mirror
    ///
    /// # Errors
    ///
    /// Returns the collaborator's rejection; an unknown id is
    /// `ResourceNotFound`
    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn delete_account(&self, id: &ResourceId) -> ApiResult<()> {
        let result = self.send_delete(id, endpoints::user).await;
        self.complete(Operation::DeleteAccount, result, Some(Collection::Accounts))
            .await
    }

    /// Set an account's role, then refresh the account mirror
    ///
    /// Setting the role an account already has is accepted and leaves the
    /// same final state.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's rejection or a transport failure
    #[instrument(skip(self), fields(account_id = %id, new_role = %new_role))]
    pub async fn change_account_role(&self, id: &ResourceId, new_role: AccountRole) -> ApiResult<()> {
        let result = self.send_role_change(id, new_role).await;
        self.complete(
            Operation::ChangeAccountRole,
            result,
            Some(Collection::Accounts),
        )
        .await
    }

    /// Select the target of [`Self::change_account_password`]
    ///
    /// Replaces any previous selection.
    pub fn select_account(&self, id: ResourceId) {
        self.state.send_if_modified(|state| {
            if state.selected_account.as_ref() == Some(&id) {
                return false;
            }
            state.selected_account = Some(id);
            true
        });
    }

    /// Forget the selected account
    pub fn clear_selection(&self) {
        self.state
            .send_if_modified(|state| state.selected_account.take().is_some());
    }

    /// Currently selected account
    #[must_use]
    pub fn selected_account(&self) -> Option<ResourceId> {
        self.state.borrow().selected_account.clone()
    }

    /// Change the selected account's password
    ///
    /// The selection is kept after success.
    ///
    /// # Errors
    ///
    /// Returns `TargetNotSelected` without issuing a request when no account
    /// is selected, otherwise the collaborator's rejection
    #[instrument(skip_all)]
    pub async fn change_account_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> ApiResult<()> {
        let result = self
            .send_account_password_change(old_password, new_password)
            .await;
        self.complete(Operation::ChangeAccountPassword, result, None)
            .await
    }

    // ================================================================================================
    // Tokens
    // ================================================================================================

    /// Issue a token, keep its secret in the transient slot, then refresh
    /// the token mirror
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty name (no request is
    /// made), otherwise the collaborator's rejection or an undecodable
    /// response
    #[instrument(skip(self), fields(token_name = %name))]
    pub async fn create_token(&self, name: &str) -> ApiResult<()> {
        let result = self.send_create_token(name).await;
        self.complete(Operation::CreateToken, result, Some(Collection::Tokens))
            .await
    }

    /// Remove and return the secret of the last issued token
    ///
    /// A given secret is handed out at most once; snapshots and subscribers
    /// only ever see its [`IssuedTokenReceipt`].
    pub fn take_issued_token(&self) -> Option<IssuedToken> {
        let mut issued = None;
        self.state.send_if_modified(|state| {
            issued = self.issued_slot().take();
            state.issued_token = None;
            issued.is_some()
        });
        issued
    }

    /// Revoke a token by id, then refresh the token mirror
    ///
    /// # Errors
    ///
    /// Returns the collaborator's rejection; an unknown id is
    /// `ResourceNotFound`
    #[instrument(skip(self), fields(token_id = %id))]
    pub async fn delete_token(&self, id: &ResourceId) -> ApiResult<()> {
        let result = self.send_delete(id, endpoints::token).await;
        self.complete(Operation::DeleteToken, result, Some(Collection::Tokens))
            .await
    }

    // ================================================================================================
    // State
    // ================================================================================================

    /// Drop the last notice once the view has shown it
    pub fn dismiss_notice(&self) {
        self.state
            .send_if_modified(|state| state.last_notice.take().is_some());
    }

    /// Current state
    #[must_use]
    pub fn snapshot(&self) -> AdminState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AdminState> {
        self.state.subscribe()
    }

    /// Refresh after success, publish the notice, hand the result back
    async fn complete(
        &self,
        operation: Operation,
        result: ApiResult<()>,
        refresh: Option<Collection>,
    ) -> ApiResult<()> {
        if result.is_ok() {
            if let Some(collection) = refresh {
                self.refresh_after_mutation(collection).await;
            }
        }

        let notice = report(operation, result.as_ref().err());
        if operation.reporting() == Reporting::Surface {
            // Repeated identical failures are published again
            self.state.send_if_modified(|state| {
                let changed = state.last_notice.is_some() || notice.is_some();
                state.last_notice = notice;
                changed
            });
        }
        result
    }

    // ================================================================================================
    // Requests
    // ================================================================================================

    async fn send_create_account(
        &self,
        email: &str,
        password: &str,
        role: AccountRole,
    ) -> ApiResult<()> {
        require_all(&[("email", email), ("password", password)])?;
        self.client
            .post_unit(
                endpoints::USERS,
                &CreateAccountRequest {
                    email,
                    password,
                    role,
                },
            )
            .await
    }

    async fn send_delete(&self, id: &ResourceId, path: fn(&str) -> String) -> ApiResult<()> {
        let segment = path_segment(id.as_str())?;
        self.client.delete_unit(&path(&segment)).await
    }

    async fn send_role_change(&self, id: &ResourceId, new_role: AccountRole) -> ApiResult<()> {
        let segment = path_segment(id.as_str())?;
        // The collaborator reads `new_type` from the query; the body carries it too
        self.client
            .put_unit_with_query(
                &endpoints::user_role(&segment),
                &[("new_type", new_role.as_str())],
                &ChangeRoleRequest { new_type: new_role },
            )
            .await
    }

    async fn send_account_password_change(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> ApiResult<()> {
        let id = self
            .selected_account()
            .ok_or_else(ApiError::target_not_selected)?;
        let segment = path_segment(id.as_str())?;
        self.client
            .put_unit(
                &endpoints::user_password(&segment),
                &PasswordChangeRequest {
                    old_password,
                    new_password,
                },
            )
            .await
    }

    async fn send_create_token(&self, name: &str) -> ApiResult<()> {
        require_non_empty("token_name", name)?;
        let issued: IssuedToken = self
            .client
            .post(endpoints::TOKENS, &CreateTokenRequest { token_name: name })
            .await?;

        let receipt = IssuedTokenReceipt::from(&issued);
        self.state.send_modify(|state| {
            *self.issued_slot() = Some(issued);
            state.issued_token = Some(receipt);
        });
        Ok(())
    }

    fn issued_slot(&self) -> MutexGuard<'_, Option<IssuedToken>> {
        self.issued.lock().unwrap_or_else(|poisoned| {
            warn!("Issued token slot lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// A failed refresh is logged; the mutation it follows already happened
    async fn refresh_after_mutation(&self, collection: Collection) {
        let outcome = match collection {
            Collection::Accounts => self.fetch_accounts().await.map(|_| ()),
            Collection::Tokens => self.fetch_tokens().await.map(|_| ()),
        };
        if let Err(e) = outcome {
            log_listing_failure(collection.list_operation(), &e);
        }
    }
}

fn log_listing_failure(operation: Operation, error: &ApiError) {
    ConsoleLogger::log_operation_failure(operation.label(), error, false);
}
