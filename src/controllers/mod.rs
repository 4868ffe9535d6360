// ABOUTME: Controllers driven by a view layer: admin resources and self-service profile
// ABOUTME: Shared operation labels, reporting policy and user-facing notices
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Controllers and their reporting policy
//!
//! Every failure is returned to the caller and logged. Failures of
//! [`Reporting::Surface`] operations are also published as a [`Notice`] in
//! controller state so a view can show them; list and refresh failures are
//! [`Reporting::LogOnly`].

/// Account and API token management
pub mod admin;
/// Self-service password rotation
pub mod profile;

pub use admin::{AdminController, AdminState, IssuedTokenReceipt};
pub use profile::{ProfileController, ProfileState};

use crate::errors::ApiError;
use crate::logging::ConsoleLogger;

/// How a failure reaches the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporting {
    /// Published as a notice and logged
    Surface,
    /// Logged at `warn` only
    LogOnly,
}

/// Controller operations, used to label notices and log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Fetch the account collection
    ListAccounts,
    /// Fetch the token collection
    ListTokens,
    /// Create an account
    CreateAccount,
    /// Delete an account
    DeleteAccount,
    /// Change an account's role
    ChangeAccountRole,
    /// Change the selected account's password
    ChangeAccountPassword,
    /// Issue an API token
    CreateToken,
    /// Revoke an API token
    DeleteToken,
    /// Change the authenticated user's own password
    ChangeOwnPassword,
}

impl Operation {
    /// Stable name for logs and notices
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ListAccounts => "list_accounts",
            Self::ListTokens => "list_tokens",
            Self::CreateAccount => "create_account",
            Self::DeleteAccount => "delete_account",
            Self::ChangeAccountRole => "change_account_role",
            Self::ChangeAccountPassword => "change_account_password",
            Self::CreateToken => "create_token",
            Self::DeleteToken => "delete_token",
            Self::ChangeOwnPassword => "change_own_password",
        }
    }

    /// Where failures of this operation are reported
    #[must_use]
    pub const fn reporting(&self) -> Reporting {
        match self {
            Self::ListAccounts | Self::ListTokens => Reporting::LogOnly,
            _ => Reporting::Surface,
        }
    }

    /// Password changes confirm success to the user as well
    #[must_use]
    pub const fn notifies_success(&self) -> bool {
        matches!(
            self,
            Self::ChangeAccountPassword | Self::ChangeOwnPassword
        )
    }
}

/// Result of an operation as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation completed
    Succeeded,
    /// The operation failed; the message is safe to display
    Failed(String),
}

/// User-facing report published into controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Operation the notice is about
    pub operation: Operation,
    /// What happened
    pub outcome: Outcome,
}

impl Notice {
    /// Whether this notice reports a failure
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }
}

/// Apply the reporting policy to a finished operation
///
/// Logs failures and returns the notice to publish. `None` means the
/// previous notice should be cleared for surfaced operations and left alone
/// for log-only ones; callers check [`Operation::reporting`].
pub(crate) fn report(operation: Operation, error: Option<&ApiError>) -> Option<Notice> {
    let surfaced = operation.reporting() == Reporting::Surface;
    match error {
        Some(error) => {
            ConsoleLogger::log_operation_failure(operation.label(), error, surfaced);
            surfaced.then(|| Notice {
                operation,
                outcome: Outcome::Failed(error.to_string()),
            })
        }
        None => operation.notifies_success().then_some(Notice {
            operation,
            outcome: Outcome::Succeeded,
        }),
    }
}
