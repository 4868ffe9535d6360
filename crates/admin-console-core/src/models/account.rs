// ABOUTME: Account model and account role for admin-managed users
// ABOUTME: Accepts the collaborator's user_type field name alongside role
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ResourceId;
use crate::errors::ApiError;

/// Role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Regular account, may only manage its own password
    User,
    /// Administrator, may manage accounts and tokens
    Admin,
}

impl AccountRole {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl Display for AccountRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ApiError::invalid_input(format!(
                "invalid account role: {other} (expected user or admin)"
            ))),
        }
    }
}

/// Account as listed by the collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Collaborator-assigned identifier
    pub id: ResourceId,
    /// Login email
    pub email: String,
    /// Account role; required, a listing without one is rejected
    #[serde(alias = "user_type", alias = "type")]
    pub role: AccountRole,
}

impl Account {
    /// Whether this account holds the admin role
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}
