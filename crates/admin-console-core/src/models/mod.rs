// ABOUTME: Wire models exchanged with the collaborator
// ABOUTME: Accounts, roles, API tokens, issued secrets and request bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};

/// Admin-managed accounts and their roles
pub mod account;
/// Request and response bodies of the REST contract
pub mod requests;
/// API tokens and one-time issued secrets
pub mod token;

pub use account::{Account, AccountRole};
pub use requests::{
    ChangeRoleRequest, CreateAccountRequest, CreateTokenRequest, LoginRequest, LoginResponse,
    PasswordChangeRequest, RegisterRequest,
};
pub use token::{ApiToken, IssuedToken};

/// Opaque identifier assigned by the collaborator
///
/// The collaborator may send ids as JSON numbers or strings; both are kept
/// as their string form and only ever echoed back in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Wrap an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Signed(i64),
            Unsigned(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Signed(id) => Self(id.to_string()),
            RawId::Unsigned(id) => Self(id.to_string()),
            RawId::Text(id) => Self(id),
        })
    }
}
