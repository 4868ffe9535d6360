// ABOUTME: API token models: listed tokens and the one-time issued secret
// ABOUTME: Secrets are redacted from Debug output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::ResourceId;

const REDACTED: &str = "<redacted>";

/// API token as listed by the collaborator
///
/// The list endpoint is not required to re-expose the secret, so `secret`
/// is optional here. The secret of a freshly created token is delivered
/// through [`IssuedToken`] instead.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiToken {
    /// Collaborator-assigned identifier
    pub id: ResourceId,
    /// Display name given at creation
    #[serde(alias = "token_name")]
    pub name: String,
    /// Token secret, when the collaborator chooses to list it
    #[serde(default, alias = "token", skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Expiry reported by the collaborator
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &self.secret.as_ref().map(|_| REDACTED))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Secret returned by the token creation call
///
/// This is the only moment the secret is guaranteed to be visible; it is
/// held in the admin controller's transient slot and never cached.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct IssuedToken {
    /// The one-time secret
    #[serde(rename = "access_token", alias = "token")]
    pub secret: String,
    /// Identifier, when the collaborator returns the created record
    #[serde(default)]
    pub id: Option<ResourceId>,
    /// Display name, when the collaborator returns the created record
    #[serde(default, alias = "token_name")]
    pub name: Option<String>,
    /// Expiry, when reported
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("secret", &REDACTED)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Accept RFC 3339 timestamps and naive ISO 8601 timestamps (read as UTC)
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}
