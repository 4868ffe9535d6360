// ABOUTME: Request and response bodies of the collaborator REST contract
// ABOUTME: Password-bearing bodies borrow their fields and do not implement Debug
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::AccountRole;

/// `POST /token`
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    /// Login name (the account email)
    pub username: &'a str,
    /// Password
    pub password: &'a str,
}

/// Response of `POST /token`
#[derive(Deserialize)]
pub struct LoginResponse {
    /// Bearer credential
    pub access_token: String,
    /// Token type, `bearer` when present
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `POST /register/`
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    /// Account email
    pub email: &'a str,
    /// Initial password
    pub password: &'a str,
}

/// `POST /users/`
#[derive(Serialize)]
pub struct CreateAccountRequest<'a> {
    /// Account email
    pub email: &'a str,
    /// Initial password
    pub password: &'a str,
    /// Role of the new account
    #[serde(rename = "type")]
    pub role: AccountRole,
}

/// `PUT /users/{id}/type`
#[derive(Debug, Serialize)]
pub struct ChangeRoleRequest {
    /// Target role
    pub new_type: AccountRole,
}

/// `PUT /users/me/password` and `PUT /users/{id}/password`
#[derive(Serialize)]
pub struct PasswordChangeRequest<'a> {
    /// Current password
    pub old_password: &'a str,
    /// Replacement password
    pub new_password: &'a str,
}

/// `POST /tokens/`
#[derive(Debug, Serialize)]
pub struct CreateTokenRequest<'a> {
    /// Display name of the token
    pub token_name: &'a str,
}
