// ABOUTME: Wire models re-exported from admin-console-core
// ABOUTME: Accounts, roles, API tokens, issued secrets and request bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use admin_console_core::models::*;
