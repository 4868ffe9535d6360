// ABOUTME: Configuration module for the admin console
// ABOUTME: Environment-driven settings for the collaborator URL, HTTP client and credential store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Console configuration from environment variables
pub mod environment;

pub use environment::{ConsoleConfig, CredentialStoreConfig, Environment, HttpClientConfig};
