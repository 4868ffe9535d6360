// ABOUTME: Main library entry point for the admin console core
// ABOUTME: Session lifecycle, REST client and admin/profile controllers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Admin Console
//!
//! Client-side core of an administration console backed by a remote REST
//! collaborator. The collaborator owns authentication, password hashing and
//! persistence; this crate owns everything between a view layer and the
//! wire:
//!
//! - **Session**: acquires, persists, attaches and clears the bearer credential
//! - **Client**: one place where requests get their credential and where
//!   transport and status failures become [`errors::ApiError`]
//! - **Profile controller**: the authenticated user rotates their own password
//! - **Admin controller**: accounts and API tokens, re-fetched after every mutation
//!
//! Controllers publish their state through `tokio::sync::watch` channels so
//! a view can render snapshots and subscribe to changes.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use admin_console::console::AdminConsole;
//! use admin_console::config::environment::ConsoleConfig;
//! use admin_console::models::AccountRole;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsoleConfig::new("https://collaborator.example/api")?;
//! let console = AdminConsole::new(&config)?;
//!
//! console.session().login("admin@example.com", "secret").await?;
//! console
//!     .admin()
//!     .create_account("ops@example.com", "initial-pw", AccountRole::User)
//!     .await?;
//!
//! for account in console.admin().snapshot().accounts {
//!     println!("{} ({})", account.email, account.role);
//! }
//! # Ok(())
//! # }
//! ```

/// HTTP client for the collaborator REST contract
pub mod client;

/// Environment-based configuration
pub mod config;

/// REST contract constants and configuration keys
pub mod constants;

/// Facade wiring the session and controllers together
pub mod console;

/// Profile and admin controllers with observable state
pub mod controllers;

/// Unified error handling re-exported from the core crate
pub mod errors;

/// Logging configuration and subscriber setup
pub mod logging;

/// Wire models re-exported from the core crate
pub mod models;

/// Session state, credential lifecycle and credential stores
pub mod session;

/// Shared helpers (HTTP client construction, input validation)
pub mod utils;
