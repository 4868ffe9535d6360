// ABOUTME: Core types and constants for the admin console client
// ABOUTME: Foundation crate with error handling, wire models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Admin Console Core
//!
//! Foundation crate providing the shared types of the admin console: the
//! models exchanged with the remote collaborator, the unified error type,
//! and the constants describing the REST contract. It has no network
//! dependencies so it compiles quickly and changes rarely.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `ApiError`, `ErrorCode` and `ErrorKind`
//! - **constants**: Endpoint paths, header names and environment variable names
//! - **models**: Accounts, roles, API tokens and request bodies

/// Unified error handling with standard error codes
pub mod errors;

/// REST contract constants and configuration keys
pub mod constants;

/// Wire models for accounts, tokens and request bodies
pub mod models;
