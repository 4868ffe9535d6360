// ABOUTME: REST contract constants re-exported from admin-console-core
// ABOUTME: Endpoint paths, header names, environment variable names and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use admin_console_core::constants::*;
