// ABOUTME: Unified error handling re-exported from admin-console-core
// ABOUTME: Provides ApiError, ErrorCode, ErrorKind and the ApiResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use admin_console_core::errors::*;
