// ABOUTME: Utility modules for common functionality across the console
// ABOUTME: Contains shared helpers for HTTP client construction and input validation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// HTTP client configuration and helpers
pub mod http_client;
/// Required-field checks run before a request is issued
pub mod validation;
