// ABOUTME: Input checks performed locally before any collaborator call
// ABOUTME: Rejects empty required fields with a validation error
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::errors::{ApiError, ApiResult};

/// Fail with `MissingRequiredField` when `value` is empty
///
/// Whitespace is significant: passwords may legitimately contain it, so
/// only the empty string is rejected.
///
/// # Errors
/// Returns a validation error naming `field`
pub fn require_non_empty(field: &str, value: &str) -> ApiResult<()> {
    if value.is_empty() {
        return Err(ApiError::missing_field(field));
    }
    Ok(())
}

/// Check several `(field, value)` pairs, reporting the first empty one
///
/// # Errors
/// Returns a validation error naming the first empty field
pub fn require_all(fields: &[(&str, &str)]) -> ApiResult<()> {
    fields
        .iter()
        .try_for_each(|(field, value)| require_non_empty(field, value))
}
