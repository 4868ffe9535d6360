// ABOUTME: HTTP client construction for collaborator calls with optional timeouts
// ABOUTME: Builds one pooled reqwest client per console from HttpClientConfig
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use reqwest::{Client, ClientBuilder};

use crate::config::environment::HttpClientConfig;
use crate::errors::{ApiError, ApiResult};

/// Create the HTTP client used for every collaborator call
///
/// The client pools connections, so one instance is built per console and
/// cloned into each handle. Timeouts are applied only when configured.
///
/// # Errors
/// Returns `ConfigInvalid` if the TLS backend cannot be initialized
pub fn build_client(config: &HttpClientConfig) -> ApiResult<Client> {
    create_custom_client(|builder| {
        let builder = match config.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        match config.connect_timeout {
            Some(timeout) => builder.connect_timeout(timeout),
            None => builder,
        }
    })
}

/// Create a new HTTP client with custom configuration
///
/// # Errors
/// Returns `ConfigInvalid` if the builder rejects the configuration
pub fn create_custom_client<F>(config_fn: F) -> ApiResult<Client>
where
    F: FnOnce(ClientBuilder) -> ClientBuilder,
{
    let builder = ClientBuilder::new().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    config_fn(builder)
        .build()
        .map_err(|e| ApiError::config(format!("failed to build HTTP client: {e}")).with_source(e))
}
