// src/utils/http.rs

//! HTTP client utilities.

use crate::error::Result;
use crate::models::RendererConfig;

/// Create a configured asynchronous HTTP client.
///
/// The client-wide timeout is the page load timeout, so a stalled response
/// surfaces as a timeout error rather than hanging.
pub fn create_async_client(config: &RendererConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.page_timeout())
        .build()?;
    Ok(client)
}
