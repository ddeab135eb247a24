// src/services/renderer.rs

//! Page rendering with unbounded retry on load timeouts.
//!
//! A [`PageSource`] performs a single load attempt and reports a timeout as
//! an unsuccessful [`RenderResult`] instead of an error. [`PageRenderer`]
//! keeps re-issuing the same URL until a load succeeds. There is no retry
//! cap and no backoff; a permanently stuck page hangs the harvest until the
//! process is killed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Config, RenderResult, RendererBackend};
use crate::utils::http::create_async_client;

/// One page load attempt.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Load `url` once. Timeouts yield `RenderResult::timed_out()`; any
    /// other failure is an error.
    async fn load(&self, url: &str) -> Result<RenderResult>;
}

/// HTML of a rendered page plus the number of timeouts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub retries: u64,
}

/// Renders result pages, retrying forever on timeout.
pub struct PageRenderer {
    source: Box<dyn PageSource>,
    page_timeout: Duration,
}

impl PageRenderer {
    pub fn new(source: Box<dyn PageSource>, page_timeout: Duration) -> Self {
        Self {
            source,
            page_timeout,
        }
    }

    /// Build the renderer selected by `config.renderer.backend`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source: Box<dyn PageSource> = match config.renderer.backend {
            RendererBackend::Http => Box::new(HttpSource::new(config)?),
            #[cfg(feature = "browser")]
            RendererBackend::Browser => {
                Box::new(crate::services::browser::BrowserSource::new(config))
            }
            #[cfg(not(feature = "browser"))]
            RendererBackend::Browser => {
                return Err(AppError::config(
                    "renderer.backend = \"browser\" requires the `browser` feature",
                ));
            }
        };
        Ok(Self::new(source, config.renderer.page_timeout()))
    }

    /// Render `url` and return its HTML.
    pub async fn render(&self, url: &str) -> Result<String> {
        Ok(self.render_page(url).await?.html)
    }

    /// Render `url`, reporting how many timeouts were retried.
    pub async fn render_page(&self, url: &str) -> Result<RenderedPage> {
        let mut retries = 0;
        loop {
            let result = self.source.load(url).await?;
            if result.success {
                return Ok(RenderedPage {
                    html: result.html,
                    retries,
                });
            }

            retries += 1;
            log::warn!(
                "Retrying page load after {}s timeout ({}, attempt {})",
                self.page_timeout.as_secs(),
                url,
                retries + 1
            );
        }
    }
}

/// Plain HTTP page source backed by a shared `reqwest` client.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: create_async_client(&config.renderer)?,
        })
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn load(&self, url: &str) -> Result<RenderResult> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Ok(RenderResult::timed_out()),
            Err(e) => return Err(AppError::render(url, e)),
        };

        match response.text().await {
            Ok(html) => Ok(RenderResult::loaded(html)),
            Err(e) if e.is_timeout() => Ok(RenderResult::timed_out()),
            Err(e) => Err(AppError::from(e)),
        }
    }
}
