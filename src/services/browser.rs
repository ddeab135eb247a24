// src/services/browser.rs

//! Headless Chrome page source.
//!
//! Every load launches its own browser session and closes it again before
//! returning, whether the page loaded, timed out or failed.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use futures::StreamExt;

use crate::error::{AppError, Result};
use crate::models::{Config, RenderResult};
use crate::services::renderer::PageSource;

/// Page source that renders through a fresh headless Chrome per load.
pub struct BrowserSource {
    page_timeout: Duration,
    window_width: u32,
    window_height: u32,
}

impl BrowserSource {
    pub fn new(config: &Config) -> Self {
        Self {
            page_timeout: config.renderer.page_timeout(),
            window_width: config.renderer.window_width,
            window_height: config.renderer.window_height,
        }
    }

    fn browser_config(&self) -> std::result::Result<BrowserConfig, String> {
        BrowserConfig::builder()
            .window_size(self.window_width, self.window_height)
            .request_timeout(self.page_timeout)
            .build()
    }

    async fn fetch_html(browser: &Browser, url: &str) -> std::result::Result<String, CdpError> {
        let page = browser.new_page(url).await?;
        page.content().await
    }
}

#[async_trait]
impl PageSource for BrowserSource {
    async fn load(&self, url: &str) -> Result<RenderResult> {
        let config = self.browser_config().map_err(|e| AppError::render(url, e))?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::render(url, e))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let outcome = tokio::time::timeout(self.page_timeout, Self::fetch_html(&browser, url)).await;

        if let Err(e) = browser.close().await {
            log::debug!("Browser close failed for {}: {}", url, e);
        }
        if let Err(e) = browser.wait().await {
            log::debug!("Browser process wait failed for {}: {}", url, e);
        }
        events.abort();

        match outcome {
            Err(_elapsed) => Ok(RenderResult::timed_out()),
            Ok(Err(CdpError::Timeout)) => Ok(RenderResult::timed_out()),
            Ok(Err(e)) => Err(AppError::render(url, e)),
            Ok(Ok(html)) => Ok(RenderResult::loaded(html)),
        }
    }
}
