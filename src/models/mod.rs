// src/models/mod.rs

//! Domain models for the harvester.
//!
//! This module contains the data structures shared across the pagination,
//! storage and site layers.

mod config;
mod descriptor;
mod link;

// Re-export all public types
pub use config::{
    Config, HarvestConfig, LoggingConfig, PathsConfig, RendererBackend, RendererConfig,
};
pub use descriptor::{DateRange, QueryDescriptor, TraversalPlan};
pub use link::LinkRecord;

/// Why a harvest stopped producing descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Two consecutive result pages had no links
    ConsecutiveEmpty,
    /// The page-index ceiling was reached
    Ceiling,
    /// Every date in the range was visited
    RangeExhausted,
    /// Links came from an existing file; nothing was fetched
    LoadedFromFile,
}

/// Result of a single page load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub html: String,
    /// `false` when the load hit the page timeout
    pub success: bool,
}

impl RenderResult {
    pub fn loaded(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            success: true,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            html: String::new(),
            success: false,
        }
    }
}
