// src/services/driver.rs

//! Pagination driver.
//!
//! Walks a [`TraversalPlan`] one descriptor at a time: throttle, render the
//! query URL, extract links, record them. A page-index scan stops after two
//! consecutive empty result pages or at the ceiling; a date scan always
//! visits every day.
//!
//! With `max_concurrent > 1` pages are fetched ahead through an ordered
//! buffered stream, but results are still evaluated strictly in descriptor
//! order, so "consecutive" keeps its meaning and file appends stay serial.
//! The throttle is shared: requests start one delay apart no matter how many
//! are in flight.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{HarvestConfig, QueryDescriptor, StopReason, TraversalPlan};
use crate::services::renderer::PageRenderer;
use crate::services::sites::Site;
use crate::storage::LinkStore;

/// Consecutive empty result pages that end a page-index scan.
pub const EMPTY_PAGES_BEFORE_STOP: u32 = 2;

/// Per-run traversal state. Lives only for one [`PaginationDriver::run`].
#[derive(Debug, Default)]
struct HarvestState {
    cursor: Option<QueryDescriptor>,
    visited: usize,
    consecutive_empty: u32,
}

impl HarvestState {
    fn observe(&mut self, descriptor: QueryDescriptor, found: usize) {
        self.cursor = Some(descriptor);
        self.visited += 1;
        if found == 0 {
            self.consecutive_empty += 1;
        } else {
            self.consecutive_empty = 0;
        }
    }

    fn exhausted(&self) -> bool {
        self.consecutive_empty >= EMPTY_PAGES_BEFORE_STOP
    }

    fn finish(self, stop_reason: StopReason) -> DriveOutcome {
        DriveOutcome {
            descriptors_visited: self.visited,
            last_descriptor: self.cursor,
            stop_reason,
        }
    }
}

/// Summary of one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveOutcome {
    pub descriptors_visited: usize,
    pub last_descriptor: Option<QueryDescriptor>,
    pub stop_reason: StopReason,
}

/// Drives a site's result pages through the renderer and into a store.
pub struct PaginationDriver<'a> {
    renderer: &'a PageRenderer,
    site: &'a dyn Site,
    delay: Duration,
    concurrency: usize,
    /// Held while waiting out the delay, so requests leave one at a time
    throttle: Mutex<()>,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(renderer: &'a PageRenderer, site: &'a dyn Site, config: &HarvestConfig) -> Self {
        Self {
            renderer,
            site,
            delay: config.delay(),
            concurrency: config.max_concurrent.max(1),
            throttle: Mutex::new(()),
        }
    }

    /// Traverse `plan`, recording every non-empty batch into `store`.
    ///
    /// Render and extraction errors abort the traversal; links recorded
    /// before the failure are already persisted.
    pub async fn run(&self, plan: &TraversalPlan, store: &mut LinkStore) -> Result<DriveOutcome> {
        let mut state = HarvestState::default();

        let mut pages = stream::iter(plan.descriptors())
            .map(|descriptor| async move {
                let result = self.fetch_links(&descriptor).await;
                (descriptor, result)
            })
            .buffered(self.concurrency);

        while let Some((descriptor, result)) = pages.next().await {
            let links = result?;
            match descriptor {
                QueryDescriptor::PageIndex(page) => log::info!(
                    "Found {} article links on page {} of query results",
                    links.len(),
                    page
                ),
                QueryDescriptor::CalendarDate(_) => {
                    log::info!("Found {} article links for {}", links.len(), descriptor)
                }
            }

            state.observe(descriptor, links.len());
            if !links.is_empty() {
                store.record(&links).await?;
            }

            if plan.stops_on_empty() && state.exhausted() {
                log::debug!(
                    "{} consecutive empty pages after {}, results exhausted",
                    EMPTY_PAGES_BEFORE_STOP,
                    descriptor
                );
                return Ok(state.finish(StopReason::ConsecutiveEmpty));
            }
        }

        let stop_reason = match plan {
            TraversalPlan::Pages { max } => {
                log::warn!("Reached the {max} page ceiling before results ran out");
                StopReason::Ceiling
            }
            TraversalPlan::Dates(_) => StopReason::RangeExhausted,
        };
        Ok(state.finish(stop_reason))
    }

    /// Throttle, render and extract a single descriptor.
    async fn fetch_links(&self, descriptor: &QueryDescriptor) -> Result<Vec<String>> {
        let url = self.site.build_query(descriptor)?;
        if !self.delay.is_zero() {
            let _turn = self.throttle.lock().await;
            tokio::time::sleep(self.delay).await;
        }
        log::debug!("Requesting {}", url);
        let html = self.renderer.render(&url).await?;
        self.site.extract_links(&html, descriptor)
    }
}
