// src/pipeline/harvest.rs

//! Link harvesting pipeline.
//!
//! A harvest either reloads a previously written link file or walks a site's
//! result pages live, then hands back the deduplicated links in first-seen
//! order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Config, StopReason, TraversalPlan};
use crate::services::driver::PaginationDriver;
use crate::services::renderer::PageRenderer;
use crate::services::sites::Site;
use crate::storage::{LinkFile, LinkStore, read_link_file};

/// What to harvest beyond the site itself.
///
/// The date range is part of the site: it is validated when the site is
/// built and read back through [`Site::date_range`].
#[derive(Debug, Clone, Default)]
pub struct HarvestRequest {
    /// Load links from this file instead of fetching anything
    pub link_file: Option<PathBuf>,
}

/// Where the harvested links came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSource {
    File(PathBuf),
    /// Fetched live; `log` is the link file that received the batches
    Live { log: PathBuf },
}

/// Result of one harvest.
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    /// Unique links in first-seen order
    pub links: Vec<String>,
    pub source: LinkSource,
    pub descriptors_visited: usize,
    pub stop_reason: StopReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Orchestrates one site harvest from start to deduplicated result.
pub struct Harvester {
    config: Arc<Config>,
    renderer: PageRenderer,
}

impl Harvester {
    pub fn new(config: Arc<Config>, renderer: PageRenderer) -> Self {
        Self { config, renderer }
    }

    /// Validate `config` and build the renderer it selects.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        config.validate()?;
        let renderer = PageRenderer::from_config(&config)?;
        Ok(Self::new(config, renderer))
    }

    /// Day-by-day archive walk when the site was built with a range and has
    /// an archive, otherwise the paged search up to the configured ceiling.
    pub fn plan_for(&self, site: &dyn Site) -> TraversalPlan {
        match site.date_range() {
            Some(range) if site.supports_date_archive() => TraversalPlan::Dates(range),
            _ => TraversalPlan::Pages {
                max: self.config.harvest.max_pages,
            },
        }
    }

    /// Run a harvest for `site`.
    pub async fn harvest(&self, site: &dyn Site, request: &HarvestRequest) -> Result<HarvestOutcome> {
        let started_at = Utc::now();

        let (store, source, descriptors_visited, stop_reason) = match &request.link_file {
            Some(path) => {
                let store = self.load_from_file(path).await?;
                (store, LinkSource::File(path.clone()), 0, StopReason::LoadedFromFile)
            }
            None => {
                let log_path = self
                    .config
                    .paths
                    .links_dir
                    .join(site.link_file_name());
                let mut store = LinkStore::with_log(Box::new(LinkFile::new(&log_path)));
                let plan = self.plan_for(site);

                log::info!("Harvesting {} links into {}", site.name(), log_path.display());
                let driver = PaginationDriver::new(&self.renderer, site, &self.config.harvest);
                let outcome = driver.run(&plan, &mut store).await?;

                (
                    store,
                    LinkSource::Live { log: log_path },
                    outcome.descriptors_visited,
                    outcome.stop_reason,
                )
            }
        };

        let links = store.into_links();
        log::info!("Collected {} links", links.len());

        Ok(HarvestOutcome {
            links,
            source,
            descriptors_visited,
            stop_reason,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn load_from_file(&self, path: &Path) -> Result<LinkStore> {
        log::info!("Loading links from {}", path.display());
        let mut store = LinkStore::in_memory();
        for record in read_link_file(path).await? {
            store.insert(record);
        }
        Ok(store)
    }
}
