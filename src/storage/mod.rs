//! Link deduplication and persistence.
//!
//! Harvested links live in two places:
//! - In memory: a [`LinkStore`] that silently rejects duplicates. This is
//!   what the harvest returns.
//! - On disk: an append-only log, one URL per line, written after every
//!   non-empty batch so a crash loses at most the batch in flight.
//!
//! ## Directory Structure
//!
//! ```text
//! links/
//! ├── npr_links_election.txt
//! ├── nyt_links_article_election.txt
//! └── buzzfeed_links_election_110116-110316.txt
//! ```
//!
//! The on-disk log may hold duplicates across runs. Only the in-memory
//! set is deduplicated.

pub mod local;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::LinkRecord;

// Re-export for convenience
pub use local::{LinkFile, read_link_file};

/// Append-only sink for harvested link batches.
#[async_trait]
pub trait LinkLog: Send + Sync {
    /// Append one batch. Existing content is never rewritten.
    async fn append(&self, links: &[LinkRecord]) -> Result<()>;
}

/// In-memory link set with optional incremental persistence.
pub struct LinkStore {
    seen: HashSet<LinkRecord>,
    links: Vec<LinkRecord>,
    log: Option<Box<dyn LinkLog>>,
}

impl LinkStore {
    /// A store that only deduplicates.
    pub fn in_memory() -> Self {
        Self {
            seen: HashSet::new(),
            links: Vec::new(),
            log: None,
        }
    }

    /// A store that also appends every non-empty batch to `log`.
    pub fn with_log(log: Box<dyn LinkLog>) -> Self {
        Self {
            log: Some(log),
            ..Self::in_memory()
        }
    }

    /// Record a batch of extracted links.
    ///
    /// Blank entries are dropped. A non-empty batch is persisted as a whole,
    /// duplicates included, before it is merged into the set.
    /// Returns how many links were new to this store.
    pub async fn record(&mut self, batch: &[String]) -> Result<usize> {
        let records: Vec<LinkRecord> = batch.iter().filter_map(|l| LinkRecord::parse(l)).collect();
        if records.is_empty() {
            return Ok(0);
        }

        if let Some(log) = &self.log {
            log.append(&records).await?;
        }

        Ok(records
            .into_iter()
            .filter(|record| self.insert(record.clone()))
            .count())
    }

    /// Insert a single link without persisting it.
    pub fn insert(&mut self, link: LinkRecord) -> bool {
        if self.seen.insert(link.clone()) {
            self.links.push(link);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, link: &str) -> bool {
        LinkRecord::parse(link).is_some_and(|record| self.seen.contains(&record))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Deduplicated links in first-seen order.
    pub fn into_links(self) -> Vec<String> {
        self.links.into_iter().map(LinkRecord::into_string).collect()
    }
}

impl Default for LinkStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
