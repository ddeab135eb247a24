//! Per-site query builders and link extractors.
//!
//! Each news site supplies the two capabilities the pagination driver needs:
//! turning a [`QueryDescriptor`] into a result page URL, and pulling article
//! links out of that page's HTML. Everything else about a harvest is shared.
//!
//! | Site | Module | Date archive | Notes |
//! |------|--------|--------------|-------|
//! | NPR | [`npr`] | no | Program filter by numeric id |
//! | New York Times | [`nyt`] | no | Date range becomes a search filter |
//! | Washington Post | [`wapo`] | no | Content type and blog filters |
//! | BuzzFeed | [`buzzfeed`] | yes | Tag search or per-day archive |
//!
//! Site construction validates every option so configuration mistakes fail
//! before any page is requested.

pub mod buzzfeed;
pub mod npr;
pub mod nyt;
pub mod wapo;

use std::fmt;
use std::str::FromStr;

use scraper::{ElementRef, Html};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{DateRange, QueryDescriptor};
use crate::utils::{parse_selector, resolve_url};

pub use buzzfeed::BuzzFeed;
pub use npr::Npr;
pub use nyt::Nyt;
pub use wapo::WashingtonPost;

/// Capabilities a news site provides to the harvester.
pub trait Site: Send + Sync {
    /// Short identifier, used in log output and link file names.
    fn name(&self) -> &str;

    /// Result page URL for a descriptor.
    fn build_query(&self, descriptor: &QueryDescriptor) -> Result<String>;

    /// Absolute article URLs found on a result page.
    ///
    /// An error means the page did not have the expected structure.
    fn extract_links(&self, html: &str, descriptor: &QueryDescriptor) -> Result<Vec<String>>;

    /// Whether a date range is walked day by day through an archive.
    fn supports_date_archive(&self) -> bool {
        false
    }

    /// Date range the site was built with, if any.
    fn date_range(&self) -> Option<DateRange> {
        None
    }

    /// File name of the append-only link log for this query.
    fn link_file_name(&self) -> String;
}

/// Known site implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Npr,
    Nyt,
    WashingtonPost,
    BuzzFeed,
}

impl SiteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npr => "npr",
            Self::Nyt => "nyt",
            Self::WashingtonPost => "wapo",
            Self::BuzzFeed => "buzzfeed",
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "npr" => Ok(Self::Npr),
            "nyt" => Ok(Self::Nyt),
            "wapo" => Ok(Self::WashingtonPost),
            "buzzfeed" => Ok(Self::BuzzFeed),
            other => Err(AppError::config(format!(
                "Unknown site '{other}'. Valid sites are npr, nyt, wapo, buzzfeed"
            ))),
        }
    }
}

/// Query options shared by all sites. Unset fields take the site default.
#[derive(Debug, Clone, Default)]
pub struct SiteOptions {
    /// Free-text search query
    pub query: String,
    /// Recency window, site-specific units
    pub from_last: Option<u32>,
    pub section: Option<String>,
    pub doc_type: Option<String>,
    pub sort_by: Option<String>,
    pub blog_id: Option<String>,
    pub date_range: Option<DateRange>,
}

impl SiteOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    fn require_query(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(AppError::config("Query string is empty"));
        }
        Ok(())
    }
}

/// Build a validated site from options.
pub fn build_site(kind: SiteKind, options: &SiteOptions) -> Result<Box<dyn Site>> {
    options.require_query()?;
    let site: Box<dyn Site> = match kind {
        SiteKind::Npr => Box::new(Npr::new(options)?),
        SiteKind::Nyt => Box::new(Nyt::new(options)?),
        SiteKind::WashingtonPost => Box::new(WashingtonPost::new(options)?),
        SiteKind::BuzzFeed => Box::new(BuzzFeed::new(options)?),
    };
    Ok(site)
}

/// Reject a date range on a site that can neither filter nor archive by date.
fn reject_date_range(site: &str, options: &SiteOptions) -> Result<()> {
    if options.date_range.is_some() {
        return Err(AppError::config(format!(
            "{site} does not support date range queries"
        )));
    }
    Ok(())
}

/// Error for a descriptor kind the site cannot turn into a URL.
fn unsupported_descriptor(site: &str, descriptor: &QueryDescriptor) -> AppError {
    AppError::config(format!("{site} cannot build a query for {descriptor}"))
}

/// `href` of the first anchor inside each element matching `item_selector`.
///
/// An item without an anchor is an extraction error.
fn first_anchor_hrefs(site: &str, html: &str, item_selector: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let item_sel = parse_selector(item_selector)?;
    let anchor_sel = parse_selector("a")?;

    document
        .select(&item_sel)
        .map(|item| {
            item.select(&anchor_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::extraction(site, format!("'{item_selector}' result without a link"))
                })
        })
        .collect()
}

/// Resolve extracted hrefs against the site root.
fn absolutize(base: &str, hrefs: Vec<String>) -> Result<Vec<String>> {
    let base = Url::parse(base)?;
    Ok(hrefs.iter().map(|href| resolve_url(&base, href)).collect())
}

/// The first element matching `selector`, or an extraction error.
fn first_match<'a>(site: &str, document: &'a Html, selector: &str) -> Result<ElementRef<'a>> {
    let sel = parse_selector(selector)?;
    document
        .select(&sel)
        .next()
        .ok_or_else(|| AppError::extraction(site, format!("no '{selector}' element on page")))
}
