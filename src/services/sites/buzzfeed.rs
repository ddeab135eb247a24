//! BuzzFeed tag search and daily archive.
//!
//! Without a date range the tag listing is paged with `?p=`. With one, each
//! day's archive page is visited and its links are kept only when the query
//! appears in the link title or text.

use chrono::Datelike;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{DateRange, QueryDescriptor};
use crate::services::sites::{Site, SiteOptions, absolutize, first_anchor_hrefs, first_match};
use crate::utils::{parse_selector, plus_encode};

const NAME: &str = "buzzfeed";
const BASE_URL: &str = "https://www.buzzfeed.com";

/// BuzzFeed tag search and archive.
#[derive(Debug, Clone)]
pub struct BuzzFeed {
    query: String,
    /// Lowercased query with spaces, matched against archive link text
    needle: String,
    date_range: Option<DateRange>,
}

impl BuzzFeed {
    pub fn new(options: &SiteOptions) -> Result<Self> {
        let query = plus_encode(&options.query);
        let needle = query.replace('+', " ").to_lowercase();
        Ok(Self {
            query,
            needle,
            date_range: options.date_range,
        })
    }

    fn archive_links(&self, html: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(html);
        let flow = first_match(NAME, &document, "ul.flow")?;
        let anchor_sel = parse_selector("a")?;

        let mut hrefs = Vec::new();
        for anchor in flow.select(&anchor_sel) {
            let title = anchor.value().attr("title").unwrap_or("").to_lowercase();
            let text = anchor.text().collect::<String>().to_lowercase();
            if !title.contains(&self.needle) && !text.contains(&self.needle) {
                continue;
            }
            let href = anchor
                .value()
                .attr("href")
                .ok_or_else(|| AppError::extraction(NAME, "archive anchor without href"))?;
            hrefs.push(href.to_string());
        }

        absolutize(BASE_URL, hrefs)
    }
}

impl Site for BuzzFeed {
    fn name(&self) -> &str {
        NAME
    }

    fn build_query(&self, descriptor: &QueryDescriptor) -> Result<String> {
        Ok(match descriptor {
            QueryDescriptor::PageIndex(page) => {
                format!("{BASE_URL}/tag/{}?p={}", self.query, page)
            }
            QueryDescriptor::CalendarDate(date) => format!(
                "{BASE_URL}/archive/{}/{}/{}",
                date.year(),
                date.month(),
                date.day()
            ),
        })
    }

    fn extract_links(&self, html: &str, descriptor: &QueryDescriptor) -> Result<Vec<String>> {
        match descriptor {
            QueryDescriptor::PageIndex(_) => {
                absolutize(BASE_URL, first_anchor_hrefs(NAME, html, "article")?)
            }
            QueryDescriptor::CalendarDate(_) => self.archive_links(html),
        }
    }

    fn supports_date_archive(&self) -> bool {
        true
    }

    fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    fn link_file_name(&self) -> String {
        match &self.date_range {
            Some(range) => format!("buzzfeed_links_{}_{}.txt", self.query, range.file_label()),
            None => format!("buzzfeed_links_{}.txt", self.query),
        }
    }
}
