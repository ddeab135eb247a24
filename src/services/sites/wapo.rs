//! Washington Post news search.

use crate::error::{AppError, Result};
use crate::models::QueryDescriptor;
use crate::services::sites::{
    Site, SiteOptions, absolutize, first_anchor_hrefs, reject_date_range, unsupported_descriptor,
};
use crate::utils::plus_encode;

const NAME: &str = "wapo";
const BASE_URL: &str = "https://www.washingtonpost.com";
const SEARCH_URL: &str = "https://www.washingtonpost.com/newssearch/?";
const LIST_SEPARATOR: &str = "%2C";

const CONTENT_TYPES: &[&str] = &["Article", "Blog"];

/// Washington Post site search.
#[derive(Debug, Clone)]
pub struct WashingtonPost {
    query: String,
    content_type: String,
    blog_name: String,
    date_filter: String,
}

impl WashingtonPost {
    pub fn new(options: &SiteOptions) -> Result<Self> {
        reject_date_range(NAME, options)?;

        let date_filter = match options.from_last.unwrap_or(60) {
            24 => "24+Hours".to_string(),
            365 => "12+Months".to_string(),
            2005 => "All+Since+2005".to_string(),
            n @ (7 | 60) => format!("{n}+Days"),
            n => {
                return Err(AppError::config(format!(
                    "Invalid from_last {n} for wapo. Valid values are 24, 7, 60, 365, 2005"
                )));
            }
        };

        let content_types = options
            .doc_type
            .as_deref()
            .unwrap_or("Article")
            .split_whitespace()
            .map(|t| {
                CONTENT_TYPES
                    .iter()
                    .find(|known| known.eq_ignore_ascii_case(t))
                    .copied()
                    .ok_or_else(|| {
                        AppError::config(format!(
                            "Invalid doc_type '{t}' for wapo. Valid values are Article, Blog"
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        if content_types.is_empty() {
            return Err(AppError::config("wapo doc_type is empty"));
        }

        let blog_name = options
            .blog_id
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR);

        Ok(Self {
            query: plus_encode(&options.query),
            content_type: content_types.join(LIST_SEPARATOR),
            blog_name,
            date_filter,
        })
    }
}

impl Site for WashingtonPost {
    fn name(&self) -> &str {
        NAME
    }

    fn build_query(&self, descriptor: &QueryDescriptor) -> Result<String> {
        let QueryDescriptor::PageIndex(page) = descriptor else {
            return Err(unsupported_descriptor(NAME, descriptor));
        };
        Ok(format!(
            "{SEARCH_URL}query={}&contenttype={}&searchType=&blogName={}&datefilter={}&sort=Date#page-{}",
            self.query, self.content_type, self.blog_name, self.date_filter, page
        ))
    }

    fn extract_links(&self, html: &str, _descriptor: &QueryDescriptor) -> Result<Vec<String>> {
        absolutize(
            BASE_URL,
            first_anchor_hrefs(NAME, html, "div.pb-feed-item.ng-scope")?,
        )
    }

    fn link_file_name(&self) -> String {
        format!(
            "wapo_links_{}_{}.txt",
            self.content_type.replace(LIST_SEPARATOR, "_"),
            self.query
        )
    }
}
