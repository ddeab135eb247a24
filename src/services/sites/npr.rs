//! NPR search results.
//!
//! Results are paged ten at a time through a `start` offset. The program
//! filter takes numeric program ids, so section names are mapped here.

use crate::error::{AppError, Result};
use crate::models::QueryDescriptor;
use crate::services::sites::{
    Site, SiteOptions, absolutize, first_anchor_hrefs, reject_date_range, unsupported_descriptor,
};
use crate::utils::plus_encode;

const NAME: &str = "npr";
const BASE_URL: &str = "http://www.npr.org";
const SEARCH_URL: &str = "http://www.npr.org/search/index.php?";
const RESULTS_PER_PAGE: u32 = 10;

const PROGRAM_IDS: &[(&str, u32)] = &[
    ("All Songs Considered", 37),
    ("All Things Considered", 2),
    ("Ask Me Another", 58),
    ("Fresh Air", 13),
    ("Invisibilia", 64),
    ("Latino USA", 22),
    ("Morning Edition", 3),
    ("Snap Judgment", 62),
    ("TED Radio Hour", 57),
    ("Weekend Edition - Saturday", 7),
    ("Weekend Edition - Sunday", 10),
    ("Wait Wait... Don't Tell Me!", 35),
    ("World Cafe", 39),
];

const FROM_LAST_VALUES: &[u32] = &[24, 7, 30, 42, 365, 0];
/// Accepted `sort_by` values and the `sort` parameter each one sends.
const SORT_VALUES: &[(&str, &str)] = &[("newest", "date"), ("relevance", "match")];

/// NPR site search.
#[derive(Debug, Clone)]
pub struct Npr {
    query: String,
    date_id: u32,
    program_id: String,
    sort_by: String,
}

impl Npr {
    pub fn new(options: &SiteOptions) -> Result<Self> {
        reject_date_range(NAME, options)?;

        let from_last = options.from_last.unwrap_or(30);
        if !FROM_LAST_VALUES.contains(&from_last) {
            return Err(AppError::config(format!(
                "Invalid from_last {from_last} for npr. Valid values are 24, 7, 30, 42, 365, 0"
            )));
        }
        // 24 hours is requested as dateId 1
        let date_id = if from_last == 24 { 1 } else { from_last };

        let requested = options.sort_by.as_deref().unwrap_or("newest").to_lowercase();
        let sort_by = SORT_VALUES
            .iter()
            .find(|(name, _)| *name == requested)
            .map(|(_, param)| param.to_string())
            .ok_or_else(|| {
                AppError::config(format!(
                    "Invalid sort_by '{requested}' for npr. Valid values are newest, relevance"
                ))
            })?;

        let program_id = match options.section.as_deref().unwrap_or("all") {
            "all" => String::new(),
            section => PROGRAM_IDS
                .iter()
                .find(|(name, _)| *name == section)
                .map(|(_, id)| id.to_string())
                .ok_or_else(|| {
                    AppError::config(format!("Did not recognize section name {section}"))
                })?,
        };

        Ok(Self {
            query: plus_encode(&options.query),
            date_id,
            program_id,
            sort_by,
        })
    }
}

impl Site for Npr {
    fn name(&self) -> &str {
        NAME
    }

    fn build_query(&self, descriptor: &QueryDescriptor) -> Result<String> {
        let QueryDescriptor::PageIndex(page) = descriptor else {
            return Err(unsupported_descriptor(NAME, descriptor));
        };
        Ok(format!(
            "{SEARCH_URL}searchinput={}&dateId={}&programId={}&sort={}&start={}",
            self.query,
            self.date_id,
            self.program_id,
            self.sort_by,
            RESULTS_PER_PAGE * page.saturating_sub(1)
        ))
    }

    fn extract_links(&self, html: &str, _descriptor: &QueryDescriptor) -> Result<Vec<String>> {
        absolutize(BASE_URL, first_anchor_hrefs(NAME, html, "article.item")?)
    }

    fn link_file_name(&self) -> String {
        format!("npr_links_{}.txt", self.query)
    }
}
