//! New York Times site search.
//!
//! The search is a single-page app addressed by fragment path segments:
//! query, time window, document type filter, page number and sort order.
//! A date range does not switch to an archive walk here; it becomes a
//! `fromYYYYMMDDtoYYYYMMDD` window on the ordinary paged search.

use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{DateRange, QueryDescriptor};
use crate::services::sites::{Site, SiteOptions, absolutize, first_match, unsupported_descriptor};
use crate::utils::{parse_selector, plus_encode};

const NAME: &str = "nyt";
const BASE_URL: &str = "https://www.nytimes.com";
const SEARCH_URL: &str = "http://query.nytimes.com/search/sitesearch/#/";

const DOC_TYPES: &[&str] = &[
    "article",
    "multimedia",
    "blog",
    "interactive",
    "video",
    "allresults",
];
const SECTIONS: &[&str] = &[
    "all",
    "U.S.",
    "New York and Region",
    "Opinion",
    "Arts",
    "Briefing",
    "Business Day",
];
const FROM_LAST_VALUES: &[u32] = &[24, 7, 30, 365];
const SORT_VALUES: &[&str] = &["newest", "oldest", "relevance"];

/// New York Times site search.
#[derive(Debug, Clone)]
pub struct Nyt {
    query: String,
    window: String,
    doc_type: String,
    sort_by: String,
    date_range: Option<DateRange>,
}

impl Nyt {
    pub fn new(options: &SiteOptions) -> Result<Self> {
        let window = match &options.date_range {
            Some(range) => format!(
                "from{}to{}",
                range.start.format("%Y%m%d"),
                range.end.format("%Y%m%d")
            ),
            None => match options.from_last.unwrap_or(30) {
                24 => "24hours".to_string(),
                n if FROM_LAST_VALUES.contains(&n) => format!("{n}days"),
                n => {
                    return Err(AppError::config(format!(
                        "Invalid from_last {n} for nyt. Valid values are 24, 7, 30, 365"
                    )));
                }
            },
        };

        let doc_type = options.doc_type.as_deref().unwrap_or("article").to_lowercase();
        if !DOC_TYPES.contains(&doc_type.as_str()) {
            return Err(AppError::config(format!(
                "Invalid doc_type '{doc_type}' for nyt. Valid values are {}",
                DOC_TYPES.join(", ")
            )));
        }
        let doc_type = match doc_type.as_str() {
            "allresults" => doc_type,
            "interactive" => "type_of_material%3A%22interactive%20feature%22".to_string(),
            "blog" => "document_type%3A%22blogpost%22".to_string(),
            other => format!("document_type%3A%22{other}%22"),
        };

        let sort_by = options.sort_by.as_deref().unwrap_or("newest").to_lowercase();
        if !SORT_VALUES.contains(&sort_by.as_str()) {
            return Err(AppError::config(format!(
                "Invalid sort_by '{sort_by}' for nyt. Valid values are newest, oldest, relevance"
            )));
        }

        // The fragment path has no section slot; the name is still checked.
        let section = options.section.as_deref().unwrap_or("all");
        if !SECTIONS.contains(&section) {
            return Err(AppError::config(format!(
                "Did not recognize section name {section}"
            )));
        }

        Ok(Self {
            query: plus_encode(&options.query),
            window,
            doc_type,
            sort_by,
            date_range: options.date_range,
        })
    }

    /// Document type filter with the URL encoding stripped, e.g. `article`.
    fn doc_type_label(&self) -> String {
        self.doc_type
            .replace("document_type", "")
            .replace("%3A", "")
            .replace("%22", "")
    }
}

impl Site for Nyt {
    fn name(&self) -> &str {
        NAME
    }

    fn build_query(&self, descriptor: &QueryDescriptor) -> Result<String> {
        let QueryDescriptor::PageIndex(page) = descriptor else {
            return Err(unsupported_descriptor(NAME, descriptor));
        };
        Ok(format!(
            "{SEARCH_URL}{}/{}/{}/{}/allauthors/{}",
            self.query, self.window, self.doc_type, page, self.sort_by
        ))
    }

    fn extract_links(&self, html: &str, _descriptor: &QueryDescriptor) -> Result<Vec<String>> {
        let document = Html::parse_document(html);
        let list = first_match(NAME, &document, "ol.searchResultsList.flush")?;
        let anchor_sel = parse_selector("a")?;

        let hrefs = list
            .select(&anchor_sel)
            .map(|a| {
                a.value()
                    .attr("href")
                    .map(str::to_string)
                    .ok_or_else(|| AppError::extraction(NAME, "result anchor without href"))
            })
            .collect::<Result<Vec<_>>>()?;

        absolutize(BASE_URL, hrefs)
    }

    fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    fn link_file_name(&self) -> String {
        format!("nyt_links_{}_{}.txt", self.doc_type_label(), self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn site(options: SiteOptions) -> Nyt {
        Nyt::new(&options).unwrap()
    }

    #[test]
    fn test_default_query_url() {
        let nyt = site(SiteOptions::new("donald trump"));
        assert_eq!(
            nyt.build_query(&QueryDescriptor::PageIndex(2)).unwrap(),
            "http://query.nytimes.com/search/sitesearch/#/donald+trump/30days/document_type%3A%22article%22/2/allauthors/newest"
        );
    }

    #[test]
    fn test_date_range_window() {
        let options = SiteOptions {
            date_range: Some(DateRange::new(
                NaiveDate::from_ymd_opt(2016, 11, 1).unwrap(),
                NaiveDate::from_ymd_opt(2016, 11, 3).unwrap(),
            )),
            ..SiteOptions::new("election")
        };
        let nyt = site(options);
        let url = nyt.build_query(&QueryDescriptor::PageIndex(1)).unwrap();
        assert!(url.contains("/from20161101to20161103/"));
        assert!(!nyt.supports_date_archive());
        assert!(nyt.date_range().is_some());
    }

    #[test]
    fn test_doc_type_mapping() {
        let doc = |t: &str| {
            site(SiteOptions {
                doc_type: Some(t.to_string()),
                ..SiteOptions::new("x")
            })
            .doc_type
        };
        assert_eq!(doc("allresults"), "allresults");
        assert_eq!(doc("Blog"), "document_type%3A%22blogpost%22");
        assert_eq!(
            doc("Interactive"),
            "type_of_material%3A%22interactive%20feature%22"
        );
        assert_eq!(doc("Video"), "document_type%3A%22video%22");
    }

    #[test]
    fn test_rejects_invalid_options() {
        let bad = [
            SiteOptions {
                doc_type: Some("podcast".to_string()),
                ..SiteOptions::new("x")
            },
            SiteOptions {
                section: Some("Sports".to_string()),
                ..SiteOptions::new("x")
            },
            SiteOptions {
                sort_by: Some("popular".to_string()),
                ..SiteOptions::new("x")
            },
            SiteOptions {
                from_last: Some(42),
                ..SiteOptions::new("x")
            },
        ];
        for options in bad {
            assert!(matches!(Nyt::new(&options), Err(AppError::Config(_))));
        }
    }

    #[test]
    fn test_extract_links() {
        let nyt = site(SiteOptions::new("x"));
        let html = r#"
            <ol class="searchResultsList flush">
              <li><a href="https://www.nytimes.com/2016/11/01/a.html">A</a></li>
              <li><a href="/2016/11/02/b.html">B</a></li>
            </ol>
        "#;
        assert_eq!(
            nyt.extract_links(html, &QueryDescriptor::PageIndex(1)).unwrap(),
            vec![
                "https://www.nytimes.com/2016/11/01/a.html".to_string(),
                "https://www.nytimes.com/2016/11/02/b.html".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_result_list() {
        let nyt = site(SiteOptions::new("x"));
        let html = r#"<ol class="searchResultsList flush"></ol>"#;
        assert!(
            nyt.extract_links(html, &QueryDescriptor::PageIndex(1))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_missing_result_list_is_fatal() {
        let nyt = site(SiteOptions::new("x"));
        let err = nyt
            .extract_links("<html></html>", &QueryDescriptor::PageIndex(1))
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction { .. }));
    }

    #[test]
    fn test_link_file_name() {
        let nyt = site(SiteOptions::new("donald trump"));
        assert_eq!(nyt.link_file_name(), "nyt_links_article_donald+trump.txt");
    }
}
