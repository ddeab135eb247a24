// src/testing.rs

//! Test doubles for the rendering and site layers.

use std::collections::{HashMap, VecDeque};
use std::fmt::Display;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::time::Instant;

use crate::error::{AppError, Result};
use crate::models::{DateRange, QueryDescriptor, RenderResult};
use crate::services::renderer::{PageRenderer, PageSource};
use crate::services::sites::Site;

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<String, VecDeque<RenderResult>>,
    loads: HashMap<String, usize>,
    requested: Vec<String>,
    requested_at: Vec<Instant>,
}

/// Page source that replays scripted responses per URL.
///
/// Responses for a URL are consumed in order; the last one repeats. Clones
/// share the same script and load counters.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<Script>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.push(url, RenderResult::loaded(html));
        self
    }

    pub fn timeouts(self, url: &str, count: usize) -> Self {
        for _ in 0..count {
            self.push(url, RenderResult::timed_out());
        }
        self
    }

    /// Number of load attempts made for `url`.
    pub fn loads(&self, url: &str) -> usize {
        let script = self.script.lock().unwrap();
        script.loads.get(url).copied().unwrap_or(0)
    }

    /// Every load attempt in call order.
    pub fn requested(&self) -> Vec<String> {
        self.script.lock().unwrap().requested.clone()
    }

    /// When each load attempt started, in call order.
    pub fn request_times(&self) -> Vec<Instant> {
        self.script.lock().unwrap().requested_at.clone()
    }

    pub fn total_loads(&self) -> usize {
        self.script.lock().unwrap().requested.len()
    }

    fn push(&self, url: &str, result: RenderResult) {
        let mut script = self.script.lock().unwrap();
        script
            .responses
            .entry(url.to_string())
            .or_default()
            .push_back(result);
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn load(&self, url: &str) -> Result<RenderResult> {
        let mut script = self.script.lock().unwrap();
        *script.loads.entry(url.to_string()).or_default() += 1;
        script.requested.push(url.to_string());
        script.requested_at.push(Instant::now());

        let queue = script
            .responses
            .get_mut(url)
            .ok_or_else(|| AppError::render(url, "no scripted response"))?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| AppError::render(url, "no scripted response"))
    }
}

/// Log messages recorded since [`capture_logs`] was first called.
static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED
            .lock()
            .unwrap()
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Install the recording logger for this test binary.
pub fn capture_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
    });
}

/// Recorded messages containing `needle`. Tests run in parallel, so pass
/// something unique to the test, such as its URL.
pub fn captured_logs(needle: &str) -> Vec<String> {
    CAPTURED
        .lock()
        .unwrap()
        .iter()
        .filter(|line| line.contains(needle))
        .cloned()
        .collect()
}

/// Renderer over a scripted source with the default page timeout.
pub fn renderer_for(source: &ScriptedSource) -> PageRenderer {
    PageRenderer::new(Box::new(source.clone()), Duration::from_secs(30))
}

/// Site whose result pages are plain lists of URLs, one per line.
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    archive: bool,
    date_range: Option<DateRange>,
}

impl FakeSite {
    /// Page body that fails extraction.
    pub const BROKEN_PAGE: &'static str = "<broken>";

    pub fn new() -> Self {
        Self::default()
    }

    /// Variant that walks date ranges day by day.
    pub fn archive() -> Self {
        Self {
            archive: true,
            date_range: None,
        }
    }

    /// Same site built with a date range.
    pub fn with_range(self, range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            ..self
        }
    }

    pub fn page_url(&self, page: u32) -> String {
        format!("https://fake.test/search?page={page}")
    }

    pub fn date_url(&self, date: NaiveDate) -> String {
        format!("https://fake.test/archive/{}", date.format("%Y-%m-%d"))
    }

    /// Result page body listing `count` distinct story URLs tagged `tag`.
    pub fn links_html(tag: impl Display, count: usize) -> String {
        (0..count)
            .map(|k| format!("https://fake.test/story/{tag}-{k}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Script pages 1..=n with the given link counts.
    pub fn scripted_pages(&self, counts: &[usize]) -> ScriptedSource {
        counts
            .iter()
            .enumerate()
            .fold(ScriptedSource::new(), |source, (i, &count)| {
                let page = i as u32 + 1;
                source.page(&self.page_url(page), &Self::links_html(page, count))
            })
    }

    pub fn scripted_dates(&self, days: &[(NaiveDate, usize)]) -> ScriptedSource {
        days.iter()
            .fold(ScriptedSource::new(), |source, &(date, count)| {
                source.page(&self.date_url(date), &Self::links_html(date, count))
            })
    }
}

impl Site for FakeSite {
    fn name(&self) -> &str {
        "fake"
    }

    fn build_query(&self, descriptor: &QueryDescriptor) -> Result<String> {
        Ok(match descriptor {
            QueryDescriptor::PageIndex(page) => self.page_url(*page),
            QueryDescriptor::CalendarDate(date) => self.date_url(*date),
        })
    }

    fn extract_links(&self, html: &str, _descriptor: &QueryDescriptor) -> Result<Vec<String>> {
        if html.trim() == Self::BROKEN_PAGE {
            return Err(AppError::extraction("fake", "result container missing"));
        }
        Ok(html
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("http"))
            .map(str::to_string)
            .collect())
    }

    fn supports_date_archive(&self) -> bool {
        self.archive
    }

    fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    fn link_file_name(&self) -> String {
        match &self.date_range {
            Some(range) => format!("fake_links_{}.txt", range.file_label()),
            None => "fake_links.txt".to_string(),
        }
    }
}
