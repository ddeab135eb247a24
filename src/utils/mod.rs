//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Encode a free-text query the way the search forms do: spaces become `+`.
pub fn plus_encode(query: &str) -> String {
    query.trim().replace(' ', "+")
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
///
/// [`AppError::Selector`]: crate::error::AppError::Selector
pub fn parse_selector(s: &str) -> crate::error::Result<scraper::Selector> {
    scraper::Selector::parse(s).map_err(|e| crate::error::AppError::selector(s, format!("{e:?}")))
}
