//! Service layer for the harvester.
//!
//! - Page rendering with timeout retry (`PageRenderer`)
//! - Result page traversal (`PaginationDriver`)
//! - Per-site query building and link extraction (`sites`)

#[cfg(feature = "browser")]
pub mod browser;
pub mod driver;
pub mod renderer;
pub mod sites;

#[cfg(feature = "browser")]
pub use browser::BrowserSource;
pub use driver::{DriveOutcome, PaginationDriver};
pub use renderer::{HttpSource, PageRenderer, PageSource, RenderedPage};
pub use sites::{Site, SiteKind, SiteOptions, build_site};
