//! Pipeline entry points for harvester operations.
//!
//! - `Harvester`: load a saved link file or collect links live from a site

pub mod harvest;

pub use harvest::{HarvestOutcome, HarvestRequest, Harvester, LinkSource};
