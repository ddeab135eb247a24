//! News link harvester CLI
//!
//! Collects article links from a news site's search results or daily
//! archive and prints them one per line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use news_harvester::{
    error::Result,
    models::{Config, DateRange},
    pipeline::{HarvestRequest, Harvester, LinkSource},
    services::{SiteKind, SiteOptions, build_site},
};

/// Harvest article links from news site searches
#[derive(Parser, Debug)]
#[command(name = "harvester", version, about = "Paginated news link harvester")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect links for a query
    Harvest(HarvestArgs),

    /// Validate the configuration file
    Validate,
}

#[derive(Args, Debug)]
struct HarvestArgs {
    /// Site to search: npr, nyt, wapo or buzzfeed
    #[arg(long)]
    site: SiteKind,

    /// Search query
    #[arg(short, long)]
    query: String,

    /// Reuse links from an existing file instead of fetching
    #[arg(long)]
    link_file: Option<PathBuf>,

    /// Date range as "mm/dd/yyyy mm/dd/yyyy"
    #[arg(long)]
    date_range: Option<String>,

    /// Recency window (site-specific: hours, days or a start year)
    #[arg(long)]
    from_last: Option<u32>,

    #[arg(long)]
    section: Option<String>,

    #[arg(long)]
    doc_type: Option<String>,

    #[arg(long)]
    sort_by: Option<String>,

    #[arg(long)]
    blog_id: Option<String>,

    /// Seconds to wait before each page request
    #[arg(long)]
    sleep_time: Option<u64>,

    /// Seconds before a page load is retried
    #[arg(long)]
    page_timeout: Option<u64>,

    /// Highest result page to visit
    #[arg(long)]
    max_pages: Option<u32>,

    /// Write links here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl HarvestArgs {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(secs) = self.sleep_time {
            config.harvest.sleep_secs = secs;
        }
        if let Some(secs) = self.page_timeout {
            config.renderer.page_timeout_secs = secs;
        }
        if let Some(max) = self.max_pages {
            config.harvest.max_pages = max;
        }
    }

    fn site_options(&self, date_range: Option<DateRange>) -> SiteOptions {
        SiteOptions {
            query: self.query.clone(),
            from_last: self.from_last,
            section: self.section.clone(),
            doc_type: self.doc_type.clone(),
            sort_by: self.sort_by.clone(),
            blog_id: self.blog_id.clone(),
            date_range,
        }
    }
}

/// Initialize logging. `RUST_LOG` takes precedence over `level`.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn write_links(links: &[String], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut content = links.join("\n");
            content.push('\n');
            tokio::fs::write(path, content).await?;
            log::info!("Wrote {} links to {}", links.len(), path.display());
        }
        None => {
            for link in links {
                println!("{link}");
            }
        }
    }
    Ok(())
}

async fn harvest(mut config: Config, args: HarvestArgs) -> Result<()> {
    args.apply_overrides(&mut config);
    config.validate()?;

    let date_range = args.date_range.as_deref().map(DateRange::parse).transpose()?;
    let site = build_site(args.site, &args.site_options(date_range))?;

    let harvester = Harvester::from_config(Arc::new(config))?;
    let request = HarvestRequest {
        link_file: args.link_file.clone(),
    };
    let outcome = harvester.harvest(site.as_ref(), &request).await?;

    if let LinkSource::Live { log: log_path } = &outcome.source {
        log::info!(
            "Visited {} result pages ({:?}), link log at {}",
            outcome.descriptors_visited,
            outcome.stop_reason,
            log_path.display()
        );
    }
    log::debug!(
        "Harvest took {}s",
        (outcome.finished_at - outcome.started_at).num_seconds()
    );

    write_links(&outcome.links, args.output.as_deref()).await
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = match (&loaded, cli.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(config), false) => config.logging.level.clone(),
        (Err(_), false) => "info".to_string(),
    };
    init_logging(&level);

    let config = match loaded {
        Ok(config) => {
            log::info!("Loaded configuration from {}", cli.config.display());
            config
        }
        Err(e) => {
            log::warn!("Failed to load config from {}: {}", cli.config.display(), e);
            log::warn!("Using default configuration.");
            Config::default()
        }
    };

    match cli.command {
        Command::Harvest(args) => harvest(config, args).await?,
        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK");
        }
    }

    Ok(())
}
