use crate::graph::assemble_graph;
use crate::report::LinkGraphReport;
use sitegraph_scanner::crawler::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES};
use sitegraph_scanner::{Crawler, ProgressCallback, SitemapLoader};
use tracing::info;

/// Options for configuring an audit run
pub struct AuditOptions {
    pub seed_url: String,
    pub sitemap_url: Option<String>,
    pub max_depth: usize,
    pub max_pages: usize,
    pub concurrency: usize,
}

impl AuditOptions {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            sitemap_url: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_sitemap_url(mut self, sitemap_url: impl Into<String>) -> Self {
        self.sitemap_url = Some(sitemap_url.into());
        self
    }
}

/// Run a full audit: sitemap load, breadth-first crawl, graph assembly.
/// Failures never escape as errors; they surface as report issues, so the
/// caller always gets a well-formed report.
pub async fn execute_audit(
    options: AuditOptions,
    progress_callback: Option<ProgressCallback>,
) -> LinkGraphReport {
    let AuditOptions {
        seed_url,
        sitemap_url,
        max_depth,
        max_pages,
        concurrency,
    } = options;

    // Sitemap load and seed probe are sequential prerequisites; they never
    // overlap with traversal concurrency.
    let sitemap_urls = SitemapLoader::new().load(sitemap_url.as_deref()).await;
    info!("Sitemap declared {} URL(s)", sitemap_urls.len());

    let mut crawler = Crawler::new()
        .with_max_depth(max_depth)
        .with_max_pages(max_pages)
        .with_concurrency(concurrency);
    if let Some(callback) = progress_callback {
        crawler = crawler.with_progress_callback(callback);
    }

    let outcome = crawler.crawl(&seed_url).await;
    assemble_graph(&outcome, &sitemap_urls, max_depth)
}
