use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sitegraph_core::audit::{AuditOptions, execute_audit};
use sitegraph_core::report::generate_text_report;
use sitegraph_scanner::crawler::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sitegraph", version, about = "Crawl a site and audit its link graph")]
struct Args {
    /// Seed URL to start crawling from
    url: String,

    /// Sitemap URL to cross-reference for orphaned pages
    #[arg(long)]
    sitemap: Option<String>,

    /// Maximum link depth to follow from the seed
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: usize,

    /// Maximum number of pages to visit
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Concurrent fetches per batch
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Suppress the progress spinner
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Spinner only for interactive text output; JSON stays clean.
    let progress_bar = if !args.quiet && args.format != "json" {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let progress_callback = progress_bar.clone().map(|pb| {
        let callback: sitegraph_scanner::ProgressCallback = Arc::new(move |count, url| {
            pb.set_message(format!("Crawling... {} pages fetched ({})", count, url));
            pb.tick();
        });
        callback
    });

    let options = AuditOptions {
        seed_url: args.url,
        sitemap_url: args.sitemap,
        max_depth: args.depth,
        max_pages: args.max_pages,
        concurrency: args.concurrency,
    };

    let report = execute_audit(options, progress_callback).await;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    match args.format.as_str() {
        "json" => println!("{}", report.to_json()?),
        _ => print!("{}", generate_text_report(&report)),
    }

    Ok(())
}
