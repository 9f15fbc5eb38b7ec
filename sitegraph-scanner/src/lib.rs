pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod sitemap;

pub use crawler::{CrawlOutcome, Crawler, PageRecord, ProgressCallback};
pub use error::ScanError;
pub use fetch::{FetchOutcome, PageFetcher, ProbeOutcome};
pub use normalize::normalize_url;
pub use sitemap::SitemapLoader;
