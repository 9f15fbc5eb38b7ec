use crate::extract::{extract_links, extract_title};
use crate::fetch::PageFetcher;
use crate::normalize::normalize_url;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_MAX_PAGES: usize = 200;
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Called after each fetched page with (pages fetched so far, page URL).
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// A successfully fetched page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: Option<String>,
    pub depth: usize,
    pub status_code: u16,
}

/// Raw traversal output handed to the graph assembler. Edges may still
/// point at URLs that were discovered but never fetched; pruning those is
/// the assembler's job.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub pages: Vec<PageRecord>,
    pub visited: HashSet<String>,
    pub edges: Vec<(String, String)>,
    pub probe_status: Option<u16>,
    pub aborted: bool,
}

struct FrontierEntry {
    url: String,
    depth: usize,
}

/// Mutable traversal state. A fresh session is built for every crawl
/// invocation and dropped when it returns; nothing is shared across
/// crawls. Only the driver touches it, between batches.
struct CrawlSession {
    frontier: VecDeque<FrontierEntry>,
    pending: HashSet<String>,
    visited: HashSet<String>,
    pages: Vec<PageRecord>,
    edge_set: HashSet<(String, String)>,
    edges: Vec<(String, String)>,
}

impl CrawlSession {
    fn new() -> Self {
        Self {
            frontier: VecDeque::new(),
            pending: HashSet::new(),
            visited: HashSet::new(),
            pages: Vec::new(),
            edge_set: HashSet::new(),
            edges: Vec::new(),
        }
    }

    /// Enqueue a URL unless it was already visited or is already waiting
    /// in the frontier.
    fn enqueue(&mut self, url: String, depth: usize) {
        if self.visited.contains(&url) || self.pending.contains(&url) {
            return;
        }
        self.pending.insert(url.clone());
        self.frontier.push_back(FrontierEntry { url, depth });
    }

    /// Drain the next dispatchable batch. Entries beyond the depth cap are
    /// dropped here without being marked visited; dispatched entries are
    /// marked visited before their fetches start. The batch never exceeds
    /// the remaining page budget.
    fn next_batch(
        &mut self,
        concurrency: usize,
        max_depth: usize,
        max_pages: usize,
    ) -> Vec<FrontierEntry> {
        let budget = max_pages.saturating_sub(self.visited.len());
        let batch_size = concurrency.min(budget);

        let mut batch = Vec::new();
        while batch.len() < batch_size {
            let Some(entry) = self.frontier.pop_front() else {
                break;
            };
            self.pending.remove(&entry.url);

            if entry.depth > max_depth {
                debug!("Dropping {} at depth {} (cap {})", entry.url, entry.depth, max_depth);
                continue;
            }

            self.visited.insert(entry.url.clone());
            batch.push(entry);
        }
        batch
    }

    fn record_edge(&mut self, source: String, target: String) {
        if self.edge_set.insert((source.clone(), target.clone())) {
            self.edges.push((source, target));
        }
    }
}

/// Breadth-first site crawler with bounded depth, page count, and batch
/// concurrency. Fetches within a batch run in parallel; the driver waits
/// for the whole batch to settle before touching any shared state.
pub struct Crawler {
    fetcher: PageFetcher,
    max_depth: usize,
    max_pages: usize,
    concurrency: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Self {
        Self {
            fetcher: PageFetcher::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: DEFAULT_CONCURRENCY,
            progress_callback: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: PageFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl breadth-first from the seed URL. Never errors: an unreachable
    /// seed yields an aborted outcome, per-page failures just reduce what
    /// gets discovered.
    pub async fn crawl(&self, seed_url: &str) -> CrawlOutcome {
        let seed = normalize_url(seed_url);
        let seed_host = Url::parse(&seed)
            .ok()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_default();

        info!(
            "Starting crawl of {} (depth cap {}, page cap {}, {} concurrent fetches)",
            seed, self.max_depth, self.max_pages, self.concurrency
        );

        // Pre-flight existence probe; a dead seed aborts before traversal.
        let probe = self.fetcher.probe(&seed).await;
        if !probe.success {
            warn!(
                "Seed probe failed for {} (status {:?}), aborting crawl",
                seed, probe.status_code
            );
            return CrawlOutcome {
                probe_status: probe.status_code,
                aborted: true,
                ..Default::default()
            };
        }

        let mut session = CrawlSession::new();
        session.enqueue(seed.clone(), 0);

        while session.visited.len() < self.max_pages {
            let batch = session.next_batch(self.concurrency, self.max_depth, self.max_pages);
            if batch.is_empty() {
                break;
            }

            let fetches = batch.iter().map(|entry| {
                let fetcher = self.fetcher.clone();
                let url = entry.url.clone();
                tokio::spawn(async move { fetcher.fetch(&url).await })
            });
            let settled = join_all(fetches).await;

            // Join-then-mutate: all state changes happen here, after every
            // fetch in the batch has completed.
            for (entry, joined) in batch.iter().zip(settled) {
                let outcome = match joined {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!("Fetch task for {} failed to join: {}", entry.url, e);
                        continue;
                    }
                };

                if !outcome.success {
                    warn!(
                        "Fetch failed for {} (status {:?})",
                        entry.url, outcome.status_code
                    );
                    continue;
                }
                let Some(content) = outcome.content else {
                    continue;
                };

                session.pages.push(PageRecord {
                    url: entry.url.clone(),
                    title: extract_title(&content),
                    depth: entry.depth,
                    status_code: outcome.status_code.unwrap_or(0),
                });

                if let Some(ref callback) = self.progress_callback {
                    callback(session.pages.len(), entry.url.clone());
                }

                for link in extract_links(&content, &entry.url, &seed_host) {
                    session.record_edge(entry.url.clone(), link.clone());
                    session.enqueue(link, entry.depth + 1);
                }
            }
        }

        info!(
            "Crawl complete. Visited {} URLs, fetched {} pages, {} raw edges",
            session.visited.len(),
            session.pages.len(),
            session.edges.len()
        );

        CrawlOutcome {
            pages: session.pages,
            visited: session.visited,
            edges: session.edges,
            probe_status: probe.status_code,
            aborted: false,
        }
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}
