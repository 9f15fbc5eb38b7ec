use crate::error::{Result, ScanError};
use crate::fetch::PageFetcher;
use crate::normalize::normalize_url;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Loads the set of page URLs a site's sitemap declares, for orphan
/// comparison against the crawl's visited set.
pub struct SitemapLoader {
    fetcher: PageFetcher,
}

impl SitemapLoader {
    pub fn new() -> Self {
        Self {
            fetcher: PageFetcher::new(),
        }
    }

    pub fn with_fetcher(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// One fetch plus one XML parse. Every failure mode (no URL given,
    /// network error, non-2xx, malformed XML, missing <urlset>) yields an
    /// empty set; the crawl proceeds regardless of sitemap availability.
    pub async fn load(&self, sitemap_url: Option<&str>) -> HashSet<String> {
        let Some(url) = sitemap_url else {
            return HashSet::new();
        };

        let outcome = self.fetcher.fetch(url).await;
        if !outcome.success {
            warn!(
                "Sitemap fetch failed for {} (status {:?})",
                url, outcome.status_code
            );
            return HashSet::new();
        }
        let Some(content) = outcome.content else {
            return HashSet::new();
        };

        match parse_sitemap(&content) {
            Ok(urls) => {
                debug!("Sitemap {} declared {} URLs", url, urls.len());
                urls
            }
            Err(e) => {
                warn!("Sitemap parse failed for {}: {}", url, e);
                HashSet::new()
            }
        }
    }
}

impl Default for SitemapLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the normalized <loc> values out of a <urlset> document.
fn parse_sitemap(xml: &str) -> Result<HashSet<String>> {
    let mut reader = Reader::from_reader(xml.as_bytes());

    let mut buf = Vec::new();
    let mut in_loc = false;
    let mut saw_urlset = false;
    let mut urls = HashSet::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if e.name().as_ref().ends_with(b"urlset") {
                    saw_urlset = true;
                } else if e.name().as_ref().ends_with(b"loc") {
                    in_loc = true;
                }
            }
            Event::End(e) => {
                if e.name().as_ref().ends_with(b"loc") {
                    in_loc = false;
                }
            }
            Event::Text(t) => {
                if in_loc {
                    let loc = t.unescape()?.trim().to_string();
                    if !loc.is_empty() {
                        urls.insert(normalize_url(&loc));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_urlset {
        return Err(ScanError::SitemapError(
            "document has no <urlset> element".to_string(),
        ));
    }

    Ok(urls)
}
