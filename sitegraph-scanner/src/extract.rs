use crate::normalize::normalize_url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Linked resources that are not pages in the logical site graph.
#[rustfmt::skip]
const ASSET_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "webp", "ico", "bmp",   // images
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",         // documents
    "zip", "rar", "tar", "gz", "7z",                            // archives
    "mp4", "webm", "avi", "mov", "mkv",                         // video
];

/// Extract the set of normalized same-origin page links from a fetched
/// document. Malformed hrefs are skipped, never fatal; assets and
/// off-origin links are filtered out.
pub fn extract_links(html: &str, page_url: &str, seed_host: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").unwrap();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(resolved) = resolve_href(page_url, href) else {
            continue;
        };

        if !is_same_host(&resolved, seed_host) {
            debug!("Skipping off-origin link {}", resolved);
            continue;
        }
        if is_asset_url(&resolved) {
            debug!("Skipping asset link {}", resolved);
            continue;
        }

        let normalized = normalize_url(resolved.as_str());
        if seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }

    links
}

/// First non-empty <title> text of a document, if any.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").unwrap();

    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

fn resolve_href(base: &str, href: &str) -> Option<Url> {
    // Skip empty, javascript:, mailto:, tel:, and bare fragments
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
    {
        return None;
    }

    let base_url = Url::parse(base).ok()?;
    base_url.join(href).ok()
}

fn is_same_host(url: &Url, seed_host: &str) -> bool {
    url.host_str().map(|h| h == seed_host).unwrap_or(false)
}

fn is_asset_url(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    match path.rsplit_once('.') {
        Some((_, ext)) => ASSET_EXTENSIONS.contains(&ext),
        None => false,
    }
}
