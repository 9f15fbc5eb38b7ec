use crate::report::{LinkGraphReport, PageEdge, PageNode};
use sitegraph_scanner::CrawlOutcome;
use std::collections::HashSet;
use tracing::debug;

/// Label given to synthetic nodes for sitemap URLs the crawl never reached.
pub const ORPHAN_LABEL: &str = "Orphan Page";

/// Build the final report from raw traversal output and the sitemap set.
///
/// Edges are pruned to pairs whose endpoints both correspond to a fetched
/// page; orphans (sitemap minus visited) get synthetic depth −1 nodes.
pub fn assemble_graph(
    outcome: &CrawlOutcome,
    sitemap_urls: &HashSet<String>,
    max_depth: usize,
) -> LinkGraphReport {
    let mut nodes: Vec<PageNode> = outcome
        .pages
        .iter()
        .map(|page| PageNode {
            id: page.url.clone(),
            label: page.title.clone().unwrap_or_else(|| page.url.clone()),
            depth: page.depth as i32,
        })
        .collect();

    let node_ids: HashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();

    // Drop edges pointing at pages that were discovered as links but
    // never successfully fetched (failed fetch, depth drop, page cap).
    let edges: Vec<PageEdge> = outcome
        .edges
        .iter()
        .filter(|(source, target)| node_ids.contains(source) && node_ids.contains(target))
        .map(|(source, target)| PageEdge {
            source: source.clone(),
            target: target.clone(),
        })
        .collect();
    debug!(
        "Pruned {} dangling edge(s)",
        outcome.edges.len() - edges.len()
    );

    let mut orphan_pages: Vec<String> = sitemap_urls
        .difference(&outcome.visited)
        .cloned()
        .collect();
    orphan_pages.sort();

    let mut issues = Vec::new();

    if outcome.pages.is_empty() {
        // An aborted crawl failed at the pre-flight probe and carries its
        // status; a crawl that passed the probe but fetched nothing did not.
        let issue = if outcome.aborted {
            let status = outcome
                .probe_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "no response".to_string());
            format!(
                "❌ Homepage fetch failed ({}). Crawl aborted before any pages were visited.",
                status
            )
        } else {
            "❌ Homepage fetch failed. No pages could be crawled.".to_string()
        };
        issues.push(issue);
        return LinkGraphReport {
            nodes: Vec::new(),
            edges: Vec::new(),
            orphan_pages,
            issues,
        };
    }

    for orphan in &orphan_pages {
        if !node_ids.contains(orphan) {
            nodes.push(PageNode {
                id: orphan.clone(),
                label: ORPHAN_LABEL.to_string(),
                depth: -1,
            });
        }
    }

    if !orphan_pages.is_empty() {
        issues.push(format!(
            "⚠️ Found {} orphaned page(s) listed in the sitemap but not linked from any crawled page.",
            orphan_pages.len()
        ));
    } else {
        issues.push("✅ No orphaned pages: every sitemap URL was reached by the crawl.".to_string());
    }
    issues.push(format!(
        "Crawled {} pages up to depth {}.",
        outcome.pages.len(),
        max_depth
    ));

    LinkGraphReport {
        nodes,
        edges,
        orphan_pages,
        issues,
    }
}
