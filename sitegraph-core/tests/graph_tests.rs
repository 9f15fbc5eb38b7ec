// Tests for link-graph assembly

use sitegraph_core::graph::{ORPHAN_LABEL, assemble_graph};
use sitegraph_scanner::crawler::{CrawlOutcome, PageRecord};
use std::collections::HashSet;

fn page(url: &str, title: &str, depth: usize) -> PageRecord {
    PageRecord {
        url: url.to_string(),
        title: Some(title.to_string()),
        depth,
        status_code: 200,
    }
}

fn edge(source: &str, target: &str) -> (String, String) {
    (source.to_string(), target.to_string())
}

fn outcome_with(pages: Vec<PageRecord>, edges: Vec<(String, String)>) -> CrawlOutcome {
    let visited: HashSet<String> = pages.iter().map(|p| p.url.clone()).collect();
    CrawlOutcome {
        pages,
        visited,
        edges,
        probe_status: Some(200),
        aborted: false,
    }
}

#[test]
fn test_nodes_from_fetched_pages() {
    let outcome = outcome_with(
        vec![
            page("https://example.com", "Home", 0),
            page("https://example.com/a", "A", 1),
        ],
        vec![edge("https://example.com", "https://example.com/a")],
    );

    let report = assemble_graph(&outcome, &HashSet::new(), 3);

    assert_eq!(report.nodes.len(), 2);
    assert_eq!(report.nodes[0].id, "https://example.com");
    assert_eq!(report.nodes[0].label, "Home");
    assert_eq!(report.nodes[0].depth, 0);
    assert_eq!(report.edges.len(), 1);
}

#[test]
fn test_missing_title_falls_back_to_url() {
    let mut record = page("https://example.com", "x", 0);
    record.title = None;
    let outcome = outcome_with(vec![record], vec![]);

    let report = assemble_graph(&outcome, &HashSet::new(), 3);

    assert_eq!(report.nodes[0].label, "https://example.com");
}

#[test]
fn test_dangling_edges_are_pruned() {
    let outcome = outcome_with(
        vec![page("https://example.com", "Home", 0)],
        vec![
            edge("https://example.com", "https://example.com/never-fetched"),
            edge("https://example.com/never-fetched", "https://example.com"),
        ],
    );

    let report = assemble_graph(&outcome, &HashSet::new(), 3);

    assert!(report.edges.is_empty());
    // Edge validity: every surviving edge endpoint is a node id.
    let ids: HashSet<&str> = report.nodes.iter().map(|n| n.id.as_str()).collect();
    for e in &report.edges {
        assert!(ids.contains(e.source.as_str()));
        assert!(ids.contains(e.target.as_str()));
    }
}

#[test]
fn test_orphans_get_synthetic_nodes() {
    let outcome = outcome_with(vec![page("https://example.com", "Home", 0)], vec![]);
    let sitemap: HashSet<String> = [
        "https://example.com".to_string(),
        "https://example.com/hidden".to_string(),
    ]
    .into_iter()
    .collect();

    let report = assemble_graph(&outcome, &sitemap, 3);

    assert_eq!(report.orphan_pages, vec!["https://example.com/hidden"]);
    let orphan_node = report
        .nodes
        .iter()
        .find(|n| n.id == "https://example.com/hidden")
        .expect("synthetic orphan node");
    assert_eq!(orphan_node.label, ORPHAN_LABEL);
    assert_eq!(orphan_node.depth, -1);

    assert!(report.issues[0].contains("1 orphaned page"));
    assert!(report.issues[0].starts_with('⚠'));
}

#[test]
fn test_orphan_correctness_against_sitemap() {
    let outcome = outcome_with(
        vec![
            page("https://example.com", "Home", 0),
            page("https://example.com/a", "A", 1),
        ],
        vec![],
    );
    let sitemap: HashSet<String> = [
        "https://example.com".to_string(),
        "https://example.com/a".to_string(),
        "https://example.com/b".to_string(),
        "https://example.com/c".to_string(),
    ]
    .into_iter()
    .collect();

    let report = assemble_graph(&outcome, &sitemap, 3);

    // Every orphan is in the sitemap and not visited; every sitemap URL
    // not reported as orphan was visited.
    for orphan in &report.orphan_pages {
        assert!(sitemap.contains(orphan));
        assert!(!outcome.visited.contains(orphan));
    }
    for url in &sitemap {
        if !report.orphan_pages.contains(url) {
            assert!(outcome.visited.contains(url));
        }
    }
    // Sorted for deterministic output.
    assert_eq!(
        report.orphan_pages,
        vec!["https://example.com/b", "https://example.com/c"]
    );
}

#[test]
fn test_no_orphans_yields_confirmation_issue() {
    let outcome = outcome_with(vec![page("https://example.com", "Home", 0)], vec![]);
    let sitemap: HashSet<String> = ["https://example.com".to_string()].into_iter().collect();

    let report = assemble_graph(&outcome, &sitemap, 3);

    assert!(report.orphan_pages.is_empty());
    assert!(report.issues[0].starts_with('✅'));
    assert_eq!(report.issues[1], "Crawled 1 pages up to depth 3.");
}

#[test]
fn test_aborted_crawl_yields_single_fatal_issue() {
    let outcome = CrawlOutcome {
        probe_status: Some(500),
        aborted: true,
        ..Default::default()
    };
    let sitemap: HashSet<String> = ["https://example.com/only".to_string()]
        .into_iter()
        .collect();

    let report = assemble_graph(&outcome, &sitemap, 3);

    assert!(report.nodes.is_empty());
    assert!(report.edges.is_empty());
    assert_eq!(report.orphan_pages, vec!["https://example.com/only"]);
    assert_eq!(report.issues.len(), 1);
    assert!(report.issues[0].starts_with("❌ Homepage fetch failed (500)"));
}

#[test]
fn test_empty_crawl_after_passing_probe_omits_probe_status() {
    // Probe answered 200 but the seed fetch itself then failed; the fatal
    // issue must not claim the passing probe's status.
    let outcome = CrawlOutcome {
        probe_status: Some(200),
        aborted: false,
        ..Default::default()
    };

    let report = assemble_graph(&outcome, &HashSet::new(), 3);

    assert!(report.nodes.is_empty());
    assert_eq!(report.issues.len(), 1);
    assert!(report.issues[0].starts_with("❌ Homepage fetch failed."));
    assert!(!report.issues[0].contains("200"));
}

#[test]
fn test_aborted_crawl_without_status() {
    let outcome = CrawlOutcome {
        aborted: true,
        ..Default::default()
    };

    let report = assemble_graph(&outcome, &HashSet::new(), 3);

    assert_eq!(report.issues.len(), 1);
    assert!(report.issues[0].contains("no response"));
}

#[test]
fn test_summary_issue_is_always_last() {
    let outcome = outcome_with(
        vec![
            page("https://example.com", "Home", 0),
            page("https://example.com/a", "A", 1),
            page("https://example.com/b", "B", 2),
        ],
        vec![],
    );

    let report = assemble_graph(&outcome, &HashSet::new(), 2);

    assert_eq!(
        report.issues.last().map(String::as_str),
        Some("Crawled 3 pages up to depth 2.")
    );
}
