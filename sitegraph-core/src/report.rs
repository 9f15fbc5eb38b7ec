use serde::{Deserialize, Serialize};

/// A page in the site link graph. Depth −1 marks a synthetic node for a
/// sitemap URL the traversal never reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNode {
    pub id: String,
    pub label: String,
    pub depth: i32,
}

/// A directed link between two crawled pages. At most one edge exists per
/// ordered (source, target) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageEdge {
    pub source: String,
    pub target: String,
}

/// The structured crawl result consumed by the reporting layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkGraphReport {
    pub nodes: Vec<PageNode>,
    pub edges: Vec<PageEdge>,
    pub orphan_pages: Vec<String>,
    pub issues: Vec<String>,
}

impl LinkGraphReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Render a human-readable summary of an audit report.
pub fn generate_text_report(report: &LinkGraphReport) -> String {
    let crawled_nodes = report.nodes.iter().filter(|n| n.depth >= 0).count();

    let mut out = String::new();
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    out.push_str("            SITEGRAPH LINK AUDIT REPORT\n");
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    out.push_str(&format!(
        "Generated:      {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Pages crawled:  {}\n", crawled_nodes));
    out.push_str(&format!("Links found:    {}\n", report.edges.len()));
    out.push_str(&format!("Orphaned pages: {}\n\n", report.orphan_pages.len()));

    out.push_str("# Issues:\n");
    for issue in &report.issues {
        out.push_str(&format!("  {}\n", issue));
    }
    out.push('\n');

    if !report.orphan_pages.is_empty() {
        out.push_str("# Orphaned pages (in sitemap, never linked):\n");
        for orphan in &report.orphan_pages {
            out.push_str(&format!("  - {}\n", orphan));
        }
        out.push('\n');
    }

    out
}
