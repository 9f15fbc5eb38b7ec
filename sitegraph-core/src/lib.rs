pub mod audit;
pub mod graph;
pub mod report;

pub use audit::{AuditOptions, execute_audit};
pub use graph::assemble_graph;
pub use report::{LinkGraphReport, PageEdge, PageNode, generate_text_report};
