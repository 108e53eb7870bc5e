//! Workflow document analysis
//!
//! Derives summary attributes from a parsed workflow document. Analysis is
//! a pure read-only view: missing or oddly shaped fields fall back to empty
//! defaults instead of erroring, so any syntactically valid JSON document
//! can be analyzed.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Sentinel name for documents without a usable `name` field.
pub const UNNAMED_WORKFLOW: &str = "Unnamed Workflow";

/// Summary attributes derived from one workflow document.
///
/// Recomputed on demand and never persisted; the backing document in the
/// store stays authoritative.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorkflowAnalysis {
    /// Workflow display name, or [`UNNAMED_WORKFLOW`] when absent.
    pub name: String,
    /// Number of entries in the `nodes` array.
    pub node_count: usize,
    /// Number of top-level entries in `connections`.
    pub connection_count: usize,
    /// Whether any node matches the trigger heuristic.
    pub has_trigger: bool,
    /// Distinct node `type` strings, duplicates collapsed.
    pub node_types: BTreeSet<String>,
    /// Pass-through of the document's string tags.
    pub tags: Vec<String>,
    /// Pass-through of `createdAt`, when present.
    pub created_at: Option<String>,
    /// Pass-through of `updatedAt`, when present.
    pub updated_at: Option<String>,
}

/// Analyze a parsed workflow document.
///
/// # Arguments
/// * `doc` - Any parsed JSON value; non-object documents yield all defaults
///
/// # Example
/// ```
/// use flowfetch::workflow::analyze;
/// use serde_json::json;
///
/// let doc = json!({
///     "name": "Daily report",
///     "nodes": [{"type": "cronTrigger"}, {"type": "set"}],
///     "connections": {"Cron": {}}
/// });
/// let analysis = analyze(&doc);
/// assert_eq!(analysis.node_count, 2);
/// assert!(analysis.has_trigger);
/// ```
pub fn analyze(doc: &Value) -> WorkflowAnalysis {
    let nodes = doc
        .get("nodes")
        .and_then(|v| v.as_array())
        .map(|v| v.as_slice())
        .unwrap_or_default();

    let name = doc
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(UNNAMED_WORKFLOW)
        .to_string();

    let connection_count = match doc.get("connections") {
        Some(Value::Object(map)) => map.len(),
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    };

    let node_types = nodes
        .iter()
        .filter_map(|node| node.get("type").and_then(|v| v.as_str()))
        .map(String::from)
        .collect();

    let tags = doc
        .get("tags")
        .and_then(|v| v.as_array())
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| tag.as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    WorkflowAnalysis {
        name,
        node_count: nodes.len(),
        connection_count,
        has_trigger: nodes.iter().any(is_trigger),
        node_types,
        tags,
        created_at: string_field(doc, "createdAt"),
        updated_at: string_field(doc, "updatedAt"),
    }
}

/// A node counts as a trigger if its `type` contains "trigger"
/// (case-insensitive) or its `position` is exactly `[0, 0]`. The position
/// check is a heuristic carried over from the source data, where entry
/// nodes sit at the canvas origin.
fn is_trigger(node: &Value) -> bool {
    let type_matches = node
        .get("type")
        .and_then(|v| v.as_str())
        .map(|node_type| node_type.to_lowercase().contains("trigger"))
        .unwrap_or(false);

    type_matches || position_is_origin(node)
}

fn position_is_origin(node: &Value) -> bool {
    match node.get("position").and_then(|v| v.as_array()) {
        Some(pair) if pair.len() == 2 => pair.iter().all(|value| value.as_f64() == Some(0.0)),
        _ => false,
    }
}

fn string_field(doc: &Value, key: &str) -> Option<String> {
    doc.get(key).and_then(|v| v.as_str()).map(String::from)
}
