//! Search, filtering, and pagination
//!
//! Produces the ordered subset of file names to display for one page.
//! Search matches the file name or, for loaded files, the document's own
//! name. The minimum-node filter applies only to loaded files; an unloaded
//! file has nothing to measure, so it stays visible.

use super::WorkflowStore;
use crate::workflow::analyze;
use serde_json::Value;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// User-adjustable display inputs for one page request.
#[derive(Clone, Debug)]
pub struct ViewOptions {
    /// Case-insensitive search term.
    pub query: Option<String>,
    /// Hide loaded workflows with fewer nodes than this.
    pub min_nodes: usize,
    /// Requested page index, clamped into range.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            query: None,
            min_nodes: 0,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of display results.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// File names on this page, in listing order.
    pub file_names: Vec<String>,
    /// Page index actually shown (after clamping).
    pub page: usize,
    /// Total pages; at least 1 even when nothing matches.
    pub page_count: usize,
    /// Matches across all pages.
    pub total_matches: usize,
}

impl Page {
    pub fn has_more(&self) -> bool {
        self.page + 1 < self.page_count
    }
}

/// Apply search and minimum-node filters, then slice out one page.
pub fn page_of(file_list: &[String], store: &WorkflowStore, options: &ViewOptions) -> Page {
    let matches: Vec<&String> = file_list
        .iter()
        .filter(|file_name| retain(file_name, store.get(file_name), options))
        .collect();

    let page_size = options.page_size.max(1);
    let page_count = matches.len().div_ceil(page_size).max(1);
    let page = options.page.min(page_count - 1);

    let file_names = matches
        .iter()
        .skip(page * page_size)
        .take(page_size)
        .map(|name| name.to_string())
        .collect();

    Page {
        file_names,
        page,
        page_count,
        total_matches: matches.len(),
    }
}

fn retain(file_name: &str, document: Option<&Value>, options: &ViewOptions) -> bool {
    if let Some(query) = options.query.as_deref() {
        if !matches_query(file_name, document, query) {
            return false;
        }
    }
    if options.min_nodes > 0 {
        if let Some(doc) = document {
            if analyze(doc).node_count < options.min_nodes {
                return false;
            }
        }
    }
    true
}

fn matches_query(file_name: &str, document: Option<&Value>, query: &str) -> bool {
    let query = query.to_lowercase();
    if file_name.to_lowercase().contains(&query) {
        return true;
    }
    document
        .and_then(|doc| doc.get("name"))
        .and_then(|name| name.as_str())
        .map(|name| name.to_lowercase().contains(&query))
        .unwrap_or(false)
}
