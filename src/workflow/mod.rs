//! Workflow retrieval and analysis
//!
//! Provides file list resolution, single-file fetching with typed failure
//! values, and pure document analysis.

mod analysis;
mod fetcher;
mod listing;

pub use analysis::{UNNAMED_WORKFLOW, WorkflowAnalysis, analyze};
pub use fetcher::{FetchError, WorkflowFetcher};
pub use listing::{FALLBACK_WORKFLOWS, ListingEntry, fallback_file_list, resolve_file_list};
