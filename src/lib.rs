//! Flowfetch
//!
//! A CLI for browsing, inspecting and pulling n8n workflow libraries
//! from remote repositories

pub mod cache;
pub mod cli;
pub mod client;
pub mod session;
pub mod storage;
pub mod workflow;

// Re-exports for convenience
pub use cache::{TtlCache, TtlCell};
pub use client::{Auth, AuthType, RepoClient};
pub use session::{BulkReport, Page, Session, SessionConfig, ViewOptions, WorkflowStore};
pub use storage::{DownloadWriter, PullManifest};
pub use workflow::{WorkflowAnalysis, WorkflowFetcher, analyze, resolve_file_list};
