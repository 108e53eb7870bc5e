//! File system storage operations
//!
//! This module handles all local file I/O:
//! - Download directory writing (indented JSON)
//! - Pull manifest management

mod download;
mod manifest;

pub use download::DownloadWriter;
pub use manifest::{MANIFEST_FILE, PullEntry, PullManifest};
