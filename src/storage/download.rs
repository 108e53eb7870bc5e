//! Workflow download directory
//!
//! Writes fetched documents back out as indented JSON under their original
//! file names. The serialized form is a faithful round trip of what was
//! fetched; only whitespace and key order (the serializer's canonical
//! ordering) may differ from the remote bytes.

use eyre::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Writes workflow documents into one directory.
pub struct DownloadWriter {
    path: PathBuf,
}

impl DownloadWriter {
    /// Create the writer, creating the directory if needed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one document under its original file name.
    ///
    /// # Errors
    /// Returns an error if the name contains a path separator, or on
    /// serialization or I/O failure.
    pub fn write(&self, file_name: &str, document: &Value) -> Result<PathBuf> {
        // Listing names never contain separators; reject anything that does
        if file_name.contains('/') || file_name.contains('\\') {
            eyre::bail!("Refusing to write file name with path separator: {}", file_name);
        }

        let path = self.path.join(file_name);
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(&path, json)?;

        Ok(path)
    }

    /// Write several documents, returning how many were written.
    pub fn write_all<'a>(
        &self,
        documents: impl IntoIterator<Item = (&'a str, &'a Value)>,
    ) -> Result<usize> {
        let mut count = 0;
        for (file_name, document) in documents {
            self.write(file_name, document)?;
            count += 1;
        }
        Ok(count)
    }

    /// Remove all JSON files from the directory.
    pub fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                std::fs::remove_file(path)?;
            }
        }

        Ok(())
    }
}
