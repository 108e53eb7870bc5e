//! Pull manifest management
//!
//! Every pull writes a `workflows.yml` next to the downloaded files,
//! recording where they came from and what they contained.
//!
//! Example format:
//! ```yaml
//! source: https://raw.githubusercontent.com/acme/flows/main/workflows/
//! workflows:
//!   - file: daily_weather_report.json
//!     name: Daily Weather Report
//!   - file: website_uptime_monitor.json
//!     name: Website Uptime Monitor
//! ```

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default manifest file name within a download directory.
pub const MANIFEST_FILE: &str = "workflows.yml";

/// One downloaded workflow in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullEntry {
    /// File name as listed remotely (also the local file name)
    pub file: String,
    /// Workflow display name at pull time
    pub name: String,
}

impl PullEntry {
    pub fn new(file: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }
}

/// Record of one pull operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullManifest {
    /// Base URL the workflows were fetched from
    pub source: String,
    /// Downloaded workflows
    pub workflows: Vec<PullEntry>,
}

impl PullManifest {
    /// Create an empty manifest for a source URL.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            workflows: Vec::new(),
        }
    }

    /// Add an entry unless its file name is already recorded.
    pub fn add(&mut self, entry: PullEntry) {
        if !self.workflows.iter().any(|w| w.file == entry.file) {
            self.workflows.push(entry);
        }
    }

    /// Remove an entry by file name.
    pub fn remove(&mut self, file: &str) -> bool {
        if let Some(pos) = self.workflows.iter().position(|w| w.file == file) {
            self.workflows.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, file: &str) -> bool {
        self.workflows.iter().any(|w| w.file == file)
    }

    pub fn get(&self, file: &str) -> Option<&PullEntry> {
        self.workflows.iter().find(|w| w.file == file)
    }

    pub fn count(&self) -> usize {
        self.workflows.len()
    }

    /// Read a manifest from a YAML file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read pull manifest: {}", path.as_ref().display())
        })?;

        let manifest: Self =
            serde_yaml::from_str(&content).with_context(|| "Failed to parse pull manifest YAML")?;

        Ok(manifest)
    }

    /// Write the manifest to a YAML file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .with_context(|| "Failed to serialize pull manifest to YAML")?;

        std::fs::write(path.as_ref(), yaml).with_context(|| {
            format!("Failed to write pull manifest: {}", path.as_ref().display())
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_manifest() {
        let manifest = PullManifest::new("https://example.com/workflows/");
        assert_eq!(manifest.count(), 0);
        assert_eq!(manifest.source, "https://example.com/workflows/");
    }

    #[test]
    fn test_add_deduplicates_by_file() {
        let mut manifest = PullManifest::new("https://example.com/");
        manifest.add(PullEntry::new("a.json", "Alpha"));
        manifest.add(PullEntry::new("a.json", "Alpha again"));

        assert_eq!(manifest.count(), 1);
        assert_eq!(manifest.get("a.json").unwrap().name, "Alpha");
    }

    #[test]
    fn test_remove() {
        let mut manifest = PullManifest::new("https://example.com/");
        manifest.add(PullEntry::new("a.json", "Alpha"));

        assert!(manifest.remove("a.json"));
        assert!(!manifest.contains("a.json"));
        assert!(!manifest.remove("a.json"));
    }

    #[test]
    fn test_read_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("downloads").join(MANIFEST_FILE);

        let mut original = PullManifest::new("https://example.com/workflows/");
        original.add(PullEntry::new("a.json", "Alpha"));
        original.add(PullEntry::new("b.json", "Beta"));

        original.write(&path).unwrap();
        assert!(path.exists());

        let loaded = PullManifest::read(&path).unwrap();
        assert_eq!(loaded, original);
        assert_eq!(loaded.count(), 2);
    }

    #[test]
    fn test_yaml_format() {
        let mut manifest = PullManifest::new("https://example.com/workflows/");
        manifest.add(PullEntry::new("a.json", "Alpha"));
        let yaml = serde_yaml::to_string(&manifest).unwrap();

        assert!(yaml.contains("source: https://example.com/workflows/"));
        assert!(yaml.contains("workflows:"));
        assert!(yaml.contains("file: a.json"));
        assert!(yaml.contains("name: Alpha"));
    }

    #[test]
    fn test_read_missing_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let result = PullManifest::read(temp_dir.path().join("absent.yml"));
        assert!(result.is_err());
    }
}
