//! Remote file list resolution
//!
//! Resolves the candidate set of workflow file names, preferring a live
//! directory-listing call and falling back to a fixed list on any failure.
//! Listing problems degrade the list instead of erroring, so browsing
//! always has something to show.

use crate::client::RepoClient;
use eyre::{Context, Result};
use serde::Deserialize;

/// File names served when the directory listing is unavailable.
pub const FALLBACK_WORKFLOWS: [&str; 8] = [
    "advanced_slack_notifications.json",
    "daily_weather_report.json",
    "github_issue_tracker.json",
    "http_webhook_to_sheets.json",
    "rss_to_telegram.json",
    "sync_airtable_to_notion.json",
    "twitter_mention_monitor.json",
    "website_uptime_monitor.json",
];

/// One entry of a GitHub-style contents API response.
#[derive(Clone, Debug, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Resolve the ordered list of workflow file names.
///
/// Attempts the configured directory listing; on success, keeps entries of
/// kind `"file"` whose name ends in `.json`, sorted lexicographically. On
/// any failure (no listing URL, non-success status, network error, malformed
/// response) the fallback list is returned instead. Never errors.
pub async fn resolve_file_list(client: &RepoClient) -> Vec<String> {
    match fetch_listing(client).await {
        Ok(names) => {
            log::debug!("Directory listing returned {} workflow files", names.len());
            names
        }
        Err(e) => {
            log::warn!("Directory listing unavailable ({}), using fallback list", e);
            fallback_file_list()
        }
    }
}

/// The fallback list as owned names.
pub fn fallback_file_list() -> Vec<String> {
    FALLBACK_WORKFLOWS.iter().map(|name| name.to_string()).collect()
}

async fn fetch_listing(client: &RepoClient) -> Result<Vec<String>> {
    let response = client.get_listing().await?;
    let status = response.status();
    if !status.is_success() {
        eyre::bail!("listing request returned HTTP {}", status);
    }
    let entries: Vec<ListingEntry> = response
        .json()
        .await
        .context("Failed to parse listing response")?;
    Ok(file_names(entries))
}

/// Filter listing entries down to sorted workflow file names.
fn file_names(entries: Vec<ListingEntry>) -> Vec<String> {
    let mut names: Vec<String> = entries
        .into_iter()
        .filter(|entry| entry.kind == "file" && entry.name.ends_with(".json"))
        .map(|entry| entry.name)
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(name: &str, kind: &str) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            kind: kind.to_string(),
            download_url: None,
        }
    }

    #[test]
    fn test_fallback_list_is_sorted_json_names() {
        let names = fallback_file_list();
        assert_eq!(names.len(), 8);
        assert!(names.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(names.iter().all(|name| name.ends_with(".json")));
    }

    #[test]
    fn test_file_names_filters_and_sorts() {
        let entries = vec![
            entry("zeta.json", "file"),
            entry("subdir", "dir"),
            entry("README.md", "file"),
            entry("alpha.json", "file"),
        ];
        assert_eq!(file_names(entries), vec!["alpha.json", "zeta.json"]);
    }

    #[test]
    fn test_file_names_empty_listing() {
        assert!(file_names(vec![]).is_empty());
    }

    #[test]
    fn test_listing_entry_deserializes_github_shape() {
        let raw = json!({
            "name": "daily_report.json",
            "path": "workflows/daily_report.json",
            "sha": "abc123",
            "type": "file",
            "download_url": "https://raw.example.com/workflows/daily_report.json"
        });
        let parsed: ListingEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.name, "daily_report.json");
        assert_eq!(parsed.kind, "file");
        assert!(parsed.download_url.is_some());
    }

    #[test]
    fn test_listing_entry_tolerates_missing_download_url() {
        let raw = json!({"name": "x.json", "type": "file"});
        let parsed: ListingEntry = serde_json::from_value(raw).unwrap();
        assert!(parsed.download_url.is_none());
    }
}
