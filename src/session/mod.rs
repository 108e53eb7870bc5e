//! Interactive session state
//!
//! One [`Session`] owns everything scoped to a user's browsing session: the
//! workflow store, the file-list cache, the per-file fetch cache, and the
//! knobs controlling pagination and parallelism. Operations go through the
//! session rather than ambient process state, so lifecycle and invalidation
//! stay explicit.

mod bulk;
mod store;
mod view;

pub use bulk::{BulkLoader, BulkReport, DEFAULT_PARALLEL};
pub use store::WorkflowStore;
pub use view::{DEFAULT_PAGE_SIZE, Page, ViewOptions, page_of};

use crate::cache::{TtlCache, TtlCell};
use crate::client::RepoClient;
use crate::workflow::{self, FetchError, WorkflowAnalysis, WorkflowFetcher, analyze};
use serde_json::Value;
use std::time::Duration;

/// How long a resolved file list stays fresh.
pub const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(300);

/// How long a fetched document stays fresh, keyed by file name.
pub const DEFAULT_FETCH_TTL: Duration = Duration::from_secs(600);

/// Session-level tuning knobs.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub page_size: usize,
    /// Worker pool width for bulk loads.
    pub parallel: usize,
    pub listing_ttl: Duration,
    pub fetch_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            parallel: DEFAULT_PARALLEL,
            listing_ttl: DEFAULT_LISTING_TTL,
            fetch_ttl: DEFAULT_FETCH_TTL,
        }
    }
}

/// Context object for one interactive session.
///
/// The two caches are independent: invalidating the file list does not
/// discard fetched documents, and vice versa. Workers never touch either
/// cache; both are consulted and populated only from session methods.
///
/// # Example
/// ```no_run
/// use flowfetch::client::{Auth, RepoClient};
/// use flowfetch::session::{Session, ViewOptions};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let base = Url::parse("https://raw.githubusercontent.com/acme/flows/main/workflows/")?;
/// let client = RepoClient::try_new(base, None, Auth::None)?;
/// let mut session = Session::with_defaults(client);
///
/// let names = session.file_list().await;
/// let report = session.bulk_load(&names, |done, total| {
///     eprintln!("{}/{}", done, total);
/// }).await;
/// println!("loaded {} of {}", report.loaded_count(), report.total);
/// # Ok(())
/// # }
/// ```
pub struct Session {
    fetcher: WorkflowFetcher,
    config: SessionConfig,
    store: WorkflowStore,
    listing_cache: TtlCell<Vec<String>>,
    fetch_cache: TtlCache<String, Value>,
}

impl Session {
    pub fn new(client: RepoClient, config: SessionConfig) -> Self {
        Self {
            fetcher: WorkflowFetcher::new(client),
            store: WorkflowStore::new(),
            listing_cache: TtlCell::new(config.listing_ttl),
            fetch_cache: TtlCache::new(config.fetch_ttl),
            config,
        }
    }

    pub fn with_defaults(client: RepoClient) -> Self {
        Self::new(client, SessionConfig::default())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &WorkflowFetcher {
        &self.fetcher
    }

    /// Documents loaded so far.
    pub fn store(&self) -> &WorkflowStore {
        &self.store
    }

    /// The resolved file list, served from cache while fresh.
    pub async fn file_list(&mut self) -> Vec<String> {
        if let Some(cached) = self.listing_cache.get() {
            return cached.clone();
        }
        let names = workflow::resolve_file_list(self.fetcher.client()).await;
        self.listing_cache.set(names.clone());
        names
    }

    /// Drop the cached file list and resolve it again.
    pub async fn refresh_file_list(&mut self) -> Vec<String> {
        self.listing_cache.invalidate();
        self.file_list().await
    }

    /// Load one workflow into the store.
    ///
    /// Serves from the fetch cache while fresh; otherwise fetches, caches,
    /// and inserts. A failure leaves both the store and the cache untouched.
    pub async fn load(&mut self, file_name: &str) -> Result<(), FetchError> {
        if let Some(document) = self.fetch_cache.get(file_name).cloned() {
            log::debug!("Fetch cache hit for {}", file_name);
            self.store.insert(file_name, document);
            return Ok(());
        }
        let document = self.fetcher.fetch(file_name).await?;
        self.fetch_cache
            .insert(file_name.to_string(), document.clone());
        self.store.insert(file_name, document);
        Ok(())
    }

    /// Remove one workflow from the store. The fetch cache keeps its copy
    /// until it expires, so a reload inside the window is local.
    pub fn unload(&mut self, file_name: &str) -> bool {
        self.store.remove(file_name).is_some()
    }

    /// Full reset: store and both caches.
    pub fn reset(&mut self) {
        self.store.clear();
        self.listing_cache.invalidate();
        self.fetch_cache.clear();
    }

    /// Drop the per-file fetch cache, forcing the next loads to refetch.
    pub fn invalidate_fetches(&mut self) {
        self.fetch_cache.clear();
    }

    /// Bulk-load workflows through the session's worker pool.
    ///
    /// Cache-fresh names are merged without a network call; the rest go
    /// through a [`BulkLoader`] bounded at `config.parallel`. The progress
    /// callback fires after every terminal outcome, cache hits included,
    /// counting toward one shared total.
    pub async fn bulk_load(
        &mut self,
        file_names: &[String],
        mut progress: impl FnMut(usize, usize),
    ) -> BulkReport {
        let total = file_names.len();
        let mut report = BulkReport {
            total,
            ..Default::default()
        };

        let mut completed = 0;
        let mut to_fetch: Vec<String> = Vec::new();
        for file_name in file_names {
            match self.fetch_cache.get(file_name).cloned() {
                Some(document) => {
                    log::debug!("Fetch cache hit for {}", file_name);
                    self.store.insert(file_name.clone(), document);
                    report.loaded.push(file_name.clone());
                    completed += 1;
                    progress(completed, total);
                }
                None => to_fetch.push(file_name.clone()),
            }
        }

        if !to_fetch.is_empty() {
            let loader =
                BulkLoader::new(self.fetcher.clone()).with_parallel(self.config.parallel);
            let fetched = loader
                .load_with_progress(&to_fetch, &mut self.store, |done, _| {
                    progress(completed + done, total)
                })
                .await;

            for file_name in &fetched.loaded {
                if let Some(document) = self.store.get(file_name) {
                    self.fetch_cache.insert(file_name.clone(), document.clone());
                }
            }
            report.loaded.extend(fetched.loaded);
            report.failures.extend(fetched.failures);
        }

        report
    }

    /// Analysis of one loaded workflow, or `None` if it is not in the store.
    pub fn analysis(&self, file_name: &str) -> Option<WorkflowAnalysis> {
        self.store.get(file_name).map(analyze)
    }

    /// One page of display results over the current file list and store.
    pub async fn page(&mut self, options: &ViewOptions) -> Page {
        let file_list = self.file_list().await;
        view::page_of(&file_list, &self.store, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Auth;
    use crate::workflow::fallback_file_list;
    use url::Url;

    fn offline_session() -> Session {
        // No listing URL and an unroutable base, so listing resolution
        // falls back without touching the network
        let base = Url::parse("http://localhost:1/workflows/").unwrap();
        let client = RepoClient::try_new(base, None, Auth::None).unwrap();
        Session::with_defaults(client)
    }

    #[test]
    fn test_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.parallel, DEFAULT_PARALLEL);
        assert_eq!(config.listing_ttl, Duration::from_secs(300));
        assert_eq!(config.fetch_ttl, Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_file_list_falls_back_without_listing() {
        let mut session = offline_session();
        assert_eq!(session.file_list().await, fallback_file_list());
    }

    #[tokio::test]
    async fn test_file_list_is_cached() {
        let mut session = offline_session();
        let first = session.file_list().await;
        let second = session.file_list().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_refresh_resolves_again() {
        let mut session = offline_session();
        session.file_list().await;
        assert_eq!(session.refresh_file_list().await, fallback_file_list());
    }

    #[test]
    fn test_unload_missing_is_false() {
        let mut session = offline_session();
        assert!(!session.unload("nope.json"));
    }

    #[test]
    fn test_analysis_of_unloaded_is_none() {
        let session = offline_session();
        assert!(session.analysis("nope.json").is_none());
    }

    #[tokio::test]
    async fn test_page_over_fallback_list() {
        let mut session = offline_session();
        let options = ViewOptions {
            page_size: 3,
            ..Default::default()
        };
        let page = session.page(&options).await;
        assert_eq!(page.file_names.len(), 3);
        assert_eq!(page.total_matches, fallback_file_list().len());
    }

    #[tokio::test]
    async fn test_reset_clears_store() {
        let mut session = offline_session();
        session.reset();
        assert!(session.store().is_empty());
    }
}
