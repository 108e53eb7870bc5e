//! Bounded parallel workflow loading
//!
//! Dispatches fetches across a fixed-width worker pool and merges successes
//! into the store as each completes. Failures are counted and reported, not
//! propagated; one bad file never aborts the rest of the batch.

use super::WorkflowStore;
use crate::workflow::{FetchError, WorkflowFetcher};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default worker pool width.
pub const DEFAULT_PARALLEL: usize = 5;

/// Outcome of one bulk load.
///
/// Completion order is whatever the scheduler yields, so `loaded` and
/// `failures` carry no ordering guarantee.
#[derive(Debug, Default)]
pub struct BulkReport {
    /// File names merged into the store.
    pub loaded: Vec<String>,
    /// Per-file failures, each naming its file.
    pub failures: Vec<FetchError>,
    /// Number of files requested.
    pub total: usize,
}

impl BulkReport {
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Width-bounded parallel loader.
///
/// # Example
/// ```no_run
/// use flowfetch::client::{Auth, RepoClient};
/// use flowfetch::session::{BulkLoader, WorkflowStore};
/// use flowfetch::workflow::WorkflowFetcher;
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let base = Url::parse("https://raw.githubusercontent.com/acme/flows/main/workflows/")?;
/// let client = RepoClient::try_new(base, None, Auth::None)?;
/// let loader = BulkLoader::new(WorkflowFetcher::new(client));
///
/// let mut store = WorkflowStore::new();
/// let names = vec!["daily_report.json".to_string(), "uptime.json".to_string()];
/// let report = loader.load(&names, &mut store).await;
/// println!("{} loaded, {} failed", report.loaded_count(), report.failure_count());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BulkLoader {
    fetcher: WorkflowFetcher,
    parallel: usize,
}

impl BulkLoader {
    pub fn new(fetcher: WorkflowFetcher) -> Self {
        Self {
            fetcher,
            parallel: DEFAULT_PARALLEL,
        }
    }

    /// Set the worker pool width (minimum 1).
    pub fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel.max(1);
        self
    }

    pub fn parallel(&self) -> usize {
        self.parallel
    }

    /// Load the named files without progress reporting.
    pub async fn load(&self, file_names: &[String], store: &mut WorkflowStore) -> BulkReport {
        self.load_with_progress(file_names, store, |_, _| {}).await
    }

    /// Load the named files, invoking `progress(completed, total)` after
    /// every terminal outcome.
    ///
    /// At most `parallel` fetches run at once. Successes merge into `store`
    /// from this task only, after the worker has finished; workers never
    /// touch the store themselves.
    pub async fn load_with_progress(
        &self,
        file_names: &[String],
        store: &mut WorkflowStore,
        mut progress: impl FnMut(usize, usize),
    ) -> BulkReport {
        let total = file_names.len();
        let mut report = BulkReport {
            total,
            ..Default::default()
        };
        if total == 0 {
            return report;
        }

        let semaphore = Arc::new(Semaphore::new(self.parallel));
        let mut set = JoinSet::new();

        for file_name in file_names {
            let fetcher = self.fetcher.clone();
            let semaphore = Arc::clone(&semaphore);
            let file_name = file_name.clone();

            set.spawn(async move {
                // Never closed, so acquire only fails if the pool is gone
                let _permit = semaphore.acquire_owned().await.ok();
                let result = fetcher.fetch(&file_name).await;
                (file_name, result)
            });
        }

        let mut completed = 0;
        while let Some(res) = set.join_next().await {
            match res {
                Ok((file_name, Ok(document))) => {
                    log::debug!("Loaded {}", file_name);
                    store.insert(file_name.clone(), document);
                    report.loaded.push(file_name);
                }
                Ok((_, Err(e))) => {
                    log::warn!("{}", e);
                    report.failures.push(e);
                }
                Err(e) => log::error!("Task panicked: {}", e),
            }
            completed += 1;
            progress(completed, total);
        }

        report
    }
}
