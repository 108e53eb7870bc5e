//! Single workflow retrieval
//!
//! Fetches one workflow file at a time and classifies every unsuccessful
//! outcome into a [`FetchError`] naming the file. Failures are values to
//! display, not faults to propagate, and nothing here retries; retry is
//! always a user action.

use crate::client::{RepoClient, RequestError};
use serde_json::Value;
use thiserror::Error;

/// Terminal failure of one fetch attempt.
///
/// Every variant carries the file name so the failure can be reported
/// inline next to the file it belongs to.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{file}: not found (HTTP 404)")]
    NotFound { file: String },
    #[error("{file}: server returned HTTP {status}")]
    Status { file: String, status: u16 },
    #[error("{file}: request timed out")]
    Timeout { file: String },
    #[error("{file}: {message}")]
    Transport { file: String, message: String },
    #[error("{file}: invalid JSON ({message})")]
    Parse { file: String, message: String },
}

impl FetchError {
    /// The file name this failure belongs to.
    pub fn file(&self) -> &str {
        match self {
            Self::NotFound { file }
            | Self::Status { file, .. }
            | Self::Timeout { file }
            | Self::Transport { file, .. }
            | Self::Parse { file, .. } => file,
        }
    }
}

/// Fetches workflow documents from a repository.
///
/// # Example
/// ```no_run
/// use flowfetch::client::{Auth, RepoClient};
/// use flowfetch::workflow::WorkflowFetcher;
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let base = Url::parse("https://raw.githubusercontent.com/acme/flows/main/workflows/")?;
/// let client = RepoClient::try_new(base, None, Auth::None)?;
/// let fetcher = WorkflowFetcher::new(client);
///
/// match fetcher.fetch("daily_report.json").await {
///     Ok(doc) => println!("{} nodes", flowfetch::workflow::analyze(&doc).node_count),
///     Err(e) => eprintln!("{}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct WorkflowFetcher {
    client: RepoClient,
}

impl WorkflowFetcher {
    pub fn new(client: RepoClient) -> Self {
        Self { client }
    }

    /// The underlying repository client.
    pub fn client(&self) -> &RepoClient {
        &self.client
    }

    /// Fetch and parse one workflow file.
    ///
    /// Success requires an HTTP 200 and a body that parses as JSON; every
    /// other outcome maps to one [`FetchError`] variant.
    pub async fn fetch(&self, file_name: &str) -> Result<Value, FetchError> {
        let response = match self.client.get_file(file_name).await {
            Ok(response) => response,
            Err(RequestError::InvalidName(message)) => {
                return Err(FetchError::Transport {
                    file: file_name.to_string(),
                    message,
                });
            }
            Err(RequestError::Transport(e)) => return Err(classify(file_name, e)),
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                file: file_name.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                file: file_name.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| classify(file_name, e))?;
        serde_json::from_str(&body).map_err(|e| FetchError::Parse {
            file: file_name.to_string(),
            message: e.to_string(),
        })
    }
}

/// Split transport-level request errors into timeout and everything else.
fn classify(file_name: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            file: file_name.to_string(),
        }
    } else {
        FetchError::Transport {
            file: file_name.to_string(),
            message: error.to_string(),
        }
    }
}
