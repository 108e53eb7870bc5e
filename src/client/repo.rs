//! Workflow repository client module
//!
//! Provides `RepoClient` for making HTTP requests against a raw-content host
//! (individual workflow files) and a GitHub-style contents API (directory
//! listings). All requests share one reqwest client with a bounded timeout.

use super::Auth;
use base64::Engine;
use eyre::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upper bound on any single remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client scoped to one workflow repository.
///
/// The client addresses two endpoints:
/// - **Raw base URL**: individual files resolve as `base_url + file_name`
/// - **Listing URL** (optional): a GitHub-style contents API returning an
///   array of `{name, type, download_url}` entries
///
/// # Example
/// ```no_run
/// use flowfetch::client::{Auth, RepoClient};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let base = Url::parse("https://raw.githubusercontent.com/acme/flows/main/workflows/")?;
/// let listing = Url::parse("https://api.github.com/repos/acme/flows/contents/workflows")?;
/// let client = RepoClient::try_new(base, Some(listing), Auth::None)?;
///
/// let response = client.get_file("daily_report.json").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RepoClient {
    client: Client,
    base_url: Url,
    listing_url: Option<Url>,
    ref_name: Option<String>,
}

impl RepoClient {
    /// Create a new client with the default 10 second timeout.
    ///
    /// # Arguments
    /// * `base_url` - Raw-content prefix individual files are joined onto
    /// * `listing_url` - Contents API endpoint, if directory listing is available
    /// * `auth` - Authentication method
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the
    /// authorization header value is malformed.
    pub fn try_new(base_url: Url, listing_url: Option<Url>, auth: Auth) -> Result<Self> {
        Self::try_new_with_timeout(base_url, listing_url, auth, DEFAULT_TIMEOUT)
    }

    /// Create a new client with an explicit request timeout.
    pub fn try_new_with_timeout(
        base_url: Url,
        listing_url: Option<Url>,
        auth: Auth,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        // GitHub rejects API requests that carry no User-Agent
        headers.insert(
            reqwest::header::USER_AGENT,
            concat!("flowfetch/", env!("CARGO_PKG_VERSION")).parse()?,
        );
        match auth {
            Auth::Basic(username, password) => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                headers.append(
                    reqwest::header::AUTHORIZATION,
                    format!("Basic {}", credentials).parse()?,
                );
            }
            Auth::Token(token) => {
                headers.append(
                    reqwest::header::AUTHORIZATION,
                    format!("Bearer {}", token).parse()?,
                );
            }
            Auth::None => {}
        }
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: ensure_trailing_slash(base_url),
            listing_url,
            ref_name: None,
        })
    }

    /// Scope listing calls to a branch or tag (the contents API `ref` query).
    pub fn with_ref(mut self, ref_name: impl Into<String>) -> Self {
        self.ref_name = Some(ref_name.into());
        self
    }

    /// The raw-content base URL files are joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The contents API endpoint, if one is configured.
    pub fn listing_url(&self) -> Option<&Url> {
        self.listing_url.as_ref()
    }

    /// Resolve the full download URL for a file name.
    pub fn file_url(&self, file_name: &str) -> Result<Url> {
        self.base_url
            .join(file_name)
            .with_context(|| format!("Invalid file name: {}", file_name))
    }

    /// Fetch a single file from the raw-content host.
    ///
    /// Returns the raw response so the caller can classify the outcome;
    /// transport-level failures surface as `reqwest::Error`.
    pub async fn get_file(&self, file_name: &str) -> Result<reqwest::Response, RequestError> {
        let url = self
            .file_url(file_name)
            .map_err(|e| RequestError::InvalidName(e.to_string()))?;
        log::debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .map_err(RequestError::Transport)
    }

    /// Fetch the directory listing from the contents API.
    ///
    /// # Errors
    /// Returns an error if no listing URL is configured or the request
    /// cannot be sent. Callers treat any error here as "listing unavailable".
    pub async fn get_listing(&self) -> Result<reqwest::Response> {
        let url = self
            .listing_url
            .as_ref()
            .ok_or_else(|| eyre::eyre!("No listing URL configured"))?;
        log::debug!("GET {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(ref_name) = &self.ref_name {
            request = request.query(&[("ref", ref_name.as_str())]);
        }

        request
            .send()
            .await
            .with_context(|| format!("Failed to fetch listing from {}", url))
    }

    /// Verify connectivity to the repository.
    ///
    /// Hits the listing endpoint when one is configured, otherwise the base
    /// URL itself.
    pub async fn test_connection(&self) -> Result<reqwest::Response> {
        match &self.listing_url {
            Some(_) => self.get_listing().await,
            None => self
                .client
                .get(self.base_url.clone())
                .send()
                .await
                .with_context(|| format!("Failed to reach {}", self.base_url)),
        }
    }
}

/// Failure to issue a single-file request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The file name could not be joined onto the base URL.
    #[error("{0}")]
    InvalidName(String),
    /// The request could not complete (timeout, connect, protocol).
    #[error(transparent)]
    Transport(reqwest::Error),
}

impl std::fmt::Display for RepoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.listing_url {
            Some(listing) => write!(f, "{} (listing: {})", self.base_url, listing),
            None => write!(f, "{}", self.base_url),
        }
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
