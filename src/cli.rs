//! CLI helper functions

use crate::{
    client::{Auth, AuthType, RepoClient},
    session::{Session, SessionConfig, ViewOptions},
    storage::{DownloadWriter, MANIFEST_FILE, PullEntry, PullManifest},
    workflow::{WorkflowAnalysis, WorkflowFetcher, analyze},
};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// Raw-content host used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/Zie619/n8n-workflows/main/workflows/";

/// Contents API paired with [`DEFAULT_BASE_URL`].
pub const DEFAULT_LISTING_URL: &str =
    "https://api.github.com/repos/Zie619/n8n-workflows/contents/workflows";

/// Load repository client from environment variables
///
/// Expected environment variables:
/// - WORKFLOWS_BASE_URL: raw-content prefix files are fetched from (optional,
///   defaults to the public workflow library)
/// - WORKFLOWS_LISTING_URL: contents API endpoint for directory listings
///   (optional; "none" disables listing so the fallback list is always used).
///   Overriding the base URL without a listing URL also disables listing
///   rather than pointing it at the wrong repository.
/// - WORKFLOWS_TOKEN: personal access token for Bearer auth (optional)
/// - WORKFLOWS_USERNAME / WORKFLOWS_PASSWORD: basic auth pair (optional,
///   ignored when a token is set)
/// - WORKFLOWS_AUTH: force the auth mode to "token", "basic" or "none"
///   instead of inferring it from which credentials are present (optional)
/// - WORKFLOWS_REF: branch or tag for listing calls (optional)
pub fn load_repo_client() -> Result<RepoClient> {
    let base_str =
        std::env::var("WORKFLOWS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let base_url = Url::parse(&base_str)
        .with_context(|| format!("Invalid WORKFLOWS_BASE_URL: {}", base_str))?;

    let listing_url = match std::env::var("WORKFLOWS_LISTING_URL") {
        Ok(raw) if raw.eq_ignore_ascii_case("none") => None,
        Ok(raw) => Some(
            Url::parse(&raw).with_context(|| format!("Invalid WORKFLOWS_LISTING_URL: {}", raw))?,
        ),
        Err(_) if base_str == DEFAULT_BASE_URL => {
            Some(Url::parse(DEFAULT_LISTING_URL).context("Invalid default listing URL")?)
        }
        Err(_) => None,
    };

    let token = std::env::var("WORKFLOWS_TOKEN").ok();
    let username = std::env::var("WORKFLOWS_USERNAME").ok();
    let password = std::env::var("WORKFLOWS_PASSWORD").ok();
    let auth_type = match std::env::var("WORKFLOWS_AUTH") {
        Ok(raw) => raw
            .parse::<AuthType>()
            .map_err(|_| eyre::eyre!("Invalid WORKFLOWS_AUTH: {}", raw))?,
        Err(_) if token.is_some() => AuthType::Token,
        Err(_) if username.is_some() && password.is_some() => AuthType::Basic,
        Err(_) => AuthType::None,
    };
    let auth = Auth::new(&auth_type, username, password, token);

    let client = RepoClient::try_new(base_url, listing_url, auth)
        .context("Failed to create repository client")?;

    Ok(match std::env::var("WORKFLOWS_REF") {
        Ok(ref_name) => client.with_ref(ref_name),
        Err(_) => client,
    })
}

/// List workflow files from the repository
///
/// Resolves the file list (live listing or fallback), applies the search
/// term, and prints one page of names.
pub async fn list_workflows(
    query: Option<String>,
    page: usize,
    page_size: usize,
    show_urls: bool,
    refresh: bool,
) -> Result<()> {
    let client = load_repo_client()?;
    log::info!("Repository: {}", client);
    let mut session = Session::with_defaults(client);

    let file_list = if refresh {
        log::info!("Refreshing file list...");
        session.refresh_file_list().await
    } else {
        session.file_list().await
    };
    log::info!("Resolved {} workflow file(s)", file_list.len());

    let options = ViewOptions {
        query,
        min_nodes: 0,
        page,
        page_size,
    };
    let page = session.page(&options).await;

    for file_name in &page.file_names {
        if show_urls {
            let url = session.fetcher().client().file_url(file_name)?;
            println!("{}  {}", file_name.green(), url.to_string().bright_black());
        } else {
            println!("{}", file_name.green());
        }
    }

    println!(
        "{}",
        format!(
            "Page {} of {} ({} matching)",
            page.page + 1,
            page.page_count,
            page.total_matches
        )
        .bright_black()
    );

    Ok(())
}

/// Fetch and analyze named workflow files
///
/// Each file is fetched independently; a failure is reported inline and
/// does not affect the others. With `as_json` the successful analyses are
/// printed as one JSON object keyed by file name.
pub async fn inspect_workflows(files: Vec<String>, as_json: bool) -> Result<usize> {
    let client = load_repo_client()?;
    log::info!("Repository: {}", client);
    let fetcher = WorkflowFetcher::new(client);

    let mut analyses: BTreeMap<String, WorkflowAnalysis> = BTreeMap::new();
    let mut failures = 0;

    for file_name in &files {
        match fetcher.fetch(file_name).await {
            Ok(document) => {
                let analysis = analyze(&document);
                if !as_json {
                    print_analysis(file_name, &analysis);
                }
                analyses.insert(file_name.clone(), analysis);
            }
            Err(e) => {
                failures += 1;
                log::error!("{}", e);
            }
        }
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&analyses)?);
    }

    let inspected = analyses.len();
    log::info!("✓ Inspected {} workflow(s)", inspected);
    if failures > 0 {
        log::warn!("{} of {} file(s) failed", failures, files.len());
    }

    Ok(inspected)
}

fn print_analysis(file_name: &str, analysis: &WorkflowAnalysis) {
    println!("{} ({})", analysis.name.cyan(), file_name.green());
    println!(
        "  nodes: {}  connections: {}  trigger: {}",
        analysis.node_count,
        analysis.connection_count,
        if analysis.has_trigger { "yes" } else { "no" }
    );
    if !analysis.node_types.is_empty() {
        let types: Vec<&str> = analysis.node_types.iter().map(String::as_str).collect();
        println!("  types: {}", types.join(", "));
    }
    if !analysis.tags.is_empty() {
        println!("  tags: {}", analysis.tags.join(", "));
    }
    if let Some(updated) = &analysis.updated_at {
        println!("  updated: {}", updated.bright_black());
    }
}

/// Pull workflows from the repository to a local directory
///
/// Resolves the file list, filters it by name, bulk loads the matches,
/// applies the node-count minimum, then writes JSON files and a pull
/// manifest.
pub async fn pull_workflows(
    output_dir: impl AsRef<Path>,
    query: Option<String>,
    min_nodes: usize,
    parallel: usize,
    refresh: bool,
) -> Result<usize> {
    let output_dir = output_dir.as_ref();

    let client = load_repo_client()?;
    log::info!("Repository: {}", client);
    let source = client.base_url().to_string();

    let config = SessionConfig {
        parallel: parallel.max(1),
        ..Default::default()
    };
    let mut session = Session::new(client, config);

    let file_list = if refresh {
        log::info!("Refreshing file list...");
        session.refresh_file_list().await
    } else {
        session.file_list().await
    };
    log::info!("Resolved {} workflow file(s)", file_list.len());

    // Name filter up front; document names are not loaded yet
    let targets: Vec<String> = match &query {
        Some(term) => {
            let term = term.to_lowercase();
            file_list
                .into_iter()
                .filter(|name| name.to_lowercase().contains(&term))
                .collect()
        }
        None => file_list,
    };

    if targets.is_empty() {
        log::warn!("No workflow files match, nothing to pull");
        return Ok(0);
    }

    log::info!(
        "Fetching {} workflow(s) with {} worker(s)...",
        targets.len(),
        session.config().parallel
    );
    let report = session
        .bulk_load(&targets, |completed, total| {
            log::debug!("{}/{} complete", completed, total);
        })
        .await;

    for failure in &report.failures {
        log::warn!("{}", failure);
    }

    let mut kept = report.loaded.clone();
    kept.sort();
    if min_nodes > 0 {
        kept.retain(|name| {
            session
                .analysis(name)
                .map(|analysis| analysis.node_count >= min_nodes)
                .unwrap_or(false)
        });
        log::info!(
            "{} workflow(s) meet the {}-node minimum",
            kept.len(),
            min_nodes
        );
    }

    let writer = DownloadWriter::new(output_dir)?;
    let mut manifest = PullManifest::new(&source);

    let mut count = 0;
    for file_name in &kept {
        if let Some(document) = session.store().get(file_name) {
            writer.write(file_name, document)?;
            manifest.add(PullEntry::new(file_name.clone(), analyze(document).name));
            log::debug!("Wrote {}", file_name);
            count += 1;
        }
    }
    manifest.write(output_dir.join(MANIFEST_FILE))?;

    log::info!("✓ Pulled {} workflow(s) to {}", count, output_dir.display());
    if report.failure_count() > 0 {
        log::warn!("{} fetch(es) failed", report.failure_count());
    }

    Ok(count)
}

/// Verify connectivity and authorization against the repository
pub async fn check_connection() -> Result<()> {
    let client = load_repo_client()?;
    log::info!("Repository: {}", client);

    let response = client.test_connection().await?;
    let status = response.status();

    if let Some(remaining) = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
    {
        log::info!("API rate limit remaining: {}", remaining);
    }

    if status.is_success() {
        log::info!("✓ Connection OK ({})", status);
        return Ok(());
    }
    if status.as_u16() == 401 || status.as_u16() == 403 {
        eyre::bail!(
            "Authorization failed ({}): check WORKFLOWS_TOKEN or rate limits",
            status
        );
    }
    eyre::bail!("Connection check failed: HTTP {}", status)
}
