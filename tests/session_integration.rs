//! Integration tests for session caching, bulk loading and paging

use eyre::Result;
use flowfetch::client::{Auth, RepoClient};
use flowfetch::session::{Session, SessionConfig, ViewOptions};
use std::time::Duration;
use url::Url;

/// Build a session against the mock server, no listing endpoint
fn mock_session(server: &mockito::ServerGuard, config: SessionConfig) -> Result<Session> {
    let base_url = Url::parse(&format!("{}/workflows/", server.url()))?;
    let client = RepoClient::try_new(base_url, None, Auth::None)?;
    Ok(Session::new(client, config))
}

/// Build a session whose file list comes from the mock contents API
fn mock_session_with_listing(server: &mockito::ServerGuard) -> Result<Session> {
    let base_url = Url::parse(&format!("{}/workflows/", server.url()))?;
    let listing_url = Url::parse(&format!("{}/api/contents", server.url()))?;
    let client = RepoClient::try_new(base_url, Some(listing_url), Auth::None)?;
    Ok(Session::with_defaults(client))
}

/// An n8n-shaped workflow document with one node per listed type
fn workflow_json(name: &str, node_types: &[&str]) -> serde_json::Value {
    let nodes: Vec<serde_json::Value> = node_types
        .iter()
        .enumerate()
        .map(|(index, node_type)| {
            serde_json::json!({
                "name": format!("Node {}", index),
                "type": node_type,
                "position": [(index as i64) * 200 + 100, 300]
            })
        })
        .collect();
    serde_json::json!({"name": name, "nodes": nodes, "connections": {}})
}

fn listing_json(names: &[&str]) -> String {
    let entries: Vec<serde_json::Value> = names
        .iter()
        .map(|name| serde_json::json!({"name": name, "type": "file"}))
        .collect();
    serde_json::Value::Array(entries).to_string()
}

#[tokio::test]
async fn test_load_uses_fetch_cache() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let file = server
        .mock("GET", "/workflows/cached_flow.json")
        .with_status(200)
        .with_body(workflow_json("Cached Flow", &["n8n-nodes-base.set"]).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut session = mock_session(&server, SessionConfig::default())?;

    session.load("cached_flow.json").await?;
    session.load("cached_flow.json").await?;

    // Second load is served from the fetch cache
    file.assert_async().await;
    assert!(session.store().contains("cached_flow.json"));
    assert_eq!(session.store().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_fetch_cache_expires() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let file = server
        .mock("GET", "/workflows/stale_flow.json")
        .with_status(200)
        .with_body(workflow_json("Stale Flow", &["n8n-nodes-base.set"]).to_string())
        .expect(2)
        .create_async()
        .await;

    let config = SessionConfig {
        fetch_ttl: Duration::from_millis(50),
        ..Default::default()
    };
    let mut session = mock_session(&server, config)?;

    session.load("stale_flow.json").await?;
    tokio::time::sleep(Duration::from_millis(80)).await;
    session.load("stale_flow.json").await?;

    file.assert_async().await;

    Ok(())
}

#[tokio::test]
async fn test_bulk_load_counts_failures() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    for name in ["first_flow", "second_flow", "third_flow"] {
        server
            .mock("GET", format!("/workflows/{}.json", name).as_str())
            .with_status(200)
            .with_body(workflow_json(name, &["n8n-nodes-base.set"]).to_string())
            .create_async()
            .await;
    }
    server
        .mock("GET", "/workflows/gone_flow.json")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/workflows/error_flow.json")
        .with_status(500)
        .create_async()
        .await;

    let mut session = mock_session(&server, SessionConfig::default())?;
    let files = vec![
        "first_flow.json".to_string(),
        "second_flow.json".to_string(),
        "third_flow.json".to_string(),
        "gone_flow.json".to_string(),
        "error_flow.json".to_string(),
    ];

    let mut calls: Vec<(usize, usize)> = Vec::new();
    let report = session
        .bulk_load(&files, |completed, total| calls.push((completed, total)))
        .await;

    assert_eq!(report.total, 5);
    assert_eq!(report.loaded_count(), 3);
    assert_eq!(report.failure_count(), 2);

    // Failures are reported, never stored
    assert_eq!(session.store().len(), 3);
    assert!(!session.store().contains("gone_flow.json"));
    assert!(!session.store().contains("error_flow.json"));

    // One progress call per completed file, counts never go backwards
    assert_eq!(calls.len(), 5);
    assert_eq!(calls.last(), Some(&(5, 5)));
    assert!(calls.iter().all(|(_, total)| *total == 5));
    assert!(calls.windows(2).all(|pair| pair[0].0 <= pair[1].0));

    Ok(())
}

#[tokio::test]
async fn test_bulk_load_serves_cached_documents() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let warm = server
        .mock("GET", "/workflows/warm_flow.json")
        .with_status(200)
        .with_body(workflow_json("Warm Flow", &["n8n-nodes-base.set"]).to_string())
        .expect(1)
        .create_async()
        .await;
    let cold = server
        .mock("GET", "/workflows/cold_flow.json")
        .with_status(200)
        .with_body(workflow_json("Cold Flow", &["n8n-nodes-base.set"]).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut session = mock_session(&server, SessionConfig::default())?;
    session.load("warm_flow.json").await?;

    let files = vec!["warm_flow.json".to_string(), "cold_flow.json".to_string()];
    let report = session.bulk_load(&files, |_, _| {}).await;

    // The warmed file comes from the cache, only the cold one hits the server
    warm.assert_async().await;
    cold.assert_async().await;
    assert_eq!(report.loaded_count(), 2);
    assert_eq!(report.failure_count(), 0);
    assert_eq!(session.store().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_page_search_matches_document_name() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/contents")
        .with_status(200)
        .with_body(listing_json(&["flow_one.json", "flow_two.json"]))
        .create_async()
        .await;
    server
        .mock("GET", "/workflows/flow_one.json")
        .with_status(200)
        .with_body(workflow_json("Slack Alerts", &["n8n-nodes-base.slack"]).to_string())
        .create_async()
        .await;

    let mut session = mock_session_with_listing(&server)?;
    session.load("flow_one.json").await?;

    // "slack" appears in neither file name, only in the loaded document
    let page = session
        .page(&ViewOptions {
            query: Some("slack".to_string()),
            ..Default::default()
        })
        .await;

    assert_eq!(page.file_names, vec!["flow_one.json"]);
    assert_eq!(page.total_matches, 1);

    Ok(())
}

#[tokio::test]
async fn test_page_min_nodes_keeps_unloaded_files() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/contents")
        .with_status(200)
        .with_body(listing_json(&[
            "big_flow.json",
            "small_flow.json",
            "unseen_flow.json",
        ]))
        .create_async()
        .await;
    server
        .mock("GET", "/workflows/big_flow.json")
        .with_status(200)
        .with_body(
            workflow_json(
                "Big Flow",
                &[
                    "n8n-nodes-base.webhookTrigger",
                    "n8n-nodes-base.set",
                    "n8n-nodes-base.slack",
                ],
            )
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/workflows/small_flow.json")
        .with_status(200)
        .with_body(workflow_json("Small Flow", &["n8n-nodes-base.set"]).to_string())
        .create_async()
        .await;

    let mut session = mock_session_with_listing(&server)?;
    let files = vec!["big_flow.json".to_string(), "small_flow.json".to_string()];
    session.bulk_load(&files, |_, _| {}).await;

    // Node minimum only applies to loaded documents; unseen_flow passes through
    let page = session
        .page(&ViewOptions {
            min_nodes: 2,
            ..Default::default()
        })
        .await;

    assert_eq!(page.file_names, vec!["big_flow.json", "unseen_flow.json"]);

    Ok(())
}

#[tokio::test]
async fn test_reset_clears_store_and_caches() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let file = server
        .mock("GET", "/workflows/reset_flow.json")
        .with_status(200)
        .with_body(workflow_json("Reset Flow", &["n8n-nodes-base.set"]).to_string())
        .expect(2)
        .create_async()
        .await;

    let mut session = mock_session(&server, SessionConfig::default())?;

    session.load("reset_flow.json").await?;
    session.reset();
    assert!(session.store().is_empty());

    // With the fetch cache gone the reload goes back to the network
    session.load("reset_flow.json").await?;
    file.assert_async().await;
    assert!(session.store().contains("reset_flow.json"));

    Ok(())
}
