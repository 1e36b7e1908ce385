//! Alert source client and pipeline tests with mocked GitHub responses

use std::sync::Arc;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use vulnwatch::application::errors::AlertSourceError;
use vulnwatch::application::{AlertScanService, AlertScanServiceImpl, ReportService, ReportServiceImpl};
use vulnwatch::domain::Severity;
use vulnwatch::infrastructure::api_clients::{AlertSourceClient, DependabotAlertClient};
use vulnwatch::infrastructure::repositories::ScanningAlertRepository;

fn client_for(server: &ServerGuard) -> DependabotAlertClient {
    DependabotAlertClient::from_token("test-token".to_string(), Some(server.url()), 5)
        .expect("client builds")
}

fn repo_json(owner: &str, name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "owner": { "login": owner },
        "full_name": format!("{}/{}", owner, name),
        "private": false
    })
}

fn lodash_alert_json() -> serde_json::Value {
    json!({
        "number": 7,
        "state": "open",
        "security_advisory": {
            "severity": "critical",
            "cve_id": "CVE-2021-23337",
            "ghsa_id": "GHSA-35jh-r3h4-6jhm",
            "summary": "Command injection in lodash"
        },
        "security_vulnerability": {
            "package": { "name": "lodash", "ecosystem": "npm" },
            "vulnerable_version_range": "< 4.17.21",
            "first_patched_version": { "identifier": "4.17.21" }
        },
        "html_url": "https://github.com/acme/api/security/dependabot/7",
        "created_at": "2024-03-02T09:30:00Z"
    })
}

async fn mock_page(
    server: &mut ServerGuard,
    path: &str,
    page: &str,
    body: serde_json::Value,
) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("page".into(), page.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn lists_repositories_across_pages() {
    let mut server = Server::new_async().await;
    mock_page(
        &mut server,
        "/user/repos",
        "1",
        json!([repo_json("acme", "api"), repo_json("acme", "web")]),
    )
    .await;
    mock_page(&mut server, "/user/repos", "2", json!([])).await;

    let client = client_for(&server);
    let repos = client.list_repositories().await.expect("listing ok");

    let names: Vec<String> = repos.iter().map(|r| r.full_name()).collect();
    assert_eq!(names, vec!["acme/api", "acme/web"]);
}

#[tokio::test]
async fn listing_failure_is_a_transport_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/user/repos")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(json!({ "message": "boom" }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.list_repositories().await;
    assert!(matches!(result, Err(AlertSourceError::Transport(_))));
}

#[tokio::test]
async fn disabled_alerts_yield_empty_without_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/acme/web/dependabot/alerts")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "message": "Dependabot alerts are disabled for this repository.",
                "documentation_url": "https://docs.github.com/rest"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let alerts = client.fetch_open_alerts("acme", "web").await;
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn server_error_on_one_repository_yields_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/acme/web/dependabot/alerts")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(json!({ "message": "boom" }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let alerts = client.fetch_open_alerts("acme", "web").await;
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn fetches_open_alerts_across_pages() {
    let mut server = Server::new_async().await;
    let path = "/repos/acme/api/dependabot/alerts";
    mock_page(&mut server, path, "1", json!([lodash_alert_json()])).await;
    mock_page(&mut server, path, "2", json!([])).await;

    let client = client_for(&server);
    let alerts = client.fetch_open_alerts("acme", "api").await;
    assert_eq!(alerts.len(), 1);
}

/// End to end: one repository with an alert, one with the feature
/// disabled. The inaccessible repository must not abort the scan or
/// leak into the report.
#[tokio::test]
async fn scan_isolates_inaccessible_repositories() {
    let mut server = Server::new_async().await;
    mock_page(
        &mut server,
        "/user/repos",
        "1",
        json!([repo_json("acme", "api"), repo_json("acme", "web")]),
    )
    .await;
    mock_page(&mut server, "/user/repos", "2", json!([])).await;

    let api_path = "/repos/acme/api/dependabot/alerts";
    mock_page(&mut server, api_path, "1", json!([lodash_alert_json()])).await;
    mock_page(&mut server, api_path, "2", json!([])).await;

    server
        .mock("GET", "/repos/acme/web/dependabot/alerts")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(json!({ "message": "Dependabot alerts are disabled." }).to_string())
        .create_async()
        .await;

    let repository = Arc::new(ScanningAlertRepository::new(Arc::new(client_for(&server))));
    let scanner = AlertScanServiceImpl::new(repository);

    let buckets = scanner.aggregate_all().await.expect("scan ok");
    assert_eq!(buckets.total(), 1);
    assert_eq!(buckets.critical.len(), 1);

    let alert = &buckets.critical[0];
    assert_eq!(alert.repo_name, "acme/api");
    assert_eq!(alert.package_name, "lodash");
    assert_eq!(alert.severity, Severity::Critical);
    assert_eq!(alert.cve_id, "CVE-2021-23337");
    assert_eq!(alert.patched_version, "4.17.21");

    let report = ReportServiceImpl::new().render_text(&buckets);
    assert!(report.contains("📅 Найдено уязвимостей: *1*"));
    assert!(report.contains("🔴 *CRITICAL* (1)"));
    assert!(report.contains("📦 `lodash`"));
    assert!(report.contains("📁 acme/api"));
    assert!(report.contains("⬆️ Обновить до: 4.17.21"));
}

/// A listing failure aborts the whole run; no partial report exists.
#[tokio::test]
async fn scan_aborts_when_listing_fails() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/user/repos")
        .with_status(502)
        .with_header("content-type", "application/json")
        .with_body(json!({ "message": "bad gateway" }).to_string())
        .create_async()
        .await;

    let repository = Arc::new(ScanningAlertRepository::new(Arc::new(client_for(&server))));
    let scanner = AlertScanServiceImpl::new(repository);

    assert!(matches!(
        scanner.aggregate_all().await,
        Err(AlertSourceError::Transport(_))
    ));
}
