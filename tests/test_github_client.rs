//! Integration tests for the GitHub client using wiremock.

use base64::Engine;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use traceback::config::GitHubConfig;
use traceback::domain::DependencyManifest;
use traceback::infrastructure::github::{FetchError, GitHubClient, RepositoryFetcher};

fn create_client(mock_server: &MockServer) -> GitHubClient {
    GitHubClient::new(&GitHubConfig {
        base_url: mock_server.uri(),
        token: None,
        timeout_seconds: 5,
        commit_page_size: 10,
    })
}

fn encode_content(text: &str) -> String {
    // GitHub wraps base64 payloads with newlines; keep one to prove the
    // client strips whitespace before decoding.
    let mut encoded = base64::engine::general_purpose::STANDARD.encode(text);
    let mid = encoded.len() / 2;
    encoded.insert(mid, '\n');
    encoded
}

fn repo_document() -> serde_json::Value {
    serde_json::json!({
        "name": "bar",
        "full_name": "foo/bar",
        "description": "A demo repository",
        "html_url": "https://github.com/foo/bar",
        "owner": { "login": "foo" },
        "stargazers_count": 120,
        "forks_count": 4,
        "watchers_count": 120,
        "language": "JavaScript",
        "default_branch": "main",
        "created_at": "2023-05-01T10:00:00Z",
        "updated_at": "2024-02-01T12:30:00Z"
    })
}

fn commit_documents() -> serde_json::Value {
    serde_json::json!([
        {
            "sha": "abc123",
            "html_url": "https://github.com/foo/bar/commit/abc123",
            "commit": {
                "message": "second commit",
                "author": { "name": "Alice", "date": "2024-01-02T00:00:00Z" }
            }
        },
        {
            "sha": "def456",
            "commit": {
                "message": "first commit",
                "author": { "name": "Bob", "date": "2024-01-01T00:00:00Z" }
            }
        }
    ])
}

async fn mount_repo_and_commits(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/foo/bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_document()))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/foo/bar/commits"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(commit_documents()))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_fetch_project_assembles_full_record() {
    let mock_server = MockServer::start().await;
    mount_repo_and_commits(&mock_server).await;

    let link = format!(
        "<{0}/repos/foo/bar/commits?per_page=1&page=2>; rel=\"next\", <{0}/repos/foo/bar/commits?per_page=1&page=347>; rel=\"last\"",
        mock_server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/repos/foo/bar/commits"))
        .and(query_param("per_page", "1"))
        .and(query_param("sha", "main"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", link.as_str())
                .set_body_json(serde_json::json!([{ "sha": "abc123", "commit": { "message": "second commit" } }])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/foo/bar/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "JavaScript": 54321,
            "CSS": 1234
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/foo/bar/contents/package.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "encoding": "base64",
            "content": encode_content(
                r#"{"name":"bar","dependencies":{"express":"^4.17.1"},"devDependencies":{"jest":"^29.0.0"}}"#
            )
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/foo/bar/readme"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# bar\n\nHello."))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let record = client.fetch_project("foo", "bar").await.unwrap();

    assert_eq!(record.id, "foo-bar");
    assert_eq!(record.full_name, "foo/bar");
    assert_eq!(record.owner, "foo");
    assert_eq!(record.stars, 120);
    assert_eq!(record.language.as_deref(), Some("JavaScript"));
    assert_eq!(record.total_commits, 347);
    assert_eq!(record.readme.as_deref(), Some("# bar\n\nHello."));
    assert_eq!(record.languages.get("JavaScript"), Some(&54321));

    // Snapshot keeps upstream most-recent-first order.
    assert_eq!(record.commits.len(), 2);
    assert_eq!(record.commits[0].message, "second commit");
    assert_eq!(record.commits[0].author, "Alice");
    assert_eq!(record.commits[1].message, "first commit");

    let Some(DependencyManifest::Npm {
        dependencies,
        dev_dependencies,
    }) = record.dependencies
    else {
        panic!("expected npm manifest");
    };
    assert_eq!(dependencies.get("express").unwrap(), "^4.17.1");
    assert_eq!(dev_dependencies.get("jest").unwrap(), "^29.0.0");

    // Onboarding sub-state starts clean; the orchestrator owns the flags.
    assert_eq!(record.onboarding_overview, None);
    assert!(!record.is_generating);
    assert!(!record.generation_failed);
}

#[tokio::test]
async fn test_fetch_project_404_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/foo/bar"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let err = client.fetch_project("foo", "bar").await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound(_)));
}

#[tokio::test]
async fn test_fetch_project_degrades_optional_sub_fetches() {
    let mock_server = MockServer::start().await;
    // Only the critical endpoints exist; everything else answers 404.
    mount_repo_and_commits(&mock_server).await;

    let client = create_client(&mock_server);
    let record = client.fetch_project("foo", "bar").await.unwrap();

    assert!(record.languages.is_empty());
    assert_eq!(record.dependencies, None);
    assert_eq!(record.readme, None);
    // Commit count probe degraded to the snapshot length.
    assert_eq!(record.total_commits, 2);
}

#[tokio::test]
async fn test_fetch_project_falls_back_to_requirements_txt() {
    let mock_server = MockServer::start().await;
    mount_repo_and_commits(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/repos/foo/bar/contents/requirements.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "encoding": "base64",
            "content": encode_content("flask==2.0.1\n\nrequests>=2.25\n")
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let record = client.fetch_project("foo", "bar").await.unwrap();

    assert_eq!(
        record.dependencies,
        Some(DependencyManifest::Pip {
            requirements: vec!["flask==2.0.1".to_string(), "requests>=2.25".to_string()]
        })
    );
}

#[tokio::test]
async fn test_fetch_project_commit_failure_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/foo/bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_document()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/foo/bar/commits"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let err = client.fetch_project("foo", "bar").await.unwrap_err();
    assert!(matches!(err, FetchError::Upstream(_)));
}

#[tokio::test]
async fn test_fetch_context_bounds_files_and_commits() {
    let mock_server = MockServer::start().await;

    let listing: Vec<serde_json::Value> = (0..40)
        .map(|i| serde_json::json!({ "name": format!("file{}.rs", i) }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/repos/foo/bar/contents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(&mock_server)
        .await;

    let commits: Vec<serde_json::Value> = (0..20)
        .map(|i| {
            serde_json::json!({
                "sha": format!("sha{}", i),
                "commit": {
                    "message": format!("commit {}", i),
                    "author": { "name": "Alice", "date": "2024-01-01T00:00:00Z" }
                }
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/repos/foo/bar/commits"))
        .and(query_param("per_page", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(commits))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let context = client.fetch_context("foo", "bar").await.unwrap();

    assert_eq!(context.repo, "foo/bar");
    assert_eq!(context.files.len(), 30);
    assert_eq!(context.commits.len(), 10);
    assert_eq!(context.commits[0].message, "commit 0");
    assert_eq!(context.commits[0].author, "Alice");
}

#[tokio::test]
async fn test_fetch_metadata_returns_partial_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/foo/bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_document()))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let meta = client.fetch_metadata("foo", "bar").await.unwrap();

    assert_eq!(meta.name, "bar");
    assert_eq!(meta.owner, "foo");
    assert_eq!(meta.stars, 120);
    assert_eq!(meta.description.as_deref(), Some("A demo repository"));
}
