//! End-to-end tests for the HTTP renderer
//!
//! These tests use wiremock to serve a small documentation site and run
//! full crawls against it.

use doc_harvest::config::Config;
use doc_harvest::render::HttpRenderer;
use doc_harvest::{status, submit, CrawlRequest, ResultStatus};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `dir` with fast retries
fn create_test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.output.directory = dir.display().to_string();
    config.retry.launch_attempts = 1;
    config.retry.load_attempts = 2;
    config.retry.load_delay_ms = 10;
    config.crawler.task_timeout_ms = 5_000;
    config.renderer.request_timeout_ms = 2_000;
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    let html = format!(
        "<html><head><title>Docs</title></head><body>{}</body></html>",
        body
    );
    ResponseTemplate::new(200).set_body_raw(html.into_bytes(), "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn run_crawl(config: &Config, seed: String) -> doc_harvest::CrawlReport {
    let renderer = HttpRenderer::new(&config.renderer).expect("Failed to create renderer");
    submit(config, Arc::new(renderer), CrawlRequest::new(seed))
        .await
        .expect("Crawl should complete")
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs",
        r#"<nav><a href="/docs/hidden-nav">Menu</a></nav>
        <main>
            <h1>Welcome</h1>
            <p>Start with the <a href="/docs/guide">Guide</a>.</p>
            <p>Or read the <a href="/blog/news">blog</a>.</p>
        </main>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/docs/guide",
        r#"<main>
            <h2>Installing</h2>
            <pre><code>cargo install doc-harvest</code></pre>
            <p>Back to <a href="/docs">Home</a>.</p>
        </main>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/hidden-nav", "<main><p>Menu page</p></main>").await;

    Mock::given(method("GET"))
        .and(path("/blog/news"))
        .respond_with(html_page("<p>Blog</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let report = run_crawl(&config, format!("{}/docs", base_url)).await;

    let root = &report.result;
    assert_eq!(root.status, ResultStatus::Success);
    assert_eq!(root.filename, "docs_index.md");
    let children: Vec<&str> = root.children.iter().map(|c| c.filename.as_str()).collect();
    assert_eq!(children, vec!["docs_hidden-nav.md", "docs_guide.md"]);
    assert_eq!(report.files_processed, 3);

    let index = std::fs::read_to_string(dir.path().join("docs_index.md")).unwrap();
    assert!(index.contains("# Welcome"));
    assert!(!index.contains("Menu page"));
    assert!(index.contains(&format!("[Guide]({}/docs/guide)", base_url)));

    let guide = std::fs::read_to_string(dir.path().join("docs_guide.md")).unwrap();
    assert!(guide.contains("## Installing"));
    assert!(guide.contains("```\ncargo install doc-harvest\n```"));
    assert!(guide.contains("Back to [Home](./docs_index.md)."));
}

#[tokio::test]
async fn test_server_error_is_retried_then_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs",
        r#"<main><p><a href="/docs/broken">Broken</a> and <a href="/docs/ok">OK</a></p></main>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/ok", "<main><p>Fine</p></main>").await;

    Mock::given(method("GET"))
        .and(path("/docs/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let report = run_crawl(&config, format!("{}/docs", base_url)).await;

    let broken = report
        .result
        .find(&format!("{}/docs/broken", base_url))
        .expect("broken page should be in the tree");
    assert_eq!(broken.status, ResultStatus::Error);
    assert!(broken.error.as_deref().unwrap().contains("HTTP 500"));

    let ok = report
        .result
        .find(&format!("{}/docs/ok", base_url))
        .expect("ok page should be in the tree");
    assert_eq!(ok.status, ResultStatus::Success);

    let stub = std::fs::read_to_string(dir.path().join("docs_broken.md")).unwrap();
    assert!(stub.starts_with("# Error Processing Page"));
}

#[tokio::test]
async fn test_non_html_response_is_an_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs",
        r#"<main><p><a href="/docs/manual">Manual</a></p></main>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/manual"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let report = run_crawl(&config, format!("{}/docs", base_url)).await;

    let manual = &report.result.children[0];
    assert_eq!(manual.status, ResultStatus::Error);
    assert!(manual.error.as_deref().unwrap().contains("expected HTML"));
}

#[tokio::test]
async fn test_status_lists_crawled_files() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs",
        r#"<main><h1>Home</h1><p><a href="/docs/a">A</a></p></main>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/a", "<main><p>Page A</p></main>").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    run_crawl(&config, format!("{}/docs", base_url)).await;

    let snapshot = status(dir.path()).unwrap();
    assert_eq!(snapshot.total_files, 2);
    let mut names: Vec<&str> = snapshot.files.iter().map(|f| f.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["docs_a.md", "docs_index.md"]);
}
