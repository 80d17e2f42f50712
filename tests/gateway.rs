use linkscout::config::Config;
use linkscout::gateway::run_gateway_with_listener;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl GatewayTestServer {
    async fn start(cms_base_url: &str) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("listener should expose local address")
            .port();

        let mut config = Config::default();
        config.cms.base_url = cms_base_url.to_string();
        config.cms.cache_ttl_secs = 0;
        config.cms.max_retries = 0;
        config.cms.timeout_secs = 2;
        config.checker.timeout_secs = 2;
        config.archive.enabled = false;

        let handle = tokio::spawn(async move { run_gateway_with_listener(listener, config).await });
        wait_until_ready(port).await;

        Self { port, handle }
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("http://127.0.0.1:{}{path_and_query}", self.port)
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_ready(port: u16) {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await
            .is_ok()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("gateway did not become ready");
}

fn post_json(id: u64, body: &str) -> Value {
    json!({
        "id": id,
        "slug": format!("post-{id}"),
        "title": format!("Post {id}"),
        "body": body
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let gateway = GatewayTestServer::start("http://127.0.0.1:1").await;

    let body: Value = reqwest::get(gateway.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn check_without_scope_is_bad_request() {
    let gateway = GatewayTestServer::start("http://127.0.0.1:1").await;

    let response = reqwest::get(gateway.url("/check")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("scope"));
}

#[tokio::test]
async fn check_with_conflicting_scopes_is_bad_request() {
    let gateway = GatewayTestServer::start("http://127.0.0.1:1").await;

    let response = reqwest::get(gateway.url("/check?post=1&all=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_all_over_empty_cms_returns_zero_summary() {
    let cms = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "meta": {"pagination": {"page": 1, "page_count": 1}}
        })))
        .mount(&cms)
        .await;

    let gateway = GatewayTestServer::start(&cms.uri()).await;
    let response = reqwest::get(gateway.url("/check?all=true")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total_posts"], 0);
    assert_eq!(body["total_links"], 0);
    assert_eq!(body["dead_links"], 0);
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn check_single_post_reports_dead_links() {
    let target = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&target)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&target)
        .await;

    let body_html = format!(
        r#"<p><a href="{0}/gone">broken reference</a> and <a href="{0}/ok">working reference</a></p>"#,
        target.uri()
    );
    let cms = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": post_json(5, &body_html)})),
        )
        .mount(&cms)
        .await;

    let gateway = GatewayTestServer::start(&cms.uri()).await;
    let response = reqwest::get(gateway.url("/check?post=5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total_posts"], 1);
    assert_eq!(body["total_links"], 2);
    assert_eq!(body["dead_links"], 1);

    let dead = &body["posts"][0]["dead"][0];
    assert_eq!(dead["status"], 404);
    assert_eq!(dead["retryable"], false);
    assert!(dead["url"].as_str().unwrap().ends_with("/gone"));
}

#[tokio::test]
async fn unknown_post_is_not_found() {
    let cms = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&cms)
        .await;

    let gateway = GatewayTestServer::start(&cms.uri()).await;
    let response = reqwest::get(gateway.url("/check?post=42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cms_down_surfaces_as_internal_error() {
    // Nothing listens on port 1.
    let gateway = GatewayTestServer::start("http://127.0.0.1:1").await;

    let response = reqwest::get(gateway.url("/check?all=true")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("cms"));
}
