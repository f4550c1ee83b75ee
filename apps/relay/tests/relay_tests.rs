use std::sync::Arc;

use pricecheck_lookup::KioskConfig;
use pricecheck_relay::{build_router, RelayState};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake";
const LOGO_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nlogo";

/// Spin up the relay on an OS-assigned port, returning the base URL.
async fn spawn_relay(upstream: &MockServer) -> String {
    let mut config = KioskConfig::default();
    config.images.base_url = format!("{}/images", upstream.uri());
    config.inventory.base_url = format!("{}/api", upstream.uri());
    config.inventory.timeout_secs = 2;
    spawn_with_config(config).await
}

async fn spawn_with_config(config: KioskConfig) -> String {
    let state = Arc::new(RelayState::from_config(&config).unwrap());
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn mount_image(server: &MockServer, at: &str, bytes: &[u8], content_type: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(bytes.to_vec(), content_type))
        .mount(server)
        .await;
}

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let upstream = MockServer::start().await;
    let base = spawn_relay(&upstream).await;

    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

// ── Image proxy ─────────────────────────────────────────────────

#[tokio::test]
async fn image_proxy_requires_url() {
    let upstream = MockServer::start().await;
    let base = spawn_relay(&upstream).await;

    let resp = reqwest::get(format!("{}/api/image-proxy", base)).await.unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.text().await.unwrap(), "Missing URL parameter");
}

#[tokio::test]
async fn image_proxy_rejects_non_http_url() {
    let upstream = MockServer::start().await;
    let base = spawn_relay(&upstream).await;

    let resp = reqwest::get(format!("{}/api/image-proxy?url=file:///etc/passwd", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn image_proxy_relays_bytes_and_cors() {
    let upstream = MockServer::start().await;
    mount_image(&upstream, "/cdn/leche.png", PNG_BYTES, "image/png").await;
    let base = spawn_relay(&upstream).await;

    let target = format!("{}/cdn/leche.png", upstream.uri());
    let resp = reqwest::Client::new()
        .get(format!("{}/api/image-proxy", base))
        .query(&[("url", target.as_str())])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let headers = resp.headers();
    assert_eq!(headers["content-type"], "image/png");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn image_proxy_passes_upstream_status() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdn/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&upstream)
        .await;
    let base = spawn_relay(&upstream).await;

    let target = format!("{}/cdn/missing.png", upstream.uri());
    let resp = reqwest::Client::new()
        .get(format!("{}/api/image-proxy", base))
        .query(&[("url", target.as_str())])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    assert_eq!(resp.text().await.unwrap(), "Failed to fetch image. Status: 404");
}

#[tokio::test]
async fn image_proxy_unreachable_is_500() {
    let upstream = MockServer::start().await;
    let base = spawn_relay(&upstream).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/api/image-proxy", base))
        .query(&[("url", "http://127.0.0.1:1/x.png")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    assert_eq!(resp.text().await.unwrap(), "Internal Server Error");
}

// ── Images by identifier ────────────────────────────────────────

#[tokio::test]
async fn image_by_id_serves_photo() {
    let upstream = MockServer::start().await;
    mount_image(&upstream, "/images/productos/leche.png", PNG_BYTES, "image/png").await;
    let base = spawn_relay(&upstream).await;

    let resp = reqwest::get(format!("{}/api/images/productos/leche.png", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn missing_photo_falls_back_to_placeholder() {
    let upstream = MockServer::start().await;
    mount_image(&upstream, "/images/LOGONEXT.png", LOGO_BYTES, "image/png").await;
    let base = spawn_relay(&upstream).await;

    let resp = reqwest::get(format!("{}/api/images/productos/gone.jpg", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), LOGO_BYTES);

    let resp = reqwest::get(format!("{}/api/images", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), LOGO_BYTES);
}

#[tokio::test]
async fn missing_placeholder_is_502_json() {
    let upstream = MockServer::start().await;
    let base = spawn_relay(&upstream).await;

    let resp = reqwest::get(format!("{}/api/images/productos/gone.jpg", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Error fetching image" }));
}

#[tokio::test]
async fn traversal_is_rejected() {
    let upstream = MockServer::start().await;
    let base = spawn_relay(&upstream).await;

    let resp = reqwest::get(format!("{}/api/images/..%2Fapi%2Fsecret", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

// ── Inventory pass-through ──────────────────────────────────────

#[tokio::test]
async fn passthrough_forwards_body_and_status() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Productos/productReadBarCode"))
        .and(body_json(json!({
            "PageNumber": 0, "PageSize": 0, "genericstring": "0123456789012"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": [{ "Nombre": "Leche 1L" }], "Count": 1, "Total": 1
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    let base = spawn_relay(&upstream).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/Productos/productReadBarCode", base))
        .json(&json!({ "PageNumber": 0, "PageSize": 0, "genericstring": "0123456789012" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert!(resp.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["Results"][0]["Nombre"], "Leche 1L");
}

#[tokio::test]
async fn passthrough_keeps_upstream_errors() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Productos/productReadBarCode"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&upstream)
        .await;
    let base = spawn_relay(&upstream).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/Productos/productReadBarCode", base))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    assert_eq!(resp.text().await.unwrap(), "boom");
}

#[tokio::test]
async fn passthrough_unreachable_is_502() {
    let mut config = KioskConfig::default();
    config.inventory.base_url = "http://127.0.0.1:1/api".to_string();
    config.inventory.timeout_secs = 2;
    let base = spawn_with_config(config).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/Productos/productReadBarCode", base))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
}
