use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

use csv2grafana_base::config::Config;
use csv2grafana_node::node::create_and_init;
use csv2grafana_node::router::create_routes;

const CSV: &str = "1000,1.5,2.5\n2000,3.5,4.5\n";

async fn create_test_router() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::create_dir(dir.path().join("ds1")).await.unwrap();
    tokio::fs::write(dir.path().join("ds1").join("sensor.csv"), CSV)
        .await
        .unwrap();

    let config = Config {
        data_dir: dir.path().to_string_lossy().to_string(),
        ..Config::default()
    };
    let node = create_and_init(config).await.unwrap();
    (dir, create_routes(Arc::new(node)))
}

async fn make_request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    let request = if let Some(body) = body {
        request.body(Body::from(body.to_string()))
    } else {
        request.body(Body::empty())
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, headers, body.to_vec())
}

fn as_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

fn assert_cors(headers: &axum::http::HeaderMap) {
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST");
    assert_eq!(headers["access-control-allow-headers"], "accept, content-type");
}

#[tokio::test]
async fn test_probe() {
    let (_dir, app) = create_test_router().await;

    let (status, headers, _) = make_request(&app, Method::GET, "/csv2grafana/ds1/sensor.csv/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_cors(&headers);

    let (status, _, _) = make_request(&app, Method::POST, "/csv2grafana/ds1/sensor.csv", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, headers, body) = make_request(&app, Method::GET, "/csv2grafana/ds1/missing.csv/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
    assert_cors(&headers);

    let (status, _, _) = make_request(&app, Method::GET, "/csv2grafana/ds1/sensor.txt/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 其它接口不检查后缀
    let (status, _, _) = make_request(&app, Method::POST, "/csv2grafana/ds1/sensor.txt/search", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search() {
    let (dir, app) = create_test_router().await;

    let (status, headers, body) = make_request(&app, Method::POST, "/csv2grafana/ds1/sensor.csv/search", Some(json!({"target": ""}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_cors(&headers);
    assert_eq!(as_json(&body), json!(["Column 1", "Column 2"]));
    assert!(dir.path().join("ds1").join("sensor.csv.descr.json").exists());

    let (status, _, _) = make_request(&app, Method::POST, "/csv2grafana/ds1/missing.csv/search", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_query_timeserie() {
    let (_dir, app) = create_test_router().await;

    let (status, headers, body) = make_request(
        &app,
        Method::POST,
        "/csv2grafana/ds1/sensor.csv/query",
        Some(json!({
            "targets": [
                {"target": "Column 1", "refId": "A", "type": "timeserie"},
                {"target": "unknown", "refId": "B", "type": "timeserie"},
                {"target": "Column 2", "refId": "C", "type": "table"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_cors(&headers);
    assert_eq!(
        as_json(&body),
        json!([{"target": "Column 1", "datapoints": [[1.5, 1000], [3.5, 2000]]}])
    );
}

#[tokio::test]
async fn test_query_range() {
    let (_dir, app) = create_test_router().await;

    let (status, _, body) = make_request(
        &app,
        Method::POST,
        "/csv2grafana/ds1/sensor.csv/query",
        Some(json!({
            "range": {"from": 1500, "to": 2000},
            "targets": [{"target": "Column 2", "type": "timeserie"}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        json!([{"target": "Column 2", "datapoints": [[4.5, 2000]]}])
    );
}

#[tokio::test]
async fn test_query_empty_targets_is_not_found() {
    let (_dir, app) = create_test_router().await;

    let (status, headers, body) = make_request(&app, Method::POST, "/csv2grafana/ds1/sensor.csv/query", Some(json!({"targets": []}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
    assert_cors(&headers);

    let (status, _, _) = make_request(&app, Method::POST, "/csv2grafana/ds1/sensor.csv/query", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_query_unknown_kind_is_bad_request() {
    let (_dir, app) = create_test_router().await;

    let (status, headers, _) = make_request(
        &app,
        Method::POST,
        "/csv2grafana/ds1/sensor.csv/query",
        Some(json!({"targets": [{"target": "Column 1", "type": "heatmap"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_cors(&headers);
}

#[tokio::test]
async fn test_stub_endpoints() {
    let (_dir, app) = create_test_router().await;

    for uri in [
        "/csv2grafana/ds1/sensor.csv/annotations",
        "/csv2grafana/ds1/sensor.csv/tag-keys",
        "/csv2grafana/ds1/sensor.csv/tag-values",
        "/tag-keys",
        "/tag-values",
    ] {
        let (status, headers, body) = make_request(&app, Method::POST, uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_cors(&headers);
        assert_eq!(as_json(&body), json!([]), "{}", uri);
    }
}
