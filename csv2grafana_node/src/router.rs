use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use log::{info, warn};
use serde_json::Value;

use csv2grafana_base::custom_error::CustomError;
use csv2grafana_base::protocol::request::QueryRequest;
use csv2grafana_base::protocol::CORS_HEADERS;
use csv2grafana_base::series::TimeSeries;

use crate::node::Node;

const FILE_ROUTE: &str = "/csv2grafana/:uuid/:file";

/// 所有路由都接受任意 http 方法
pub fn create_routes(node: Arc<Node>) -> Router {
    Router::new()
        // 数据源配置页的 "Test connection"
        .route(FILE_ROUTE, any(probe))
        .route(&format!("{}/", FILE_ROUTE), any(probe))
        .route(&format!("{}/search", FILE_ROUTE), any(search))
        .route(&format!("{}/annotations", FILE_ROUTE), any(annotations))
        .route(&format!("{}/query", FILE_ROUTE), any(query))
        .route(&format!("{}/tag-keys", FILE_ROUTE), any(tag_keys))
        .route(&format!("{}/tag-values", FILE_ROUTE), any(tag_values))
        .route("/tag-keys", any(tag_keys))
        .route("/tag-values", any(tag_values))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(middleware::map_response(add_cors_headers))
        .with_state(node)
}

async fn add_cors_headers(mut res: Response) -> Response {
    let headers = res.headers_mut();
    for (name, value) in CORS_HEADERS {
        if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
            headers.insert(name, HeaderValue::from_static(value));
        }
    }
    res
}

/// 错误只返回状态码，不带响应体
pub struct ApiError(CustomError);

impl From<CustomError> for ApiError {
    fn from(e: CustomError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_invalid_request() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        warn!("请求失败:{}, {}", status, self.0);
        status.into_response()
    }
}

async fn probe(
    State(node): State<Arc<Node>>,
    Path((uuid, file)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let path = node.handler.resolve_path(&uuid, &file)?;
    node.handler.probe(&path).await?;
    Ok(StatusCode::OK)
}

async fn search(
    State(node): State<Arc<Node>>,
    Path((uuid, file)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ApiError> {
    let path = node.handler.resolve_path(&uuid, &file)?;
    Ok(Json(node.handler.search(&path).await?))
}

async fn annotations(State(node): State<Arc<Node>>) -> Json<Vec<Value>> {
    Json(node.handler.annotations())
}

async fn query(
    State(node): State<Arc<Node>>,
    Path((uuid, file)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Vec<TimeSeries>>, ApiError> {
    info!("query /csv2grafana/{}/{}", uuid, file);
    let path = node.handler.resolve_path(&uuid, &file)?;
    let request = QueryRequest::from_slice(&body)?;
    Ok(Json(node.handler.query(&path, &request).await?))
}

async fn tag_keys(State(node): State<Arc<Node>>) -> Json<Vec<Value>> {
    Json(node.handler.tag_keys())
}

async fn tag_values(State(node): State<Arc<Node>>) -> Json<Vec<Value>> {
    Json(node.handler.tag_values())
}
