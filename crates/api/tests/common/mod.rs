#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use printshop_api::config::ServerConfig;
use printshop_api::router::build_app_router;
use printshop_api::state::AppState;

/// `(display name, role)` pairs sent as actor headers.
pub type Who = (&'static str, &'static str);

pub const ADMIN: Who = ("Somchai", "admin");
pub const STAFF: Who = ("Nok", "user");
pub const VIEWER: Who = ("Guest", "viewer");

/// Build a test `ServerConfig` with safe defaults and no database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        org_name: "ร้านพิมพ์ทดสอบ".to_string(),
        movement_confirm_threshold: 100.0,
        database_url: None,
    }
}

/// The production router over an in-process gateway.
///
/// The state is returned too so tests can inspect the ledger directly.
pub fn build_test_app() -> (Router, AppState) {
    let state = AppState::in_memory(test_config());
    (build_app_from(state.clone()), state)
}

/// The production router over a state assembled by the test.
pub fn build_app_from(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    who: Option<Who>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((name, role)) = who {
        builder = builder.header("x-actor-name", name).header("x-actor-role", role);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: &Router, uri: &str, who: Who) -> Response<Body> {
    send(app, Method::GET, uri, Some(who), None).await
}

pub async fn post_json(app: &Router, uri: &str, who: Who, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(who), Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, who: Who, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(who), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, who: Who) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(who), None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Create a material and return its JSON.
pub async fn create_material(app: &Router, body: Value) -> Value {
    let response = post_json(app, "/api/v1/inventory/materials", STAFF, body).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"].clone()
}

/// A 1.2 m vinyl roll holding 10 m².
pub fn vinyl_roll() -> Value {
    serde_json::json!({
        "name": "Vinyl 1.2m",
        "category": "ไวนิล",
        "type": "roll",
        "width": 1.2,
        "remaining_qty": 10.0,
        "min_alert": 5.0,
        "cost_per_unit": 20.0
    })
}

/// Confirm a parked action and return the response.
pub async fn confirm(app: &Router, id: &str, who: Who) -> Response<Body> {
    send(
        app,
        Method::POST,
        &format!("/api/v1/confirmations/{id}/confirm"),
        Some(who),
        None,
    )
    .await
}
