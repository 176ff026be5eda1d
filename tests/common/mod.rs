// Shared helpers for router-level tests
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use knockout_db::InMemoryStore;
use knockout_models::Team;
use knockout_services::{demo_teams, SimulationConfig, TournamentService};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn create_test_service(teams: Vec<Team>) -> Arc<TournamentService<InMemoryStore>> {
    let store = Arc::new(InMemoryStore::with_teams(teams));
    Arc::new(TournamentService::new(store, SimulationConfig::default()).unwrap())
}

pub fn create_test_app() -> Router {
    knockout_api::app(create_test_service(demo_teams()))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send(app, "POST", uri, body).await
}
