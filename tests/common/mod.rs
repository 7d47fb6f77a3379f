// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: an in-process fake of the Flume API and a Splunk
//! HEC, plus access-token minting.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use flume_export::config::{Config, Mode};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// A request the fake server received.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Canned responses, one per endpoint. `http_code` in the body also sets
/// the HTTP status, as Flume does, unless `flume_status` overrides it.
#[derive(Debug, Clone)]
pub struct Responses {
    pub flume_status: Option<u16>,
    pub token: Value,
    pub user: Value,
    pub devices: Value,
    pub query: Value,
    pub hec: (u16, Value),
}

impl Default for Responses {
    fn default() -> Self {
        Self {
            flume_status: None,
            token: flume_ok(json!([{"access_token": "AT1", "refresh_token": "RT1"}])),
            user: flume_ok(json!([{"id": 7}])),
            devices: flume_ok(json!([])),
            query: flume_ok(json!([{"perminute": []}])),
            hec: (200, json!({"text": "Success", "code": 0})),
        }
    }
}

struct FakeState {
    responses: Mutex<Responses>,
    recorded: Mutex<Vec<Recorded>>,
}

/// Handle to a running fake server.
#[allow(dead_code)]
pub struct FakeServer {
    pub url: String,
    state: Arc<FakeState>,
}

#[allow(dead_code)]
impl FakeServer {
    /// Bind to an ephemeral port and serve in the background.
    pub async fn start(responses: Responses) -> Self {
        let state = Arc::new(FakeState {
            responses: Mutex::new(responses),
            recorded: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/oauth/token", post(token))
            .route("/users/{user_id}", get(user))
            .route("/users/{user_id}/devices", get(devices))
            .route("/users/{user_id}/devices/{device_id}/query", post(query))
            .route("/services/collector/event", post(hec))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake server");
        let addr = listener.local_addr().expect("fake server address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake server");
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.recorded.lock().unwrap().clone()
    }

    /// Requests received on one path.
    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

fn record(state: &FakeState, path: String, headers: &HeaderMap, body: Value) {
    let authorization = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    state.recorded.lock().unwrap().push(Recorded {
        path,
        authorization,
        body,
    });
}

fn reply(state: &FakeState, pick: impl Fn(&Responses) -> &Value) -> (StatusCode, Json<Value>) {
    let responses = state.responses.lock().unwrap();
    let body = pick(&responses).clone();
    let status = responses
        .flume_status
        .map(u64::from)
        .or_else(|| body.get("http_code").and_then(Value::as_u64))
        .and_then(|c| StatusCode::from_u16(c as u16).ok())
        .unwrap_or(StatusCode::OK);
    (status, Json(body))
}

async fn token(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(&state, "/oauth/token".to_string(), &headers, body);
    reply(&state, |r| &r.token)
}

async fn user(
    State(state): State<Arc<FakeState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record(&state, format!("/users/{}", user_id), &headers, Value::Null);
    reply(&state, |r| &r.user)
}

async fn devices(
    State(state): State<Arc<FakeState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record(
        &state,
        format!("/users/{}/devices", user_id),
        &headers,
        Value::Null,
    );
    reply(&state, |r| &r.devices)
}

async fn query(
    State(state): State<Arc<FakeState>>,
    Path((user_id, device_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(
        &state,
        format!("/users/{}/devices/{}/query", user_id, device_id),
        &headers,
        body,
    );
    reply(&state, |r| &r.query)
}

async fn hec(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(
        &state,
        "/services/collector/event".to_string(),
        &headers,
        body,
    );
    let (status, response) = state.responses.lock().unwrap().hec.clone();
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::OK),
        Json(response),
    )
}

/// Successful Flume envelope around `data`.
#[allow(dead_code)]
pub fn flume_ok(data: Value) -> Value {
    let count = data.as_array().map(|a| a.len()).unwrap_or(0);
    json!({
        "success": true,
        "code": 602,
        "message": "Request OK",
        "http_code": 200,
        "http_message": "OK",
        "detailed": null,
        "data": data,
        "count": count,
        "pagination": null,
    })
}

/// Failed Flume envelope.
#[allow(dead_code)]
pub fn flume_error(http_code: u16, message: &str) -> Value {
    json!({
        "success": false,
        "code": 1,
        "message": message,
        "http_code": http_code,
        "http_message": "Error",
        "detailed": null,
        "data": [],
        "count": 0,
        "pagination": null,
    })
}

/// Mint an HS256 access token carrying `user_id`, like Flume's.
#[allow(dead_code)]
pub fn access_token_for(user_id: u64) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    let claims = json!({
        "type": "USER",
        "user_id": user_id,
        "iat": 1_700_000_000u64,
        "exp": 1_700_604_800u64,
        "aud": "flume",
    });

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"not-the-flume-signing-key"),
    )
    .expect("Failed to create JWT")
}

/// Config pointed at the fake server.
#[allow(dead_code)]
pub fn test_config(server: &FakeServer, mode: Mode) -> Config {
    Config {
        api_url: server.url.clone(),
        mode,
        ..Config::default()
    }
}
