//! Helpers for router-level tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    app::build_app,
    questions::answerer::{AnswerClient, ChatMessage},
    state::AppState,
};

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new(state: AppState) -> Self {
        let router = build_app(state.clone());
        Self { state, router }
    }
}

pub async fn call(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let res = app.router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Registers an account and returns a bearer token for it.
pub async fn register_and_login(app: &TestApp, email: &str, password: &str) -> String {
    let username = email.split('@').next().unwrap_or("user");
    let (status, _) = call(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": email, "username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {email}");

    let (status, body) = call(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {email}");
    body["access_token"].as_str().unwrap().to_string()
}

/// Answer client whose provider is always down.
pub struct FailingAnswerer;

#[async_trait]
impl AnswerClient for FailingAnswerer {
    async fn answer(&self, _question: &str, _history: &[ChatMessage]) -> anyhow::Result<String> {
        anyhow::bail!("provider unavailable")
    }
}
