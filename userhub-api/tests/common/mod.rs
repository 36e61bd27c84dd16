//! Common test utilities for integration tests
//!
//! Builds the full router over an in-memory repository seeded with fixtures
//! and a mail sender that keeps every message.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use userhub_api::app::{build_router, AppState};
use userhub_api::config::{ApiConfig, Config, DatabaseConfig, UrlConfig};
use userhub_shared::mail::MemoryMailSender;
use userhub_shared::models::user::{User, UserStatus};
use userhub_shared::repository::InMemoryUserRepository;
use userhub_shared::service::UserService;

pub const ACTIVE_ID: i64 = 10;
pub const ACTIVE_EMAIL: &str = "active@example.com";
pub const PENDING_ID: i64 = 11;
pub const PENDING_EMAIL: &str = "pending@example.com";
pub const PENDING_CODE: &str = "abcdefgh-ijkl-mnop-qrst-uvwxyzabcdeg";
pub const FRONTEND_URL: &str = "http://localhost:3000";

/// Test context containing the router and its collaborators
pub struct TestContext {
    pub app: axum::Router,
    pub repo: InMemoryUserRepository,
    pub mailer: MemoryMailSender,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        urls: UrlConfig {
            public_base_url: "http://localhost:8080".to_string(),
            frontend_url: FRONTEND_URL.to_string(),
        },
    }
}

impl TestContext {
    /// Creates a context with one ACTIVE and one PENDING user
    pub async fn new() -> Self {
        let repo = InMemoryUserRepository::new();
        repo.seed([
            User {
                id: ACTIVE_ID,
                email: ACTIVE_EMAIL.to_string(),
                nickname: "bob".to_string(),
                address: Some("Busan".to_string()),
                certification_code: "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa".to_string(),
                status: UserStatus::Active,
                last_login_at: None,
            },
            User {
                id: PENDING_ID,
                email: PENDING_EMAIL.to_string(),
                nickname: "bob2".to_string(),
                address: Some("Busan".to_string()),
                certification_code: PENDING_CODE.to_string(),
                status: UserStatus::Pending,
                last_login_at: None,
            },
        ])
        .await
        .expect("Failed to seed users");

        let mailer = MemoryMailSender::new();
        let config = test_config();
        let users = UserService::new(
            Arc::new(repo.clone()),
            Arc::new(mailer.clone()),
            &config.urls.public_base_url,
        );
        let app = build_router(AppState::new(users, config));

        TestContext { app, repo, mailer }
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

/// Reads a response body as JSON
pub async fn json_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Builds a JSON request
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
