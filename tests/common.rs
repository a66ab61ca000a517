// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, token service, resources, and HTTP request helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(
    dead_code,
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Shared test utilities for `comanda`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use comanda::{
    auth::TokenService,
    config::AuthConfig,
    database::Database,
    notifications::{NotificationError, OrderNotifier},
    resources::ServerResources,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Low bcrypt cost so tests stay fast
pub const TEST_BCRYPT_COST: u32 = 4;

/// Auth configuration with deterministic test secrets
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        session_secret: "session-test-secret".into(),
        order_secret: "order-test-secret".into(),
        session_ttl_secs: 3600,
        session_refresh_ttl_secs: 28800,
        order_token_ttl_secs: 10,
    }
}

/// Standard in-memory test database
pub async fn create_test_database() -> Database {
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

/// Notifier that records every message instead of dispatching it
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    fail_next: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next send fail with a channel rejection
    pub fn fail_next(&self) {
        *self.fail_next.lock().expect("notifier lock poisoned") = true;
    }

    /// Messages recorded so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("notifier lock poisoned").clone()
    }
}

#[async_trait]
impl OrderNotifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<(), NotificationError> {
        let mut fail = self.fail_next.lock().expect("notifier lock poisoned");
        if *fail {
            *fail = false;
            return Err(NotificationError::Rejected {
                status: 500,
                body: "simulated channel failure".into(),
            });
        }
        self.messages
            .lock()
            .expect("notifier lock poisoned")
            .push(message.to_owned());
        Ok(())
    }
}

/// Full test setup: database, tokens, recording notifier, and resources
pub struct TestSetup {
    pub database: Database,
    pub tokens: TokenService,
    pub notifier: Arc<RecordingNotifier>,
    pub resources: Arc<ServerResources>,
}

impl TestSetup {
    /// Create a setup with the default test auth configuration
    pub async fn new() -> Self {
        Self::with_auth_config(test_auth_config()).await
    }

    /// Create a setup with custom token lifetimes or secrets
    pub async fn with_auth_config(auth_config: AuthConfig) -> Self {
        let database = create_test_database().await;
        let tokens = TokenService::new(&auth_config);
        let notifier = RecordingNotifier::new();
        let resources = Arc::new(ServerResources::new(
            database.clone(),
            tokens.clone(),
            notifier.clone(),
        ));

        Self {
            database,
            tokens,
            notifier,
            resources,
        }
    }

    /// Router over the full application surface with default config
    pub fn router(&self) -> Router {
        let config = comanda::config::ServerConfig {
            http_port: 0,
            environment: comanda::config::Environment::Testing,
            database: comanda::config::DatabaseConfig {
                url: "sqlite::memory:".into(),
            },
            auth: test_auth_config(),
            notifications: None,
            cors: comanda::config::CorsConfig::default(),
        };
        comanda::routes::router(self.resources.clone(), &config)
    }

    /// Create an administrator with a bcrypt-hashed password
    pub async fn create_admin(&self, account_name: &str, password: &str) -> i64 {
        let hash = bcrypt::hash(password, TEST_BCRYPT_COST).expect("Failed to hash password");
        let admin = self
            .database
            .create_administrator(account_name, &hash)
            .await
            .expect("Failed to create administrator");
        admin.admin_code
    }
}

/// Helper to build and execute HTTP requests against Axum routers
pub struct AxumTestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl AxumTestRequest {
    /// Create a new GET request
    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Create a new POST request
    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    /// Create a new PUT request
    pub fn put(uri: &str) -> Self {
        Self::new(Method::PUT, uri)
    }

    /// Create a new DELETE request
    pub fn delete(uri: &str) -> Self {
        Self::new(Method::DELETE, uri)
    }

    fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Add a bearer token to the request
    pub fn bearer(self, token: &str) -> Self {
        self.header("authorization", &format!("Bearer {token}"))
    }

    /// Add JSON body to the request
    pub fn json<T: Serialize>(mut self, data: &T) -> Self {
        self.body = Some(serde_json::to_string(data).expect("Failed to serialize JSON"));
        self.headers.push((
            header::CONTENT_TYPE.as_str().to_owned(),
            "application/json".to_owned(),
        ));
        self
    }

    /// Execute the request against an Axum router
    pub async fn send(self, app: Router) -> AxumTestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        for (key, value) in self.headers {
            builder = builder.header(key, value);
        }

        let request = builder
            .body(Body::from(self.body.unwrap_or_default()))
            .expect("Failed to build request");

        let response = app
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        AxumTestResponse::from_response(response).await
    }
}

/// Wrapper around an Axum HTTP response for testing
pub struct AxumTestResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl AxumTestResponse {
    async fn from_response(response: axum::http::Response<Body>) -> Self {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body")
            .to_vec();
        Self { status, body }
    }

    /// Response status as u16 for easy assertion
    pub const fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// Response body as a JSON value
    pub fn json<T: serde::de::DeserializeOwned>(self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to deserialize JSON response")
    }

    /// Response body as a string
    pub fn text(self) -> String {
        String::from_utf8(self.body).expect("Failed to decode response as UTF-8")
    }
}
