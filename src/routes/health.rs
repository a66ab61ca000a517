// ABOUTME: Home and health check route handlers for service monitoring
// ABOUTME: Provides the root greeting and a liveness endpoint for infrastructure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the home and health check routes
    pub fn routes() -> axum::Router {
        use axum::{routing::get, Json, Router};

        async fn home_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "message": "Comanda API",
                "version": crate::constants::service_names::SERVER_VERSION
            }))
        }

        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new()
            .route("/", get(home_handler))
            .route("/health", get(health_handler))
    }
}
