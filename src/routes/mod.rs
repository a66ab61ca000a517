// ABOUTME: HTTP route handlers and router assembly for the Comanda API
// ABOUTME: Merges per-resource routers and applies the shared middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! REST routes per resource plus the assembled application router

/// Administrator login, logout, listing, and deletion
pub mod administrators;

/// Companion catalog handlers
pub mod companions;

/// Home and health endpoints
pub mod health;

/// Order-token issuance endpoint
pub mod order_tokens;

/// Order intake and dashboard handlers
pub mod orders;

/// Product catalog handlers
pub mod products;

/// Weekly schedule handlers
pub mod schedules;

use crate::config::ServerConfig;
use crate::constants::{headers as header_names, limits};
use crate::middleware::setup_cors;
use crate::resources::ServerResources;
use axum::http::HeaderName;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router with middleware applied
#[must_use]
pub fn router(resources: Arc<ServerResources>, config: &ServerConfig) -> Router {
    let request_id_header = HeaderName::from_static(header_names::REQUEST_ID);

    Router::new()
        .merge(health::HealthRoutes::routes())
        .merge(administrators::AdministratorRoutes::routes(resources.clone()))
        .merge(order_tokens::OrderTokenRoutes::routes(resources.clone()))
        .merge(orders::OrderRoutes::routes(resources.clone()))
        .merge(products::ProductRoutes::routes(resources.clone()))
        .merge(companions::CompanionRoutes::routes(resources.clone()))
        .merge(schedules::ScheduleRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TimeoutLayer::new(Duration::from_secs(
            limits::REQUEST_TIMEOUT_SECS,
        )))
        .layer(RequestBodyLimitLayer::new(limits::MAX_BODY_BYTES))
        .layer(setup_cors(config))
}
