// ABOUTME: Order-token issuance endpoint for the public storefront
// ABOUTME: Hands out short-lived admission tokens ahead of order submission
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response carrying a fresh order token
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderTokenResponse {
    /// Signed order-admission token
    pub token: String,
}

/// Order-token routes handler
pub struct OrderTokenRoutes;

impl OrderTokenRoutes {
    /// Create the order-token issuance route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/orders/generateToken", post(Self::handle_generate))
            .with_state(resources)
    }

    /// Handle POST /orders/generateToken
    ///
    /// The storefront requests a token immediately before submitting an
    /// order; the window is a handful of seconds by design.
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let token = resources.tokens.issue_order_token()?;
        Ok((StatusCode::OK, Json(OrderTokenResponse { token })).into_response())
    }
}
