// ABOUTME: Companion catalog route handlers
// ABOUTME: Provides listing for the storefront and CRUD for the admin dashboard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::{AppError, AppResult};
use crate::middleware::authenticate_admin;
use crate::resources::ServerResources;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// New companion body
#[derive(Debug, Deserialize)]
pub struct AddCompanionRequest {
    /// Display name
    pub name: String,
    /// Price added on top of the product price
    pub extra_price: f64,
}

/// Partial companion edit body
#[derive(Debug, Deserialize, Default)]
pub struct EditCompanionRequest {
    /// New name, if changed
    pub name: Option<String>,
    /// New extra price, if changed
    pub extra_price: Option<f64>,
}

/// Confirmation response
#[derive(Debug, Serialize, Deserialize)]
pub struct CompanionMessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().chars().count() < 3 {
        return Err(AppError::invalid_input(
            "Companion name must have at least 3 characters",
        ));
    }
    Ok(())
}

/// Companion routes handler
pub struct CompanionRoutes;

impl CompanionRoutes {
    /// Create all companion routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/companions", get(Self::handle_list))
            .route("/companions/add", post(Self::handle_add))
            .route("/companions/edit/:id", put(Self::handle_edit))
            .route("/companions/delete/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle GET /companions - public listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let companions = resources.database.list_companions().await?;
        Ok((StatusCode::OK, Json(companions)).into_response())
    }

    /// Handle POST /companions/add
    async fn handle_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<AddCompanionRequest>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;
        validate_name(&request.name)?;

        let companion = resources
            .database
            .create_companion(request.name.trim(), request.extra_price)
            .await?;

        Ok((StatusCode::CREATED, Json(companion)).into_response())
    }

    /// Handle PUT /companions/edit/:id
    async fn handle_edit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(request): Json<EditCompanionRequest>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;
        if let Some(name) = &request.name {
            validate_name(name)?;
        }

        resources
            .database
            .update_companion(id, request.name.as_deref(), request.extra_price)
            .await?;

        Ok((
            StatusCode::OK,
            Json(CompanionMessageResponse {
                message: "Companion updated successfully".into(),
            }),
        )
            .into_response())
    }

    /// Handle DELETE /companions/delete/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;

        resources.database.delete_companion(id).await?;
        Ok((
            StatusCode::OK,
            Json(CompanionMessageResponse {
                message: "Companion deleted successfully".into(),
            }),
        )
            .into_response())
    }
}
