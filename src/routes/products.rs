// ABOUTME: Product catalog route handlers for the storefront and admin dashboard
// ABOUTME: Provides listing, CRUD, highlight cap enforcement, and size lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::database::{NewProduct, ProductFilter, ProductUpdate};
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

/// Menu categories offered by the storefront
const PRODUCT_TYPES: [&str; 5] = ["Bananas", "Eskimos", "StrawberriesFruit", "Frappes", "Rolls"];

/// New product body
#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Category
    pub product_type: String,
    /// Offered sizes
    pub product_sizes: Vec<String>,
    /// Public image URL
    pub image_url: Option<String>,
}

/// Partial product edit body
#[derive(Debug, Deserialize, Default)]
pub struct EditProductRequest {
    /// New name, if changed
    pub name: Option<String>,
    /// New description, if changed
    pub description: Option<String>,
    /// New price, if changed
    pub price: Option<f64>,
    /// New category, if changed
    pub product_type: Option<String>,
    /// New size list, if changed
    pub product_sizes: Option<Vec<String>>,
    /// New image URL, if changed
    pub image_url: Option<String>,
}

/// Highlight toggle body
#[derive(Debug, Deserialize)]
pub struct HighlightRequest {
    /// Whether the product appears on the initial menu screen
    pub highlight: bool,
}

/// Confirmation response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductMessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

fn validate_name(name: &str) -> AppResult<()> {
    let len = name.trim().chars().count();
    if !(3..=20).contains(&len) {
        return Err(AppError::invalid_input(
            "Product name must be between 3 and 20 characters",
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> AppResult<()> {
    let len = description.trim().chars().count();
    if !(3..=150).contains(&len) {
        return Err(AppError::invalid_input(
            "Product description must be between 3 and 150 characters",
        ));
    }
    Ok(())
}

fn validate_price(price: f64) -> AppResult<()> {
    if !(0.0..=1000.0).contains(&price) {
        return Err(AppError::invalid_input(
            "Product price must be between 0 and 1000",
        ));
    }
    Ok(())
}

fn validate_type(product_type: &str) -> AppResult<()> {
    if !PRODUCT_TYPES.contains(&product_type) {
        return Err(AppError::invalid_input(format!(
            "Product type must be one of: {}",
            PRODUCT_TYPES.join(", ")
        )));
    }
    Ok(())
}

fn validate_add(request: &AddProductRequest) -> AppResult<()> {
    validate_name(&request.name)?;
    validate_description(&request.description)?;
    validate_price(request.price)?;
    validate_type(&request.product_type)?;
    if request.product_sizes.is_empty() {
        return Err(AppError::invalid_input("Product sizes must not be empty"));
    }
    Ok(())
}

fn validate_edit(request: &EditProductRequest) -> AppResult<()> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    if let Some(description) = &request.description {
        validate_description(description)?;
    }
    if let Some(price) = request.price {
        validate_price(price)?;
    }
    if let Some(product_type) = &request.product_type {
        validate_type(product_type)?;
    }
    if let Some(sizes) = &request.product_sizes {
        if sizes.is_empty() {
            return Err(AppError::invalid_input("Product sizes must not be empty"));
        }
    }
    Ok(())
}

/// Product routes handler
pub struct ProductRoutes;

impl ProductRoutes {
    /// Create all product routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/products/add", post(Self::handle_add))
            .route("/products/edit/:id", put(Self::handle_edit))
            .route("/products/delete/:id", delete(Self::handle_delete))
            .route("/products/highlight/:id", put(Self::handle_highlight))
            .route("/products/sizes/:id", get(Self::handle_sizes))
            .route("/products/:type_path", get(Self::handle_list))
            .with_state(resources)
    }

    /// Handle GET /products/:typePath - public menu listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Path(type_path): Path<String>,
    ) -> Result<Response, AppError> {
        let filter = ProductFilter::from_path_segment(&type_path);
        let products = resources.database.list_products(&filter).await?;
        Ok((StatusCode::OK, Json(products)).into_response())
    }

    /// Handle GET /products/sizes/:id - public size lookup
    async fn handle_sizes(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let sizes = resources.database.get_product_sizes(id).await?;
        Ok((StatusCode::OK, Json(sizes)).into_response())
    }

    /// Handle POST /products/add
    async fn handle_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<AddProductRequest>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;
        validate_add(&request)?;

        let product = resources
            .database
            .create_product(&NewProduct {
                name: request.name,
                description: request.description,
                price: request.price,
                product_type: request.product_type,
                product_sizes: request.product_sizes,
                image_url: request.image_url,
            })
            .await?;

        Ok((StatusCode::CREATED, Json(product)).into_response())
    }

    /// Handle PUT /products/edit/:id
    async fn handle_edit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(request): Json<EditProductRequest>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;
        validate_edit(&request)?;

        resources
            .database
            .update_product(
                id,
                &ProductUpdate {
                    name: request.name,
                    description: request.description,
                    price: request.price,
                    product_type: request.product_type,
                    product_sizes: request.product_sizes,
                    image_url: request.image_url,
                },
            )
            .await?;

        Ok((
            StatusCode::OK,
            Json(ProductMessageResponse {
                message: "Product updated successfully".into(),
            }),
        )
            .into_response())
    }

    /// Handle DELETE /products/delete/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;

        resources.database.delete_product(id).await?;
        Ok((
            StatusCode::OK,
            Json(ProductMessageResponse {
                message: "Product deleted successfully".into(),
            }),
        )
            .into_response())
    }

    /// Handle PUT /products/highlight/:id
    async fn handle_highlight(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(request): Json<HighlightRequest>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;

        resources
            .database
            .set_product_highlight(id, request.highlight)
            .await?;

        Ok((
            StatusCode::OK,
            Json(ProductMessageResponse {
                message: "Product updated successfully".into(),
            }),
        )
            .into_response())
    }
}
