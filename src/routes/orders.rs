// ABOUTME: Order route handlers for public intake and the admin dashboard
// ABOUTME: Persists orders behind the admission gate and dispatches the WhatsApp notification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Order routes
//!
//! Submission is public but passes the order admission gate; listing and
//! state edits require an admin session. The WhatsApp dispatch happens
//! after the order is stored and its failure does not undo the insert.

use crate::database::{NewOrder, OrderFilter};
use crate::errors::{AppError, AppResult};
use crate::middleware::{authenticate_admin, authenticate_order};
use crate::models::CartItem;
use crate::notifications::{format_order_message, OrderMessageData};
use crate::resources::ServerResources;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Public order submission body
#[derive(Debug, Deserialize)]
pub struct AddOrderRequest {
    /// Customer name
    pub client_name: String,
    /// Customer email
    pub client_email: String,
    /// Customer phone number
    pub client_phone: String,
    /// Pickup date (YYYY-MM-DD)
    pub delivery_date: String,
    /// Pickup time (HH:MM or HH:MM:SS)
    pub delivery_time: String,
    /// Payment method
    pub payment_method: String,
    /// Ordered items
    pub cart_items: Vec<CartItem>,
}

/// Order state edit body
#[derive(Debug, Deserialize)]
pub struct EditOrderRequest {
    /// New completion state
    pub order_state: bool,
}

/// Confirmation response
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderMessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

fn is_valid_email(email: &str) -> bool {
    if email.len() <= 5 {
        return false;
    }
    let Some(at_pos) = email.find('@') else {
        return false;
    };
    if at_pos == 0 || at_pos == email.len() - 1 {
        return false;
    }
    email[at_pos + 1..].contains('.')
}

fn validate_add_order(request: &AddOrderRequest) -> AppResult<()> {
    let name_len = request.client_name.trim().chars().count();
    if !(3..=20).contains(&name_len) {
        return Err(AppError::invalid_input(
            "Client name must be between 3 and 20 characters",
        ));
    }
    if !is_valid_email(request.client_email.trim()) || request.client_email.len() > 50 {
        return Err(AppError::invalid_input("Client email is invalid"));
    }
    let phone_len = request.client_phone.trim().chars().count();
    if !(3..=20).contains(&phone_len) {
        return Err(AppError::invalid_input("Client phone is invalid"));
    }
    if request.delivery_date.trim().is_empty() {
        return Err(AppError::invalid_input("Delivery date must not be empty"));
    }
    if request.delivery_time.trim().is_empty() {
        return Err(AppError::invalid_input("Delivery time must not be empty"));
    }
    if request.payment_method.trim().is_empty() {
        return Err(AppError::invalid_input("Payment method must not be empty"));
    }
    if request.cart_items.is_empty() {
        return Err(AppError::invalid_input("Cart must not be empty"));
    }
    Ok(())
}

/// Order routes handler
pub struct OrderRoutes;

impl OrderRoutes {
    /// Create all order routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/orders/add", post(Self::handle_add))
            .route("/orders/edit/:id", put(Self::handle_edit))
            .route("/orders/:type_path", get(Self::handle_list))
            .with_state(resources)
    }

    /// Handle GET /orders/:typePath - list orders for the dashboard
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(type_path): Path<String>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;

        let filter = OrderFilter::from_path_segment(&type_path);
        let orders = resources.database.list_orders(filter).await?;
        Ok((StatusCode::OK, Json(orders)).into_response())
    }

    /// Handle PUT /orders/edit/:id - update completion state
    async fn handle_edit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(request): Json<EditOrderRequest>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;

        resources
            .database
            .update_order_state(id, request.order_state)
            .await?;

        Ok((
            StatusCode::OK,
            Json(OrderMessageResponse {
                message: "Order updated successfully".into(),
            }),
        )
            .into_response())
    }

    /// Handle POST /orders/add - public order intake
    ///
    /// The admission gate runs before anything touches the store. The
    /// notification goes out only after the insert succeeded; a channel
    /// failure reports the stored-but-unnotified condition back to the
    /// caller instead of pretending the order was lost.
    async fn handle_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<AddOrderRequest>,
    ) -> Result<Response, AppError> {
        authenticate_order(&headers, &resources.tokens)?;
        validate_add_order(&request)?;

        let new_order = NewOrder {
            client_name: request.client_name,
            client_email: request.client_email,
            client_phone: request.client_phone,
            delivery_date: request.delivery_date,
            delivery_time: request.delivery_time,
            payment_method: request.payment_method,
            cart_items: request.cart_items,
        };
        let order = resources.database.create_order(&new_order).await?;
        tracing::info!(order_id = order.order_id, "Order stored");

        let message = format_order_message(&OrderMessageData {
            client_name: &order.client_name,
            client_email: &order.client_email,
            client_phone: &order.client_phone,
            delivery_date: &order.delivery_date,
            delivery_time: &order.delivery_time,
            payment_method: &order.payment_method,
            cart_items: &order.cart_items,
        });

        if let Err(e) = resources.notifier.send(&message).await {
            tracing::error!(order_id = order.order_id, "Order notification failed: {e}");
            return Err(AppError::external_service(
                "WhatsApp",
                format!("Order saved but notification failed: {e}"),
            ));
        }

        Ok((
            StatusCode::OK,
            Json(OrderMessageResponse {
                message: "Order added successfully".into(),
            }),
        )
            .into_response())
    }
}
