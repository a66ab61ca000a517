// ABOUTME: Storage operations for customer orders
// ABOUTME: Handles order insertion, state filtering, and completion updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{CartItem, Order};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

/// Filter applied when listing orders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    /// Every order
    All,
    /// Orders marked completed
    Completed,
    /// Orders not yet completed
    Incomplete,
}

impl OrderFilter {
    /// Interpret the list path segment the dashboard sends
    #[must_use]
    pub fn from_path_segment(segment: &str) -> Self {
        match segment {
            "completed" => Self::Completed,
            "incomplete" => Self::Incomplete,
            _ => Self::All,
        }
    }
}

/// Fields for a new order, validated by the route layer
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Customer name
    pub client_name: String,
    /// Customer email
    pub client_email: String,
    /// Customer phone number
    pub client_phone: String,
    /// Pickup date
    pub delivery_date: String,
    /// Pickup time
    pub delivery_time: String,
    /// Payment method
    pub payment_method: String,
    /// Ordered items
    pub cart_items: Vec<CartItem>,
}

fn row_to_order(row: &SqliteRow) -> AppResult<Order> {
    let items_json: String = row
        .try_get("cart_items")
        .map_err(|e| AppError::database(format!("Failed to read cart_items: {e}")))?;
    let cart_items: Vec<CartItem> = serde_json::from_str(&items_json)
        .map_err(|e| AppError::internal(format!("Corrupt cart_items column: {e}")))?;
    let created_secs: i64 = row
        .try_get("created_at")
        .map_err(|e| AppError::database(format!("Failed to read created_at: {e}")))?;
    let created_at = DateTime::from_timestamp(created_secs, 0)
        .ok_or_else(|| AppError::internal(format!("Invalid timestamp in store: {created_secs}")))?;

    Ok(Order {
        order_id: row
            .try_get("order_id")
            .map_err(|e| AppError::database(format!("Failed to read order_id: {e}")))?,
        client_name: row
            .try_get("client_name")
            .map_err(|e| AppError::database(format!("Failed to read client_name: {e}")))?,
        client_email: row
            .try_get("client_email")
            .map_err(|e| AppError::database(format!("Failed to read client_email: {e}")))?,
        client_phone: row
            .try_get("client_phone")
            .map_err(|e| AppError::database(format!("Failed to read client_phone: {e}")))?,
        delivery_date: row
            .try_get("delivery_date")
            .map_err(|e| AppError::database(format!("Failed to read delivery_date: {e}")))?,
        delivery_time: row
            .try_get("delivery_time")
            .map_err(|e| AppError::database(format!("Failed to read delivery_time: {e}")))?,
        payment_method: row
            .try_get("payment_method")
            .map_err(|e| AppError::database(format!("Failed to read payment_method: {e}")))?,
        cart_items,
        order_state: row
            .try_get("order_state")
            .map_err(|e| AppError::database(format!("Failed to read order_state: {e}")))?,
        created_at,
    })
}

impl Database {
    /// List orders matching a filter, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_orders(&self, filter: OrderFilter) -> AppResult<Vec<Order>> {
        let rows = match filter {
            OrderFilter::All => {
                sqlx::query("SELECT * FROM orders ORDER BY order_id")
                    .fetch_all(self.pool())
                    .await
            }
            OrderFilter::Completed => {
                sqlx::query("SELECT * FROM orders WHERE order_state = 1 ORDER BY order_id")
                    .fetch_all(self.pool())
                    .await
            }
            OrderFilter::Incomplete => {
                sqlx::query("SELECT * FROM orders WHERE order_state = 0 ORDER BY order_id")
                    .fetch_all(self.pool())
                    .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to list orders: {e}")))?;

        rows.iter().map(row_to_order).collect()
    }

    /// Insert an order and return it with its assigned id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_order(&self, new: &NewOrder) -> AppResult<Order> {
        let now = Utc::now();
        let items_json = serde_json::to_string(&new.cart_items)
            .map_err(|e| AppError::internal(format!("Failed to serialize cart items: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO orders (client_name, client_email, client_phone, delivery_date,
                                delivery_time, payment_method, cart_items, order_state, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8)
            ",
        )
        .bind(&new.client_name)
        .bind(&new.client_email)
        .bind(&new.client_phone)
        .bind(&new.delivery_date)
        .bind(&new.delivery_time)
        .bind(&new.payment_method)
        .bind(&items_json)
        .bind(now.timestamp())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to add order: {e}")))?;

        Ok(Order {
            order_id: result.last_insert_rowid(),
            client_name: new.client_name.clone(),
            client_email: new.client_email.clone(),
            client_phone: new.client_phone.clone(),
            delivery_date: new.delivery_date.clone(),
            delivery_time: new.delivery_time.clone(),
            payment_method: new.payment_method.clone(),
            cart_items: new.cart_items.clone(),
            order_state: false,
            created_at: DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now),
        })
    }

    /// Update the completion state of an order
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the update fails
    pub async fn update_order_state(&self, order_id: i64, order_state: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE orders SET order_state = $2 WHERE order_id = $1")
            .bind(order_id)
            .bind(order_state)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update order: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Order {order_id}")));
        }
        Ok(())
    }

    /// Count stored orders; used by tests and the health surface
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_orders(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM orders")
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to count orders: {e}")))?;
        row.try_get("n")
            .map_err(|e| AppError::database(format!("Failed to read count: {e}")))
    }
}
