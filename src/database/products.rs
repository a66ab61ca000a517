// ABOUTME: Storage operations for catalog products
// ABOUTME: Handles product CRUD, menu filtering, highlight cap, and size lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::Database;
use crate::constants::limits::MAX_HIGHLIGHTED_PRODUCTS;
use crate::errors::{AppError, AppResult};
use crate::models::Product;
use sqlx::{sqlite::SqliteRow, Row};

/// Filter applied when listing products
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    /// Every product
    All,
    /// Products shown on the initial menu screen
    InitiallyShown,
    /// Products of one category
    ByType(String),
}

impl ProductFilter {
    /// Interpret the list path segment the storefront sends
    #[must_use]
    pub fn from_path_segment(segment: &str) -> Self {
        match segment {
            "all" => Self::All,
            "initialProducts" => Self::InitiallyShown,
            other => Self::ByType(other.to_owned()),
        }
    }
}

/// Fields for a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
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

/// Partial update for an existing product
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
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

fn row_to_product(row: &SqliteRow) -> AppResult<Product> {
    let sizes_json: String = row
        .try_get("product_sizes")
        .map_err(|e| AppError::database(format!("Failed to read product_sizes: {e}")))?;
    let product_sizes: Vec<String> = serde_json::from_str(&sizes_json)
        .map_err(|e| AppError::internal(format!("Corrupt product_sizes column: {e}")))?;

    Ok(Product {
        product_id: row
            .try_get("product_id")
            .map_err(|e| AppError::database(format!("Failed to read product_id: {e}")))?,
        name: row
            .try_get("name")
            .map_err(|e| AppError::database(format!("Failed to read name: {e}")))?,
        description: row
            .try_get("description")
            .map_err(|e| AppError::database(format!("Failed to read description: {e}")))?,
        price: row
            .try_get("price")
            .map_err(|e| AppError::database(format!("Failed to read price: {e}")))?,
        product_type: row
            .try_get("product_type")
            .map_err(|e| AppError::database(format!("Failed to read product_type: {e}")))?,
        product_sizes,
        image_url: row
            .try_get("image_url")
            .map_err(|e| AppError::database(format!("Failed to read image_url: {e}")))?,
        initially_show: row
            .try_get("initially_show")
            .map_err(|e| AppError::database(format!("Failed to read initially_show: {e}")))?,
    })
}

fn sizes_to_json(sizes: &[String]) -> AppResult<String> {
    serde_json::to_string(sizes)
        .map_err(|e| AppError::internal(format!("Failed to serialize product sizes: {e}")))
}

impl Database {
    /// List products matching a filter, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_products(&self, filter: &ProductFilter) -> AppResult<Vec<Product>> {
        let rows = match filter {
            ProductFilter::All => {
                sqlx::query("SELECT * FROM products ORDER BY product_id")
                    .fetch_all(self.pool())
                    .await
            }
            ProductFilter::InitiallyShown => {
                sqlx::query(
                    "SELECT * FROM products WHERE initially_show = 1 ORDER BY product_id",
                )
                .fetch_all(self.pool())
                .await
            }
            ProductFilter::ByType(product_type) => {
                sqlx::query("SELECT * FROM products WHERE product_type = $1 ORDER BY product_id")
                    .bind(product_type)
                    .fetch_all(self.pool())
                    .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to list products: {e}")))?;

        rows.iter().map(row_to_product).collect()
    }

    /// Fetch a product by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_product(&self, product_id: i64) -> AppResult<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE product_id = $1")
            .bind(product_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to query product: {e}")))?;

        row.as_ref().map(row_to_product).transpose()
    }

    /// Insert a product and return it with its assigned id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_product(&self, new: &NewProduct) -> AppResult<Product> {
        let result = sqlx::query(
            r"
            INSERT INTO products (name, description, price, product_type, product_sizes, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.product_type)
        .bind(sizes_to_json(&new.product_sizes)?)
        .bind(&new.image_url)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to add product: {e}")))?;

        Ok(Product {
            product_id: result.last_insert_rowid(),
            name: new.name.clone(),
            description: new.description.clone(),
            price: new.price,
            product_type: new.product_type.clone(),
            product_sizes: new.product_sizes.clone(),
            image_url: new.image_url.clone(),
            initially_show: false,
        })
    }

    /// Apply a partial update to an existing product
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the update fails
    pub async fn update_product(&self, product_id: i64, update: &ProductUpdate) -> AppResult<()> {
        let existing = self
            .get_product(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {product_id}")))?;

        let sizes = update
            .product_sizes
            .as_deref()
            .unwrap_or(&existing.product_sizes);

        sqlx::query(
            r"
            UPDATE products
            SET name = $2, description = $3, price = $4, product_type = $5,
                product_sizes = $6, image_url = $7
            WHERE product_id = $1
            ",
        )
        .bind(product_id)
        .bind(update.name.as_ref().unwrap_or(&existing.name))
        .bind(update.description.as_ref().unwrap_or(&existing.description))
        .bind(update.price.unwrap_or(existing.price))
        .bind(update.product_type.as_ref().unwrap_or(&existing.product_type))
        .bind(sizes_to_json(sizes)?)
        .bind(update.image_url.as_ref().or(existing.image_url.as_ref()))
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update product: {e}")))?;

        Ok(())
    }

    /// Delete a product
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the delete fails
    pub async fn delete_product(&self, product_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to delete product: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product {product_id}")));
        }
        Ok(())
    }

    /// Set or clear the initial-menu highlight on a product
    ///
    /// At most [`MAX_HIGHLIGHTED_PRODUCTS`] products may be highlighted at
    /// once; enabling a highlight past the cap is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the cap is reached, the product does not exist,
    /// or the update fails
    pub async fn set_product_highlight(&self, product_id: i64, highlight: bool) -> AppResult<()> {
        if highlight {
            let row = sqlx::query("SELECT COUNT(*) AS n FROM products WHERE initially_show = 1")
                .fetch_one(self.pool())
                .await
                .map_err(|e| {
                    AppError::database(format!("Failed to count highlighted products: {e}"))
                })?;
            let highlighted: i64 = row
                .try_get("n")
                .map_err(|e| AppError::database(format!("Failed to read count: {e}")))?;

            if highlighted >= MAX_HIGHLIGHTED_PRODUCTS {
                return Err(AppError::invalid_input(format!(
                    "At most {MAX_HIGHLIGHTED_PRODUCTS} products can be highlighted"
                )));
            }
        }

        let result = sqlx::query("UPDATE products SET initially_show = $2 WHERE product_id = $1")
            .bind(product_id)
            .bind(highlight)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update highlight: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product {product_id}")));
        }
        Ok(())
    }

    /// Fetch the size list of a product
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the query fails
    pub async fn get_product_sizes(&self, product_id: i64) -> AppResult<Vec<String>> {
        self.get_product(product_id)
            .await?
            .map(|p| p.product_sizes)
            .ok_or_else(|| AppError::not_found(format!("Product {product_id}")))
    }
}
