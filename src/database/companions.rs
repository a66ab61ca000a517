// ABOUTME: Storage operations for add-on companions
// ABOUTME: Handles companion CRUD for the catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Companion;
use sqlx::{sqlite::SqliteRow, Row};

fn row_to_companion(row: &SqliteRow) -> AppResult<Companion> {
    Ok(Companion {
        companion_id: row
            .try_get("companion_id")
            .map_err(|e| AppError::database(format!("Failed to read companion_id: {e}")))?,
        name: row
            .try_get("name")
            .map_err(|e| AppError::database(format!("Failed to read name: {e}")))?,
        extra_price: row
            .try_get("extra_price")
            .map_err(|e| AppError::database(format!("Failed to read extra_price: {e}")))?,
    })
}

impl Database {
    /// List companions in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_companions(&self) -> AppResult<Vec<Companion>> {
        let rows = sqlx::query("SELECT * FROM companions ORDER BY companion_id")
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to list companions: {e}")))?;

        rows.iter().map(row_to_companion).collect()
    }

    /// Insert a companion and return it with its assigned id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_companion(&self, name: &str, extra_price: f64) -> AppResult<Companion> {
        let result = sqlx::query("INSERT INTO companions (name, extra_price) VALUES ($1, $2)")
            .bind(name)
            .bind(extra_price)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to add companion: {e}")))?;

        Ok(Companion {
            companion_id: result.last_insert_rowid(),
            name: name.to_owned(),
            extra_price,
        })
    }

    /// Apply a partial update to an existing companion
    ///
    /// # Errors
    ///
    /// Returns an error if the companion does not exist or the update fails
    pub async fn update_companion(
        &self,
        companion_id: i64,
        name: Option<&str>,
        extra_price: Option<f64>,
    ) -> AppResult<()> {
        let row = sqlx::query("SELECT * FROM companions WHERE companion_id = $1")
            .bind(companion_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to query companion: {e}")))?;
        let existing = row
            .as_ref()
            .map(row_to_companion)
            .transpose()?
            .ok_or_else(|| AppError::not_found(format!("Companion {companion_id}")))?;

        sqlx::query("UPDATE companions SET name = $2, extra_price = $3 WHERE companion_id = $1")
            .bind(companion_id)
            .bind(name.unwrap_or(&existing.name))
            .bind(extra_price.unwrap_or(existing.extra_price))
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update companion: {e}")))?;

        Ok(())
    }

    /// Delete a companion
    ///
    /// # Errors
    ///
    /// Returns an error if the companion does not exist or the delete fails
    pub async fn delete_companion(&self, companion_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM companions WHERE companion_id = $1")
            .bind(companion_id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to delete companion: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Companion {companion_id}")));
        }
        Ok(())
    }
}
