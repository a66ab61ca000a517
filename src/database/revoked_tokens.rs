// ABOUTME: Revocation ledger storage for administrator session tokens
// ABOUTME: Records tokens invalidated before their signed expiry and answers gate lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::Database;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};

impl Database {
    /// Insert a token into the revocation ledger
    ///
    /// `expires_at` is the token's own signed expiry; the ledger entry only
    /// needs to outlive it. Inserting the same token twice is a no-op, so
    /// logout stays idempotent. Rows whose expiry has passed are purged on
    /// the way in; a naturally expired token is rejected by signature
    /// verification regardless of ledger state.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn revoke_token(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < $1")
            .bind(Utc::now().timestamp())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to purge revoked tokens: {e}")))?;

        sqlx::query(
            "INSERT OR REPLACE INTO revoked_tokens (token, expires_at) VALUES ($1, $2)",
        )
        .bind(token)
        .bind(expires_at.timestamp())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to revoke token: {e}")))?;

        Ok(())
    }

    /// Check whether a token appears in the revocation ledger
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails; the protected-route gate
    /// surfaces that as a server error rather than admitting the request
    pub async fn is_token_revoked(&self, token: &str) -> AppResult<bool> {
        let row = sqlx::query("SELECT token FROM revoked_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to check token status: {e}")))?;

        Ok(row.is_some())
    }
}
