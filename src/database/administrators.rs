// ABOUTME: Storage operations for administrator accounts
// ABOUTME: Handles account lookup, lockout bookkeeping, listing, and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::lockout::FailureUpdate;
use crate::models::Administrator;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

/// Administrator fields exposed by the list endpoint
///
/// The password hash and lockout bookkeeping never leave the server.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AdministratorSummary {
    /// Unique identifier
    pub admin_code: i64,
    /// Account name
    pub account_name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

fn timestamp(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}

fn parse_timestamp(secs: i64) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::internal(format!("Invalid timestamp in store: {secs}")))
}

fn row_to_administrator(row: &SqliteRow) -> AppResult<Administrator> {
    let blocked_until = row
        .try_get::<Option<i64>, _>("blocked_until")
        .map_err(|e| AppError::database(format!("Failed to read blocked_until: {e}")))?
        .map(parse_timestamp)
        .transpose()?;
    let last_attempt = row
        .try_get::<Option<i64>, _>("last_attempt")
        .map_err(|e| AppError::database(format!("Failed to read last_attempt: {e}")))?
        .map(parse_timestamp)
        .transpose()?;
    let created_at = parse_timestamp(
        row.try_get::<i64, _>("created_at")
            .map_err(|e| AppError::database(format!("Failed to read created_at: {e}")))?,
    )?;

    Ok(Administrator {
        admin_code: row
            .try_get("admin_code")
            .map_err(|e| AppError::database(format!("Failed to read admin_code: {e}")))?,
        account_name: row
            .try_get("account_name")
            .map_err(|e| AppError::database(format!("Failed to read account_name: {e}")))?,
        password_hash: row
            .try_get("account_password")
            .map_err(|e| AppError::database(format!("Failed to read account_password: {e}")))?,
        login_attempts: u32::try_from(
            row.try_get::<i64, _>("login_attempts")
                .map_err(|e| AppError::database(format!("Failed to read login_attempts: {e}")))?
                .max(0),
        )
        .unwrap_or(u32::MAX),
        blocked_until,
        last_attempt,
        created_at,
    })
}

impl Database {
    /// Create an administrator account
    ///
    /// Accounts are provisioned out-of-band (operator tooling and tests);
    /// there is no public registration surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the account name is taken or the insert fails
    pub async fn create_administrator(
        &self,
        account_name: &str,
        password_hash: &str,
    ) -> AppResult<Administrator> {
        let now = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO administrators (account_name, account_password, login_attempts, created_at)
            VALUES ($1, $2, 0, $3)
            ",
        )
        .bind(account_name)
        .bind(password_hash)
        .bind(timestamp(now))
        .execute(self.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::new(
                crate::errors::ErrorCode::ResourceAlreadyExists,
                format!("Administrator {account_name} already exists"),
            ),
            _ => AppError::database(format!("Failed to create administrator: {e}")),
        })?;

        Ok(Administrator {
            admin_code: result.last_insert_rowid(),
            account_name: account_name.to_owned(),
            password_hash: password_hash.to_owned(),
            login_attempts: 0,
            blocked_until: None,
            last_attempt: None,
            created_at: DateTime::from_timestamp(timestamp(now), 0).unwrap_or(now),
        })
    }

    /// Look up an administrator by account name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_administrator_by_name(
        &self,
        account_name: &str,
    ) -> AppResult<Option<Administrator>> {
        let row = sqlx::query("SELECT * FROM administrators WHERE account_name = $1")
            .bind(account_name)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to query administrator: {e}")))?;

        row.as_ref().map(row_to_administrator).transpose()
    }

    /// Look up an administrator by identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_administrator(&self, admin_code: i64) -> AppResult<Option<Administrator>> {
        let row = sqlx::query("SELECT * FROM administrators WHERE admin_code = $1")
            .bind(admin_code)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to query administrator: {e}")))?;

        row.as_ref().map(row_to_administrator).transpose()
    }

    /// Persist the lockout outcome of a failed login attempt
    ///
    /// The caller computed `update` from the counter it previously read;
    /// the write stores that computed value back (no atomic increment).
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn record_failed_login(
        &self,
        admin_code: i64,
        update: FailureUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE administrators
            SET login_attempts = $2, blocked_until = $3, last_attempt = $4
            WHERE admin_code = $1
            ",
        )
        .bind(admin_code)
        .bind(i64::from(update.login_attempts))
        .bind(update.blocked_until.map(timestamp))
        .bind(timestamp(now))
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to record failed login: {e}")))?;

        Ok(())
    }

    /// Reset lockout bookkeeping after a successful login
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn record_successful_login(
        &self,
        admin_code: i64,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE administrators
            SET login_attempts = 0, blocked_until = NULL, last_attempt = $2
            WHERE admin_code = $1
            ",
        )
        .bind(admin_code)
        .bind(timestamp(now))
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to record successful login: {e}")))?;

        Ok(())
    }

    /// List administrators, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_administrators(&self) -> AppResult<Vec<AdministratorSummary>> {
        let rows = sqlx::query(
            "SELECT admin_code, account_name, created_at FROM administrators ORDER BY created_at",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list administrators: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(AdministratorSummary {
                    admin_code: row
                        .try_get("admin_code")
                        .map_err(|e| AppError::database(format!("Failed to read admin_code: {e}")))?,
                    account_name: row.try_get("account_name").map_err(|e| {
                        AppError::database(format!("Failed to read account_name: {e}"))
                    })?,
                    created_at: parse_timestamp(row.try_get("created_at").map_err(|e| {
                        AppError::database(format!("Failed to read created_at: {e}"))
                    })?)?,
                })
            })
            .collect()
    }

    /// Delete an administrator account
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the delete fails
    pub async fn delete_administrator(&self, admin_code: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM administrators WHERE admin_code = $1")
            .bind(admin_code)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to delete administrator: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Administrator {admin_code}")));
        }
        Ok(())
    }
}
