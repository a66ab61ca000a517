// ABOUTME: Database connection management and schema migrations
// ABOUTME: Provides the shared SQLite pool and per-resource storage managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Database Management
//!
//! This module owns the connection pool and the schema. Per-resource
//! operations live in the submodules as `impl Database` blocks.
//!
//! Timestamps are stored as Unix seconds. Correctness across concurrent
//! writers for the same administrator row relies on the store's per-row
//! update semantics; the login path reads the counter and writes the
//! computed value back rather than issuing an atomic increment.

mod administrators;
mod companions;
mod orders;
mod products;
mod revoked_tokens;
mod schedules;

pub use administrators::AdministratorSummary;
pub use orders::{NewOrder, OrderFilter};
pub use products::{NewProduct, ProductFilter, ProductUpdate};
pub use schedules::ScheduleUpsert;

use crate::errors::{AppError, AppResult};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

/// Database manager holding the shared connection pool
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or a migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        // An in-memory database exists per connection; keep the pool at one
        // connection so every query sees the same schema
        let options = if connection_options.contains(":memory:") {
            SqlitePoolOptions::new().max_connections(1)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = options
            .connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_administrators().await?;
        self.migrate_revoked_tokens().await?;
        self.migrate_catalog().await?;
        self.migrate_orders().await?;
        self.migrate_schedules().await?;
        Ok(())
    }

    async fn migrate_administrators(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS administrators (
                admin_code INTEGER PRIMARY KEY AUTOINCREMENT,
                account_name TEXT NOT NULL UNIQUE,
                account_password TEXT NOT NULL,
                login_attempts INTEGER NOT NULL DEFAULT 0,
                blocked_until INTEGER,
                last_attempt INTEGER,
                created_at INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create administrators table: {e}")))?;
        Ok(())
    }

    async fn migrate_revoked_tokens(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS revoked_tokens (
                token TEXT PRIMARY KEY,
                expires_at INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create revoked_tokens table: {e}")))?;
        Ok(())
    }

    async fn migrate_catalog(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS products (
                product_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                product_type TEXT NOT NULL,
                product_sizes TEXT NOT NULL DEFAULT '[]',
                image_url TEXT,
                initially_show INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create products table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS companions (
                companion_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                extra_price REAL NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create companions table: {e}")))?;

        Ok(())
    }

    async fn migrate_orders(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS orders (
                order_id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_name TEXT NOT NULL,
                client_email TEXT NOT NULL,
                client_phone TEXT NOT NULL,
                delivery_date TEXT NOT NULL,
                delivery_time TEXT NOT NULL,
                payment_method TEXT NOT NULL,
                cart_items TEXT NOT NULL DEFAULT '[]',
                order_state INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create orders table: {e}")))?;
        Ok(())
    }

    async fn migrate_schedules(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS schedules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                day TEXT NOT NULL UNIQUE,
                enabled INTEGER NOT NULL DEFAULT 0,
                start_time TEXT,
                end_time TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create schedules table: {e}")))?;
        Ok(())
    }
}
