// ABOUTME: Storage operations for weekly operating schedules
// ABOUTME: Handles per-day window upsert, lookup, and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Schedule, Weekday};
use sqlx::{sqlite::SqliteRow, Row};

/// Per-day window to create or replace
///
/// A disabled day stores null times regardless of what the caller sent.
#[derive(Debug, Clone)]
pub struct ScheduleUpsert {
    /// Day of the week
    pub day: Weekday,
    /// Whether the business operates on this day
    pub enabled: bool,
    /// Opening time (HH:MM)
    pub start_time: Option<String>,
    /// Closing time (HH:MM)
    pub end_time: Option<String>,
}

fn row_to_schedule(row: &SqliteRow) -> AppResult<Schedule> {
    let day_str: String = row
        .try_get("day")
        .map_err(|e| AppError::database(format!("Failed to read day: {e}")))?;
    let day = Weekday::parse(&day_str)
        .ok_or_else(|| AppError::internal(format!("Unknown day in store: {day_str}")))?;

    Ok(Schedule {
        id: row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Failed to read id: {e}")))?,
        day,
        enabled: row
            .try_get("enabled")
            .map_err(|e| AppError::database(format!("Failed to read enabled: {e}")))?,
        start_time: row
            .try_get("start_time")
            .map_err(|e| AppError::database(format!("Failed to read start_time: {e}")))?,
        end_time: row
            .try_get("end_time")
            .map_err(|e| AppError::database(format!("Failed to read end_time: {e}")))?,
    })
}

impl Database {
    /// List every configured day, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_schedules(&self) -> AppResult<Vec<Schedule>> {
        let rows = sqlx::query("SELECT * FROM schedules ORDER BY id")
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to list schedules: {e}")))?;

        rows.iter().map(row_to_schedule).collect()
    }

    /// Fetch the window of one day
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_schedule(&self, day: Weekday) -> AppResult<Option<Schedule>> {
        let row = sqlx::query("SELECT * FROM schedules WHERE day = $1")
            .bind(day.as_str())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to query schedule: {e}")))?;

        row.as_ref().map(row_to_schedule).transpose()
    }

    /// Create or replace the window of one day
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails
    pub async fn upsert_schedule(&self, upsert: &ScheduleUpsert) -> AppResult<Schedule> {
        // Disabled days drop their window
        let (start_time, end_time) = if upsert.enabled {
            (upsert.start_time.as_deref(), upsert.end_time.as_deref())
        } else {
            (None, None)
        };

        sqlx::query(
            r"
            INSERT INTO schedules (day, enabled, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(day) DO UPDATE SET
                enabled = excluded.enabled,
                start_time = excluded.start_time,
                end_time = excluded.end_time
            ",
        )
        .bind(upsert.day.as_str())
        .bind(upsert.enabled)
        .bind(start_time)
        .bind(end_time)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert schedule: {e}")))?;

        self.get_schedule(upsert.day)
            .await?
            .ok_or_else(|| AppError::internal("Schedule vanished after upsert"))
    }

    /// Delete the window of one day
    ///
    /// # Errors
    ///
    /// Returns an error if no window exists for the day or the delete fails
    pub async fn delete_schedule(&self, day: Weekday) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM schedules WHERE day = $1")
            .bind(day.as_str())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to delete schedule: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Schedule for {day}")));
        }
        Ok(())
    }
}
