// ABOUTME: Weekly schedule route handlers for operating windows
// ABOUTME: Provides public window lookup and admin-gated per-day and bulk edits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Schedule routes
//!
//! The bulk upsert processes each day independently; partial failures are
//! reported with a multi-status payload instead of failing the whole batch.

use crate::database::ScheduleUpsert;
use crate::errors::{AppError, AppResult};
use crate::middleware::authenticate_admin;
use crate::models::{Schedule, Weekday};
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

/// One day's window in a bulk upsert
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleEntry {
    /// Day of the week (Spanish name)
    pub day: String,
    /// Whether the business operates on this day
    pub enabled: bool,
    /// Opening time (HH:MM), required when enabled
    #[serde(default)]
    pub start_time: Option<String>,
    /// Closing time (HH:MM), required when enabled
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Bulk upsert body
#[derive(Debug, Deserialize)]
pub struct BulkScheduleRequest {
    /// Windows to create or replace
    pub schedules: Vec<ScheduleEntry>,
}

/// Per-day edit body
#[derive(Debug, Deserialize)]
pub struct EditScheduleRequest {
    /// Whether the business operates on this day
    pub enabled: bool,
    /// Opening time (HH:MM), required when enabled
    #[serde(default)]
    pub start_time: Option<String>,
    /// Closing time (HH:MM), required when enabled
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Per-day failure inside a bulk upsert
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleFailure {
    /// The day that failed
    pub day: String,
    /// Failure description
    pub error: String,
}

/// Bulk upsert outcome
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkScheduleResponse {
    /// Human-readable summary
    pub message: String,
    /// Successfully stored windows
    pub schedules: Vec<Schedule>,
    /// Per-day failures, omitted when empty
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<ScheduleFailure>,
}

/// Confirmation response
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleMessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

fn is_valid_time(time: &str) -> bool {
    let Some((hours, minutes)) = time.split_once(':') else {
        return false;
    };
    let (Ok(h), Ok(m)) = (hours.parse::<u32>(), minutes.parse::<u32>()) else {
        return false;
    };
    h <= 23 && m <= 59 && minutes.len() == 2
}

fn minutes_of(time: &str) -> Option<u32> {
    let (hours, minutes) = time.split_once(':')?;
    Some(hours.parse::<u32>().ok()? * 60 + minutes.parse::<u32>().ok()?)
}

fn parse_day(day: &str) -> AppResult<Weekday> {
    Weekday::parse(day.trim()).ok_or_else(|| {
        AppError::invalid_input(format!(
            "Day must be one of: {}",
            Weekday::ALL.map(Weekday::as_str).join(", ")
        ))
    })
}

fn validate_window(
    enabled: bool,
    start_time: Option<&str>,
    end_time: Option<&str>,
) -> AppResult<()> {
    if !enabled {
        return Ok(());
    }
    let start = start_time
        .ok_or_else(|| AppError::invalid_input("start_time is required when enabled is true"))?;
    let end = end_time
        .ok_or_else(|| AppError::invalid_input("end_time is required when enabled is true"))?;
    if !is_valid_time(start) {
        return Err(AppError::invalid_input("start_time must be HH:MM (24-hour)"));
    }
    if !is_valid_time(end) {
        return Err(AppError::invalid_input("end_time must be HH:MM (24-hour)"));
    }
    if minutes_of(start) >= minutes_of(end) {
        return Err(AppError::invalid_input(
            "start_time must be earlier than end_time",
        ));
    }
    Ok(())
}

/// Schedule routes handler
pub struct ScheduleRoutes;

impl ScheduleRoutes {
    /// Create all schedule routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/schedules", get(Self::handle_list))
            .route("/schedules", post(Self::handle_bulk_upsert))
            .route("/schedules/:day", get(Self::handle_get))
            .route("/schedules/:day", put(Self::handle_update))
            .route("/schedules/:day", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle GET /schedules - public listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let schedules = resources.database.list_schedules().await?;
        Ok((StatusCode::OK, Json(schedules)).into_response())
    }

    /// Handle GET /schedules/:day - public single-day lookup
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(day): Path<String>,
    ) -> Result<Response, AppError> {
        let day = parse_day(&day)?;
        let schedule = resources
            .database
            .get_schedule(day)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Schedule for {day}")))?;

        Ok((StatusCode::OK, Json(schedule)).into_response())
    }

    /// Handle POST /schedules - bulk create or update
    async fn handle_bulk_upsert(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<BulkScheduleRequest>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;

        if request.schedules.is_empty() {
            return Err(AppError::invalid_input(
                "At least one schedule must be provided",
            ));
        }

        let mut stored = Vec::new();
        let mut failures = Vec::new();

        for entry in &request.schedules {
            let outcome = Self::upsert_entry(&resources, entry).await;
            match outcome {
                Ok(schedule) => stored.push(schedule),
                Err(e) => failures.push(ScheduleFailure {
                    day: entry.day.clone(),
                    error: e.message,
                }),
            }
        }

        if stored.is_empty() && !failures.is_empty() {
            return Err(
                AppError::internal("Failed to process schedules").with_details(
                    serde_json::to_value(&failures).unwrap_or(serde_json::Value::Null),
                ),
            );
        }

        let status = if failures.is_empty() {
            StatusCode::OK
        } else {
            StatusCode::MULTI_STATUS
        };
        let message = if failures.is_empty() {
            "Schedules stored successfully"
        } else {
            "Some schedules were stored successfully"
        };

        Ok((
            status,
            Json(BulkScheduleResponse {
                message: message.into(),
                schedules: stored,
                errors: failures,
            }),
        )
            .into_response())
    }

    async fn upsert_entry(
        resources: &ServerResources,
        entry: &ScheduleEntry,
    ) -> AppResult<Schedule> {
        let day = parse_day(&entry.day)?;
        validate_window(
            entry.enabled,
            entry.start_time.as_deref(),
            entry.end_time.as_deref(),
        )?;

        resources
            .database
            .upsert_schedule(&ScheduleUpsert {
                day,
                enabled: entry.enabled,
                start_time: entry.start_time.clone(),
                end_time: entry.end_time.clone(),
            })
            .await
    }

    /// Handle PUT /schedules/:day - single-day update
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(day): Path<String>,
        Json(request): Json<EditScheduleRequest>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;

        let day = parse_day(&day)?;
        validate_window(
            request.enabled,
            request.start_time.as_deref(),
            request.end_time.as_deref(),
        )?;

        // Route mirrors the dashboard's edit flow: the day must already exist
        resources
            .database
            .get_schedule(day)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Schedule for {day}")))?;

        let schedule = resources
            .database
            .upsert_schedule(&ScheduleUpsert {
                day,
                enabled: request.enabled,
                start_time: request.start_time,
                end_time: request.end_time,
            })
            .await?;

        Ok((StatusCode::OK, Json(schedule)).into_response())
    }

    /// Handle DELETE /schedules/:day
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(day): Path<String>,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;

        let day = parse_day(&day)?;
        resources.database.delete_schedule(day).await?;

        Ok((
            StatusCode::OK,
            Json(ScheduleMessageResponse {
                message: format!("Schedule for {day} deleted successfully"),
            }),
        )
            .into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_format_validation() {
        assert!(is_valid_time("09:30"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("12:60"));
        assert!(!is_valid_time("12:5"));
        assert!(!is_valid_time("noon"));
    }

    #[test]
    fn test_window_validation() {
        assert!(validate_window(true, Some("09:00"), Some("17:00")).is_ok());
        assert!(validate_window(true, Some("17:00"), Some("09:00")).is_err());
        assert!(validate_window(true, Some("09:00"), Some("09:00")).is_err());
        assert!(validate_window(true, None, Some("17:00")).is_err());
        // Disabled days skip window checks entirely
        assert!(validate_window(false, None, None).is_ok());
    }
}
