// ABOUTME: Tests for weekly schedule routes
// ABOUTME: Validates bulk upsert, partial failures, per-day lookup, and admin gating
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{AxumTestRequest, TestSetup};
use serde_json::json;

async fn session_token(setup: &TestSetup) -> String {
    setup.create_admin("admin1", "correct-password").await;
    let response = AxumTestRequest::post("/administrators/login")
        .json(&json!({
            "account_name": "admin1",
            "account_password": "correct-password",
        }))
        .send(setup.router())
        .await;
    let body: serde_json::Value = response.json();
    body["token"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_bulk_upsert_and_lookup() {
    let setup = TestSetup::new().await;
    let token = session_token(&setup).await;

    let response = AxumTestRequest::post("/schedules")
        .bearer(&token)
        .json(&json!({
            "schedules": [
                { "day": "Lunes", "enabled": true, "start_time": "09:00", "end_time": "18:00" },
                { "day": "Domingo", "enabled": false }
            ]
        }))
        .send(setup.router())
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["schedules"].as_array().unwrap().len(), 2);

    // Public per-day lookup
    let monday: serde_json::Value = AxumTestRequest::get("/schedules/Lunes")
        .send(setup.router())
        .await
        .json();
    assert_eq!(monday["enabled"], true);
    assert_eq!(monday["start_time"], "09:00");

    // Disabled days null their window
    let sunday: serde_json::Value = AxumTestRequest::get("/schedules/Domingo")
        .send(setup.router())
        .await
        .json();
    assert_eq!(sunday["enabled"], false);
    assert!(sunday["start_time"].is_null());

    // Unknown day name is rejected
    let unknown = AxumTestRequest::get("/schedules/Funday")
        .send(setup.router())
        .await;
    assert_eq!(unknown.status(), 400);

    // Unconfigured day is a 404
    let missing = AxumTestRequest::get("/schedules/Martes")
        .send(setup.router())
        .await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_bulk_upsert_reports_partial_failures() {
    let setup = TestSetup::new().await;
    let token = session_token(&setup).await;

    let response = AxumTestRequest::post("/schedules")
        .bearer(&token)
        .json(&json!({
            "schedules": [
                { "day": "Lunes", "enabled": true, "start_time": "09:00", "end_time": "18:00" },
                // Window inverted: rejected, but the batch continues
                { "day": "Martes", "enabled": true, "start_time": "20:00", "end_time": "08:00" }
            ]
        }))
        .send(setup.router())
        .await;
    assert_eq!(response.status(), 207);
    let body: serde_json::Value = response.json();
    assert_eq!(body["schedules"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"][0]["day"], "Martes");
}

#[tokio::test]
async fn test_schedule_writes_require_session() {
    let setup = TestSetup::new().await;

    let bulk = AxumTestRequest::post("/schedules")
        .json(&json!({
            "schedules": [
                { "day": "Lunes", "enabled": false }
            ]
        }))
        .send(setup.router())
        .await;
    assert_eq!(bulk.status(), 401);

    let update = AxumTestRequest::put("/schedules/Lunes")
        .json(&json!({ "enabled": false }))
        .send(setup.router())
        .await;
    assert_eq!(update.status(), 401);

    let delete = AxumTestRequest::delete("/schedules/Lunes")
        .send(setup.router())
        .await;
    assert_eq!(delete.status(), 401);
}

#[tokio::test]
async fn test_per_day_update_and_delete() {
    let setup = TestSetup::new().await;
    let token = session_token(&setup).await;

    AxumTestRequest::post("/schedules")
        .bearer(&token)
        .json(&json!({
            "schedules": [
                { "day": "Viernes", "enabled": true, "start_time": "10:00", "end_time": "20:00" }
            ]
        }))
        .send(setup.router())
        .await;

    // Updating a missing day is a 404
    let missing = AxumTestRequest::put("/schedules/Jueves")
        .bearer(&token)
        .json(&json!({ "enabled": true, "start_time": "09:00", "end_time": "17:00" }))
        .send(setup.router())
        .await;
    assert_eq!(missing.status(), 404);

    // Disable the day: times are dropped
    let update = AxumTestRequest::put("/schedules/Viernes")
        .bearer(&token)
        .json(&json!({ "enabled": false }))
        .send(setup.router())
        .await;
    assert_eq!(update.status(), 200);
    let updated: serde_json::Value = update.json();
    assert_eq!(updated["enabled"], false);
    assert!(updated["start_time"].is_null());

    let delete = AxumTestRequest::delete("/schedules/Viernes")
        .bearer(&token)
        .send(setup.router())
        .await;
    assert_eq!(delete.status(), 200);

    let gone = AxumTestRequest::delete("/schedules/Viernes")
        .bearer(&token)
        .send(setup.router())
        .await;
    assert_eq!(gone.status(), 404);
}
