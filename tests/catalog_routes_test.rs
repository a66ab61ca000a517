// ABOUTME: Tests for product and companion catalog routes
// ABOUTME: Validates public listing, admin-gated writes, validation limits, and the highlight cap
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

fn product_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": "Plátano con chocolate y toppings",
        "price": 45.0,
        "product_type": "Bananas",
        "product_sizes": ["Chico", "Grande"],
        "image_url": "https://cdn.example.com/banana.jpg"
    })
}

#[tokio::test]
async fn test_product_writes_require_session() {
    let setup = TestSetup::new().await;

    let response = AxumTestRequest::post("/products/add")
        .json(&product_body("Banana clásica"))
        .send(setup.router())
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_product_crud_and_filters() {
    let setup = TestSetup::new().await;
    let token = session_token(&setup).await;

    // Create two products in different categories
    let created = AxumTestRequest::post("/products/add")
        .bearer(&token)
        .json(&product_body("Banana clásica"))
        .send(setup.router())
        .await;
    assert_eq!(created.status(), 201);
    let created_body: serde_json::Value = created.json();
    let product_id = created_body["product_id"].as_i64().unwrap();

    let mut frappe = product_body("Frappe moka");
    frappe["product_type"] = json!("Frappes");
    AxumTestRequest::post("/products/add")
        .bearer(&token)
        .json(&frappe)
        .send(setup.router())
        .await;

    // Public listing, no token needed
    let all: serde_json::Value = AxumTestRequest::get("/products/all")
        .send(setup.router())
        .await
        .json();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let bananas: serde_json::Value = AxumTestRequest::get("/products/Bananas")
        .send(setup.router())
        .await
        .json();
    assert_eq!(bananas.as_array().unwrap().len(), 1);

    // Sizes lookup
    let sizes: serde_json::Value = AxumTestRequest::get(&format!("/products/sizes/{product_id}"))
        .send(setup.router())
        .await
        .json();
    assert_eq!(sizes, json!(["Chico", "Grande"]));

    // Partial edit keeps the untouched fields
    let edit = AxumTestRequest::put(&format!("/products/edit/{product_id}"))
        .bearer(&token)
        .json(&json!({ "price": 50.0 }))
        .send(setup.router())
        .await;
    assert_eq!(edit.status(), 200);

    let after_edit: serde_json::Value = AxumTestRequest::get("/products/Bananas")
        .send(setup.router())
        .await
        .json();
    assert!((after_edit[0]["price"].as_f64().unwrap() - 50.0).abs() < f64::EPSILON);
    assert_eq!(after_edit[0]["name"], "Banana clásica");

    // Delete
    let delete = AxumTestRequest::delete(&format!("/products/delete/{product_id}"))
        .bearer(&token)
        .send(setup.router())
        .await;
    assert_eq!(delete.status(), 200);

    let remaining: serde_json::Value = AxumTestRequest::get("/products/all")
        .send(setup.router())
        .await
        .json();
    assert_eq!(remaining.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_product_validation_limits() {
    let setup = TestSetup::new().await;
    let token = session_token(&setup).await;

    let mut too_expensive = product_body("Banana cara");
    too_expensive["price"] = json!(1500.0);
    let response = AxumTestRequest::post("/products/add")
        .bearer(&token)
        .json(&too_expensive)
        .send(setup.router())
        .await;
    assert_eq!(response.status(), 400);

    let mut wrong_type = product_body("Banana rara");
    wrong_type["product_type"] = json!("Tacos");
    let response = AxumTestRequest::post("/products/add")
        .bearer(&token)
        .json(&wrong_type)
        .send(setup.router())
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_highlight_cap() {
    let setup = TestSetup::new().await;
    let token = session_token(&setup).await;

    let mut ids = Vec::new();
    for i in 0..6 {
        let created: serde_json::Value = AxumTestRequest::post("/products/add")
            .bearer(&token)
            .json(&product_body(&format!("Banana {i}")))
            .send(setup.router())
            .await
            .json();
        ids.push(created["product_id"].as_i64().unwrap());
    }

    // First five highlights succeed
    for id in &ids[..5] {
        let response = AxumTestRequest::put(&format!("/products/highlight/{id}"))
            .bearer(&token)
            .json(&json!({ "highlight": true }))
            .send(setup.router())
            .await;
        assert_eq!(response.status(), 200);
    }

    // The sixth hits the cap
    let response = AxumTestRequest::put(&format!("/products/highlight/{}", ids[5]))
        .bearer(&token)
        .json(&json!({ "highlight": true }))
        .send(setup.router())
        .await;
    assert_eq!(response.status(), 400);

    // Un-highlighting frees a slot
    let response = AxumTestRequest::put(&format!("/products/highlight/{}", ids[0]))
        .bearer(&token)
        .json(&json!({ "highlight": false }))
        .send(setup.router())
        .await;
    assert_eq!(response.status(), 200);

    let response = AxumTestRequest::put(&format!("/products/highlight/{}", ids[5]))
        .bearer(&token)
        .json(&json!({ "highlight": true }))
        .send(setup.router())
        .await;
    assert_eq!(response.status(), 200);

    // The initial-menu filter returns exactly the highlighted five
    let shown: serde_json::Value = AxumTestRequest::get("/products/initialProducts")
        .send(setup.router())
        .await
        .json();
    assert_eq!(shown.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_companion_crud() {
    let setup = TestSetup::new().await;
    let token = session_token(&setup).await;

    // Writes are gated
    let unauthorized = AxumTestRequest::post("/companions/add")
        .json(&json!({ "name": "Nutella", "extra_price": 10.0 }))
        .send(setup.router())
        .await;
    assert_eq!(unauthorized.status(), 401);

    let created = AxumTestRequest::post("/companions/add")
        .bearer(&token)
        .json(&json!({ "name": "Nutella", "extra_price": 10.0 }))
        .send(setup.router())
        .await;
    assert_eq!(created.status(), 201);
    let created_body: serde_json::Value = created.json();
    let companion_id = created_body["companion_id"].as_i64().unwrap();

    // Public listing
    let listed: serde_json::Value = AxumTestRequest::get("/companions")
        .send(setup.router())
        .await
        .json();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Partial edit
    let edit = AxumTestRequest::put(&format!("/companions/edit/{companion_id}"))
        .bearer(&token)
        .json(&json!({ "extra_price": 12.5 }))
        .send(setup.router())
        .await;
    assert_eq!(edit.status(), 200);

    let listed: serde_json::Value = AxumTestRequest::get("/companions")
        .send(setup.router())
        .await
        .json();
    assert!((listed[0]["extra_price"].as_f64().unwrap() - 12.5).abs() < f64::EPSILON);
    assert_eq!(listed[0]["name"], "Nutella");

    // Name too short
    let invalid = AxumTestRequest::post("/companions/add")
        .bearer(&token)
        .json(&json!({ "name": "ab", "extra_price": 1.0 }))
        .send(setup.router())
        .await;
    assert_eq!(invalid.status(), 400);

    // Delete
    let delete = AxumTestRequest::delete(&format!("/companions/delete/{companion_id}"))
        .bearer(&token)
        .send(setup.router())
        .await;
    assert_eq!(delete.status(), 200);

    let missing = AxumTestRequest::delete(&format!("/companions/delete/{companion_id}"))
        .bearer(&token)
        .send(setup.router())
        .await;
    assert_eq!(missing.status(), 404);
}
