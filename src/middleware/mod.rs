// ABOUTME: Request gates and HTTP middleware for the Comanda API
// ABOUTME: Wires the admin session gate, the order admission gate, and CORS setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Administrator session gate for protected routes
pub mod auth;

/// CORS layer configuration
pub mod cors;

/// Order admission gate for the public submission endpoint
pub mod order_gate;

pub use auth::{authenticate_admin, AdminContext};
pub use cors::setup_cors;
pub use order_gate::authenticate_order;
