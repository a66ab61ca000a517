// ABOUTME: Main library entry point for the Comanda order-intake API
// ABOUTME: Exposes catalog, order admission, and administrator authentication modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Comanda Server
//!
//! Order-intake and catalog-management API for a small food-ordering
//! business: products, add-on companions, orders, administrators, and
//! weekly operating schedules, backed by a relational store with a
//! WhatsApp notification side effect on order intake.
//!
//! ## Architecture
//!
//! The server follows a modular architecture:
//! - **Auth**: signed, time-limited tokens in two independent classes
//!   (administrator sessions and ephemeral order tokens)
//! - **Lockout**: pure escalating-lockout policy for failed admin logins
//! - **Middleware**: request gates for admin-protected and order-gated routes
//! - **Database**: `SQLite`-backed storage managers per resource
//! - **Routes**: REST handlers per resource
//! - **Notifications**: WhatsApp dispatch for incoming orders
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use comanda::config::ServerConfig;
//! use comanda::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     // Load configuration from the environment
//!     let config = ServerConfig::from_env()?;
//!     println!("Comanda server configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Token issuance and verification for session and order tokens
pub mod auth;

/// Environment-based configuration management
pub mod config;

/// System-wide constants and limits
pub mod constants;

/// Database access layer and per-resource storage managers
pub mod database;

/// Unified error handling system
pub mod errors;

/// Escalating lockout policy for failed administrator logins
pub mod lockout;

/// Structured logging configuration
pub mod logging;

/// Request gates and HTTP middleware
pub mod middleware;

/// Domain models shared across storage and routes
pub mod models;

/// Outbound notification dispatch (WhatsApp)
pub mod notifications;

/// Shared server state handed to route handlers
pub mod resources;

/// HTTP route handlers and router assembly
pub mod routes;
