// ABOUTME: Administrator route handlers for login, logout, listing, and deletion
// ABOUTME: Runs the lockout state machine and the session refresh and revocation rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Administrator authentication routes
//!
//! The login handler is the only writer of the lockout bookkeeping:
//!
//! 1. Account lookup; unknown names get the same rejection as wrong
//!    passwords so account names cannot be enumerated.
//! 2. Active lockout windows reject the attempt before any credential
//!    comparison and without touching the counter.
//! 3. A failed comparison registers the failure and may open or extend a
//!    window; a success resets the bookkeeping.
//! 4. A login carrying a still-valid session for the same account is a
//!    refresh: the old token goes to the revocation ledger and the new one
//!    gets the longer lifetime.

use crate::auth::{SessionTtl, TokenClaims, TokenClass};
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::lockout::{self, LockoutDecision};
use crate::middleware::authenticate_admin;
use crate::resources::ServerResources;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account name
    pub account_name: String,
    /// Account password
    pub account_password: String,
}

/// Login response body
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Fresh session token
    pub token: String,
    /// Human-readable confirmation
    pub message: String,
}

/// Logout response body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Administrator routes handler
pub struct AdministratorRoutes;

impl AdministratorRoutes {
    /// Create all administrator routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/administrators/login", post(Self::handle_login))
            .route("/administrators/logout", post(Self::handle_logout))
            .route("/administrators", get(Self::handle_list))
            .route(
                "/administrators/delete/:admin_code",
                delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    fn validate_login(request: &LoginRequest) -> AppResult<()> {
        let name_len = request.account_name.chars().count();
        if !(4..=15).contains(&name_len) {
            return Err(AppError::invalid_input(
                "Account name must be between 4 and 15 characters",
            ));
        }
        let password_len = request.account_password.chars().count();
        if !(8..=25).contains(&password_len) {
            return Err(AppError::invalid_input(
                "Password must be between 8 and 25 characters",
            ));
        }
        Ok(())
    }

    /// Determine the session lifetime for a successful login
    ///
    /// A request carrying a valid, non-revoked session token for the same
    /// account is a refresh: the old token is revoked with its true expiry
    /// and the replacement gets the longer lifetime. Everything else is a
    /// normal login.
    async fn refresh_or_normal(
        headers: &HeaderMap,
        resources: &ServerResources,
        admin_code: i64,
    ) -> AppResult<SessionTtl> {
        let Some(previous) = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
        else {
            return Ok(SessionTtl::Normal);
        };

        let Ok(claims) = resources.tokens.verify(previous, TokenClass::Session) else {
            return Ok(SessionTtl::Normal);
        };
        let TokenClaims::Session {
            admin_code: previous_code,
            exp,
            ..
        } = claims
        else {
            return Ok(SessionTtl::Normal);
        };
        if previous_code != admin_code {
            return Ok(SessionTtl::Normal);
        }

        if resources.database.is_token_revoked(previous).await? {
            return Ok(SessionTtl::Normal);
        }

        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AppError::internal(format!("Invalid expiry in token: {exp}")))?;
        resources.database.revoke_token(previous, expires_at).await?;
        tracing::info!(admin_code, "Session refresh: previous token revoked");

        Ok(SessionTtl::Refresh)
    }

    /// Handle POST /administrators/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        Self::validate_login(&request)?;
        tracing::info!("Login attempt for account: {}", request.account_name);

        let admin = resources
            .database
            .get_administrator_by_name(&request.account_name)
            .await?
            .ok_or_else(|| AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))?;

        let now = Utc::now();

        // Active window: reject before any credential comparison, counter untouched
        if let LockoutDecision::Blocked { remaining_minutes } =
            lockout::evaluate(admin.blocked_until, now)
        {
            tracing::warn!(
                admin_code = admin.admin_code,
                remaining_minutes,
                "Login rejected: account locked"
            );
            return Err(AppError::account_locked(remaining_minutes));
        }

        // bcrypt comparison off the async executor; the hash comparison
        // inside bcrypt::verify is constant-time
        let password = request.account_password;
        let password_hash = admin.password_hash.clone();
        let is_valid = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if !is_valid {
            let update = lockout::register_failure(admin.login_attempts, now);
            resources
                .database
                .record_failed_login(admin.admin_code, update, now)
                .await?;

            // Crossing the threshold answers as locked right away
            if let Some(blocked_until) = update.blocked_until {
                let remaining = lockout::remaining_minutes(blocked_until, now);
                tracing::warn!(
                    admin_code = admin.admin_code,
                    attempts = update.login_attempts,
                    "Login failed: lockout window opened"
                );
                return Err(AppError::account_locked(remaining));
            }

            tracing::warn!(
                admin_code = admin.admin_code,
                attempts = update.login_attempts,
                "Login failed: wrong password"
            );
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        }

        resources
            .database
            .record_successful_login(admin.admin_code, now)
            .await?;

        let ttl = Self::refresh_or_normal(&headers, &resources, admin.admin_code).await?;
        let token =
            resources
                .tokens
                .issue_session_token(admin.admin_code, &admin.account_name, ttl)?;

        tracing::info!(
            admin_code = admin.admin_code,
            refresh = matches!(ttl, SessionTtl::Refresh),
            "Login successful"
        );

        Ok((
            StatusCode::OK,
            Json(LoginResponse {
                token,
                message: "Login successful".into(),
            }),
        )
            .into_response())
    }

    /// Handle POST /administrators/logout
    ///
    /// The token is inserted into the revocation ledger with the expiry
    /// read from its own claims; no signature check is required since the
    /// token is being invalidated regardless. Logging out an already
    /// expired token is a harmless no-op.
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let token = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::auth_required(error_messages::NO_TOKEN_PROVIDED))?;

        let claims = resources
            .tokens
            .decode_unsafe(token)
            .map_err(|_| AppError::invalid_input(error_messages::INVALID_TOKEN))?;

        // Only session tokens carry an admin identity worth revoking
        let TokenClaims::Session { exp, admin_code, .. } = claims else {
            return Err(AppError::invalid_input(error_messages::INVALID_TOKEN));
        };

        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AppError::invalid_input(error_messages::INVALID_TOKEN))?;
        resources.database.revoke_token(token, expires_at).await?;

        tracing::info!(admin_code, "Logout: token revoked");

        Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: "Logged out successfully".into(),
            }),
        )
            .into_response())
    }

    /// Handle GET /administrators
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        authenticate_admin(&headers, &resources).await?;

        let administrators = resources.database.list_administrators().await?;
        Ok((StatusCode::OK, Json(administrators)).into_response())
    }

    /// Handle DELETE /administrators/delete/:admin_code
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(admin_code): Path<i64>,
    ) -> Result<Response, AppError> {
        let context = authenticate_admin(&headers, &resources).await?;

        resources.database.delete_administrator(admin_code).await?;
        tracing::info!(
            deleted = admin_code,
            by = context.admin_code,
            "Administrator deleted"
        );

        Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: "Administrator deleted successfully".into(),
            }),
        )
            .into_response())
    }
}
