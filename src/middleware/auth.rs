// ABOUTME: Administrator session gate applied to every admin-protected request
// ABOUTME: Checks bearer extraction, revocation ledger, signature, expiry, and token class
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Protected-Route Gate
//!
//! Order of checks, each terminating the request on failure:
//!
//! 1. Bearer token extraction from the authorization header (401 when absent)
//! 2. Revocation ledger lookup (500 when the lookup itself fails, 401 when
//!    the token is in the ledger)
//! 3. Signature, expiry, and type-claim verification (401 on any failure,
//!    with expiry distinguished)
//!
//! The ledger is consulted before signature verification so a revoked token
//! is rejected for revocation, not for whatever else may be wrong with it.

use crate::auth::{TokenClaims, TokenClass, TokenError};
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::resources::ServerResources;
use axum::http::HeaderMap;

/// Decoded admin identity attached to an admitted request
#[derive(Debug, Clone)]
pub struct AdminContext {
    /// Administrator identifier from the token
    pub admin_code: i64,
    /// Administrator account name from the token
    pub account_name: String,
}

/// Extract the bearer token from the authorization header
///
/// # Errors
///
/// Returns 401 when the header is absent or not a bearer credential
pub fn extract_bearer(headers: &HeaderMap) -> AppResult<&str> {
    let header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::auth_required(error_messages::NO_TOKEN_PROVIDED))?;

    header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::auth_invalid(error_messages::INVALID_TOKEN))
}

/// Admit or reject an admin-protected request
///
/// # Errors
///
/// Rejects per the gate order documented on this module
pub async fn authenticate_admin(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<AdminContext> {
    let token = extract_bearer(headers)?;

    let revoked = resources
        .database
        .is_token_revoked(token)
        .await
        .map_err(|e| {
            tracing::error!("Revocation ledger lookup failed: {e}");
            AppError::new(
                ErrorCode::DatabaseError,
                error_messages::REVOCATION_CHECK_FAILED,
            )
        })?;
    if revoked {
        tracing::warn!("Rejected revoked session token");
        return Err(AppError::auth_revoked());
    }

    let claims = resources
        .tokens
        .verify(token, TokenClass::Session)
        .map_err(|e| match e {
            TokenError::Expired => AppError::auth_expired(),
            TokenError::Invalid | TokenError::TypeMismatch => {
                AppError::auth_invalid(error_messages::INVALID_TOKEN)
            }
        })?;

    match claims {
        TokenClaims::Session {
            admin_code,
            account_name,
            ..
        } => Ok(AdminContext {
            admin_code,
            account_name,
        }),
        // verify() already rejected non-session claims
        TokenClaims::Order { .. } => Err(AppError::auth_invalid(error_messages::INVALID_TOKEN)),
    }
}
