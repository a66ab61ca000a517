// ABOUTME: Order admission gate applied to the public order-submission endpoint
// ABOUTME: Verifies the short-lived order token without attaching any identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Order Admission Gate
//!
//! Stateless gate for the public order-submission call: the token is checked
//! for signature, expiry, and the `order` type claim, nothing else. There is
//! no revocation ledger and no replay protection beyond the short expiry
//! window; a captured token stays usable by anyone until it expires.

use crate::auth::{TokenClass, TokenService};
use crate::constants::{error_messages, headers as header_names};
use crate::errors::{AppError, AppResult};
use axum::http::HeaderMap;

/// Admit or reject a public order submission
///
/// # Errors
///
/// - 401 when the `x-order-key` header is absent
/// - 403 when the token fails signature, expiry, or type checks
pub fn authenticate_order(headers: &HeaderMap, tokens: &TokenService) -> AppResult<()> {
    let token = headers
        .get(header_names::ORDER_KEY)
        .and_then(|h| h.to_str().ok())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::auth_required(error_messages::MISSING_ORDER_TOKEN))?;

    tokens.verify(token, TokenClass::Order).map_err(|e| {
        tracing::debug!("Order token rejected: {e}");
        AppError::order_token_rejected(error_messages::INVALID_ORDER_TOKEN)
    })?;

    Ok(())
}
