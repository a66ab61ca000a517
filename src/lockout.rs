// ABOUTME: Pure escalating-lockout policy for failed administrator logins
// ABOUTME: Computes block state and attempt-counter updates without touching storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Lockout Policy
//!
//! Pure decision logic over `(login_attempts, blocked_until, now)`.
//! Persistence is an explicit side effect the caller performs, which keeps
//! the policy testable without a database.
//!
//! Rules:
//! - Each failed login increments the attempt counter by 1.
//! - At the 5th failure a lockout window opens; its length grows with
//!   every further failure: `(attempts - 4) * 5` minutes.
//! - While a window is active, login attempts are rejected before any
//!   credential comparison and do NOT increment the counter.
//! - A successful login resets the counter and clears the window.

use crate::constants::limits::{LOCKOUT_STEP_MINUTES, MAX_LOGIN_ATTEMPTS};
use chrono::{DateTime, Duration, Utc};

/// Outcome of consulting the policy before a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutDecision {
    /// No active window; the attempt may proceed to credential comparison
    Allowed,
    /// An active window rejects the attempt outright
    Blocked {
        /// Minutes to display to the caller
        remaining_minutes: i64,
    },
}

/// Counter and window update to persist after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureUpdate {
    /// New consecutive-failure count
    pub login_attempts: u32,
    /// New lockout window end, when the failure crossed the threshold
    pub blocked_until: Option<DateTime<Utc>>,
}

/// Consult the policy before comparing credentials
///
/// Blocked means the request terminates immediately; the attempt counter
/// must not be touched.
#[must_use]
pub fn evaluate(blocked_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> LockoutDecision {
    match blocked_until {
        Some(until) if until > now => LockoutDecision::Blocked {
            remaining_minutes: remaining_minutes(until, now),
        },
        _ => LockoutDecision::Allowed,
    }
}

/// Register a failed credential comparison
///
/// Returns the counter and window values the caller must persist. The
/// window length is `(attempts - 4) * 5` minutes once the threshold is
/// reached, so it grows monotonically with every failure past it.
#[must_use]
pub fn register_failure(current_attempts: u32, now: DateTime<Utc>) -> FailureUpdate {
    let attempts = current_attempts.saturating_add(1);
    let blocked_until = if attempts >= MAX_LOGIN_ATTEMPTS {
        let window_minutes =
            i64::from(attempts - (MAX_LOGIN_ATTEMPTS - 1)) * LOCKOUT_STEP_MINUTES;
        Some(now + Duration::minutes(window_minutes))
    } else {
        None
    };

    FailureUpdate {
        login_attempts: attempts,
        blocked_until,
    }
}

/// Minutes remaining in a window, as displayed to the caller
///
/// Computed as `ceil(remaining_ms / 60000) - 1` so the boundary minute is
/// not rounded up: a window with 4m30s left reads "4 minutes", and one
/// with under a minute left reads "0 minutes".
#[must_use]
pub fn remaining_minutes(blocked_until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining_ms = (blocked_until - now).num_milliseconds().max(0);
    let ceil_minutes = (remaining_ms + 59_999) / 60_000;
    (ceil_minutes - 1).max(0)
}
