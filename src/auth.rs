// ABOUTME: Token issuance and verification for admin sessions and order admission
// ABOUTME: Two independent HS256 token classes with tagged claims and strict expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Token Service
//!
//! Issues and verifies the two token classes used by the API:
//!
//! - **Session tokens** authenticate administrators on protected routes.
//!   They carry the admin identity and are revocable through the ledger.
//! - **Order tokens** rate-gate the public order-submission endpoint. They
//!   carry no identity, live for seconds, and are never persisted.
//!
//! The classes are signed with independent secrets AND tagged with a type
//! claim; every gate checks both, so a token of one class can never be
//! accepted where the other is expected.

use crate::config::AuthConfig;
use crate::errors::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token verification failure, distinguished internally
///
/// Gates collapse these to generic boundary messages; the distinction is
/// kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature or format is wrong
    #[error("token signature or format is invalid")]
    Invalid,
    /// Past the signed expiry
    #[error("token has expired")]
    Expired,
    /// The embedded type claim does not match the expected class
    #[error("token type does not match the expected class")]
    TypeMismatch,
}

/// The two token classes issued by this service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Administrator session token
    Session,
    /// Ephemeral order-admission token
    Order,
}

impl TokenClass {
    /// The type claim value embedded in tokens of this class
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Order => "order",
        }
    }
}

/// Session lifetime selected by the login handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTtl {
    /// Normal login
    Normal,
    /// Login that replaces an existing valid session
    Refresh,
}

/// Signed token claims, tagged by class
///
/// The tag is part of the signed payload; verification rejects a claims
/// object whose tag does not match the gate's expected class even when the
/// signature happens to validate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TokenClaims {
    /// Administrator session claims
    Session {
        /// Administrator identifier
        admin_code: i64,
        /// Administrator account name
        account_name: String,
        /// Issued-at (Unix seconds)
        iat: i64,
        /// Expiry (Unix seconds)
        exp: i64,
    },
    /// Order admission claims; deliberately carries no identity
    Order {
        /// Issued-at (Unix seconds)
        iat: i64,
        /// Expiry (Unix seconds)
        exp: i64,
    },
}

impl TokenClaims {
    /// The class this claims object belongs to
    #[must_use]
    pub const fn class(&self) -> TokenClass {
        match self {
            Self::Session { .. } => TokenClass::Session,
            Self::Order { .. } => TokenClass::Order,
        }
    }

    /// Expiry timestamp (Unix seconds)
    #[must_use]
    pub const fn expires_at(&self) -> i64 {
        match self {
            Self::Session { exp, .. } | Self::Order { exp, .. } => *exp,
        }
    }
}

/// Issues and verifies signed, time-limited tokens
///
/// Secrets and lifetimes are injected at construction so tests can run with
/// deterministic keys and short windows.
#[derive(Clone)]
pub struct TokenService {
    session_encoding: EncodingKey,
    session_decoding: DecodingKey,
    order_encoding: EncodingKey,
    order_decoding: DecodingKey,
    session_ttl_secs: i64,
    session_refresh_ttl_secs: i64,
    order_token_ttl_secs: i64,
}

impl TokenService {
    /// Create a token service from auth configuration
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            session_encoding: EncodingKey::from_secret(config.session_secret.as_bytes()),
            session_decoding: DecodingKey::from_secret(config.session_secret.as_bytes()),
            order_encoding: EncodingKey::from_secret(config.order_secret.as_bytes()),
            order_decoding: DecodingKey::from_secret(config.order_secret.as_bytes()),
            session_ttl_secs: config.session_ttl_secs,
            session_refresh_ttl_secs: config.session_refresh_ttl_secs,
            order_token_ttl_secs: config.order_token_ttl_secs,
        }
    }

    /// Issue a session token for an administrator
    ///
    /// The lifetime depends on whether the login is a plain login or a
    /// refresh of an existing session.
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn issue_session_token(
        &self,
        admin_code: i64,
        account_name: &str,
        ttl: SessionTtl,
    ) -> AppResult<String> {
        let now = Utc::now();
        let ttl_secs = match ttl {
            SessionTtl::Normal => self.session_ttl_secs,
            SessionTtl::Refresh => self.session_refresh_ttl_secs,
        };
        let claims = TokenClaims::Session {
            admin_code,
            account_name: account_name.to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.session_encoding)
            .map_err(|e| AppError::internal(format!("Failed to sign session token: {e}")))
    }

    /// Issue an order-admission token
    ///
    /// No identity is embedded; anyone holding the token may submit an
    /// order until the short window closes. This is an admission throttle,
    /// not an authentication of identity.
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn issue_order_token(&self) -> AppResult<String> {
        let now = Utc::now();
        let claims = TokenClaims::Order {
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.order_token_ttl_secs)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.order_encoding)
            .map_err(|e| AppError::internal(format!("Failed to sign order token: {e}")))
    }

    /// Verify a token against the expected class
    ///
    /// Checks signature, expiry (no leeway), and the embedded type claim,
    /// in that order. The type claim is checked even though the classes use
    /// distinct secrets; if deployment ever collapses the secrets into one,
    /// the tag check still keeps the namespaces apart.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Invalid`] when the signature or format is wrong
    /// - [`TokenError::Expired`] when past the signed expiry
    /// - [`TokenError::TypeMismatch`] when the type claim is not `expected`
    pub fn verify(&self, token: &str, expected: TokenClass) -> Result<TokenClaims, TokenError> {
        let decoding_key = match expected {
            TokenClass::Session => &self.session_decoding,
            TokenClass::Order => &self.order_decoding,
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let claims = decode::<TokenClaims>(token, decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        if claims.class() == expected {
            Ok(claims)
        } else {
            Err(TokenError::TypeMismatch)
        }
    }

    /// Decode claims without verifying the signature or expiry
    ///
    /// Used only to read the expiry off a token that is being revoked.
    /// Never use the result for an authorization decision.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] when the token cannot be parsed
    pub fn decode_unsafe(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<TokenClaims>(token, &self.session_decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }

    /// Configured order-token window in seconds
    #[must_use]
    pub const fn order_token_ttl_secs(&self) -> i64 {
        self.order_token_ttl_secs
    }
}

/// Generate a random signing secret suitable for either token class
///
/// Provided for operators bootstrapping an environment; the server itself
/// always reads secrets from configuration.
#[must_use]
pub fn generate_signing_secret() -> String {
    use rand::{distributions::Alphanumeric, Rng};

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new(&AuthConfig {
            session_secret: "session-secret-for-tests".into(),
            order_secret: "order-secret-for-tests".into(),
            session_ttl_secs: 3600,
            session_refresh_ttl_secs: 28800,
            order_token_ttl_secs: 10,
        })
    }

    #[test]
    fn test_session_token_round_trip() {
        let service = test_service();
        let token = service
            .issue_session_token(7, "admin1", SessionTtl::Normal)
            .unwrap();

        let claims = service.verify(&token, TokenClass::Session).unwrap();
        match claims {
            TokenClaims::Session {
                admin_code,
                account_name,
                iat,
                exp,
            } => {
                assert_eq!(admin_code, 7);
                assert_eq!(account_name, "admin1");
                assert_eq!(exp - iat, 3600);
            }
            TokenClaims::Order { .. } => panic!("wrong claims class"),
        }
    }

    #[test]
    fn test_order_token_round_trip() {
        let service = test_service();
        let token = service.issue_order_token().unwrap();
        let claims = service.verify(&token, TokenClass::Order).unwrap();
        assert_eq!(claims.class(), TokenClass::Order);
    }

    #[test]
    fn test_cross_class_tokens_rejected() {
        let service = test_service();
        let session = service
            .issue_session_token(1, "admin1", SessionTtl::Normal)
            .unwrap();
        let order = service.issue_order_token().unwrap();

        assert!(service.verify(&session, TokenClass::Order).is_err());
        assert!(service.verify(&order, TokenClass::Session).is_err());
    }

    #[test]
    fn test_type_tag_checked_even_with_shared_secret() {
        // One secret for both classes: signature validates either way, so
        // only the tag check keeps the namespaces apart.
        let service = TokenService::new(&AuthConfig {
            session_secret: "shared".into(),
            order_secret: "shared".into(),
            session_ttl_secs: 3600,
            session_refresh_ttl_secs: 28800,
            order_token_ttl_secs: 10,
        });

        let order = service.issue_order_token().unwrap();
        assert_eq!(
            service.verify(&order, TokenClass::Session),
            Err(TokenError::TypeMismatch)
        );

        let session = service
            .issue_session_token(1, "admin1", SessionTtl::Normal)
            .unwrap();
        assert_eq!(
            service.verify(&session, TokenClass::Order),
            Err(TokenError::TypeMismatch)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new(&AuthConfig {
            session_secret: "session-secret-for-tests".into(),
            order_secret: "order-secret-for-tests".into(),
            session_ttl_secs: -5,
            session_refresh_ttl_secs: 28800,
            order_token_ttl_secs: -5,
        });

        let session = service
            .issue_session_token(1, "admin1", SessionTtl::Normal)
            .unwrap();
        assert_eq!(
            service.verify(&session, TokenClass::Session),
            Err(TokenError::Expired)
        );

        let order = service.issue_order_token().unwrap();
        assert_eq!(
            service.verify(&order, TokenClass::Order),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = test_service();
        assert_eq!(
            service.verify("not-a-token", TokenClass::Session),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_decode_unsafe_reads_expired_claims() {
        let service = TokenService::new(&AuthConfig {
            session_secret: "session-secret-for-tests".into(),
            order_secret: "order-secret-for-tests".into(),
            session_ttl_secs: -60,
            session_refresh_ttl_secs: 28800,
            order_token_ttl_secs: 10,
        });

        let token = service
            .issue_session_token(3, "admin1", SessionTtl::Normal)
            .unwrap();

        // Verification refuses the expired token, decode_unsafe still
        // surfaces the claims for revocation bookkeeping.
        assert!(service.verify(&token, TokenClass::Session).is_err());
        let claims = service.decode_unsafe(&token).unwrap();
        assert_eq!(claims.class(), TokenClass::Session);
        assert!(claims.expires_at() < Utc::now().timestamp());
    }

    #[test]
    fn test_generated_secret_shape() {
        let secret = generate_signing_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
