// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, signing secrets, TTLs, and runtime configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Environment-based configuration management for production deployment

use crate::constants::{env_config, limits};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment type for security and logging configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL (`sqlite:` path or `sqlite::memory:`)
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: env_config::database_url(),
        }
    }
}

/// Token signing and lifetime configuration
///
/// The two token classes use independent secrets so an order token can
/// never validate against the session namespace even if the type claim
/// were absent.
#[derive(Clone)]
pub struct AuthConfig {
    /// Signing secret for administrator session tokens
    pub session_secret: String,
    /// Signing secret for ephemeral order tokens
    pub order_secret: String,
    /// Session token lifetime for a normal login (seconds)
    pub session_ttl_secs: i64,
    /// Session token lifetime when a login replaces an existing session (seconds)
    pub session_refresh_ttl_secs: i64,
    /// Order token lifetime (seconds)
    pub order_token_ttl_secs: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secrets are never printed
        f.debug_struct("AuthConfig")
            .field("session_secret", &"<redacted>")
            .field("order_secret", &"<redacted>")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("session_refresh_ttl_secs", &self.session_refresh_ttl_secs)
            .field("order_token_ttl_secs", &self.order_token_ttl_secs)
            .finish()
    }
}

impl AuthConfig {
    /// Load auth configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if either signing secret is missing or empty
    pub fn from_env() -> AppResult<Self> {
        let session_secret = required_env("SESSION_TOKEN_SECRET")?;
        let order_secret = required_env("ORDER_TOKEN_SECRET")?;

        if session_secret == order_secret {
            tracing::warn!(
                "SESSION_TOKEN_SECRET and ORDER_TOKEN_SECRET are identical; \
                 token-class separation then rests on the type claim alone"
            );
        }

        let order_token_ttl_secs = env_i64("ORDER_TOKEN_TTL_SECS")
            .unwrap_or(limits::DEFAULT_ORDER_TOKEN_TTL_SECS)
            .clamp(1, limits::MAX_ORDER_TOKEN_TTL_SECS);

        Ok(Self {
            session_secret,
            order_secret,
            session_ttl_secs: env_i64("SESSION_TTL_SECS")
                .unwrap_or(limits::DEFAULT_SESSION_TTL_SECS),
            session_refresh_ttl_secs: env_i64("SESSION_REFRESH_TTL_SECS")
                .unwrap_or(limits::DEFAULT_SESSION_REFRESH_TTL_SECS),
            order_token_ttl_secs,
        })
    }
}

/// Twilio WhatsApp notification configuration
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Twilio account SID
    pub account_sid: String,
    /// Twilio auth token
    pub auth_token: String,
    /// Sending WhatsApp number (`whatsapp:+1...`)
    pub from_number: String,
    /// Receiving WhatsApp number of the business
    pub to_number: String,
}

impl NotificationConfig {
    /// Load notification configuration from the environment, if configured
    ///
    /// Returns `None` when the Twilio variables are absent; the server then
    /// runs without outbound notifications (orders are still persisted).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let account_sid = env::var("TWILIO_ACCOUNT_SID").ok()?;
        let auth_token = env::var("TWILIO_AUTH_TOKEN").ok()?;
        let from_number = env::var("TWILIO_WHATSAPP_FROM").ok()?;
        let to_number = env::var("COMPANY_WHATSAPP_TO").ok()?;
        Some(Self {
            account_sid,
            auth_token,
            from_number,
            to_number,
        })
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Comma-separated origin list, or "*" / empty for any origin
    pub allowed_origins: String,
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database settings
    pub database: DatabaseConfig,
    /// Token settings
    pub auth: AuthConfig,
    /// WhatsApp notification settings, if configured
    pub notifications: Option<NotificationConfig>,
    /// CORS settings
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable (signing secrets) is missing
    pub fn from_env() -> AppResult<Self> {
        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        );

        Ok(Self {
            http_port: env_config::http_port(),
            environment,
            database: DatabaseConfig::default(),
            auth: AuthConfig::from_env()?,
            notifications: NotificationConfig::from_env(),
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            },
        })
    }

    /// One-line configuration summary for startup logging, secrets excluded
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} http_port={} database={} notifications={} session_ttl={}s refresh_ttl={}s order_ttl={}s",
            self.environment,
            self.http_port,
            self.database.url,
            if self.notifications.is_some() {
                "enabled"
            } else {
                "disabled"
            },
            self.auth.session_ttl_secs,
            self.auth.session_refresh_ttl_secs,
            self.auth.order_token_ttl_secs,
        )
    }
}

fn required_env(name: &str) -> AppResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::new(
            crate::errors::ErrorCode::ConfigMissing,
            format!("{name} must be set"),
        )),
    }
}

fn env_i64(name: &str) -> Option<i64> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("anything"),
            Environment::Development
        );
    }

    #[test]
    fn test_auth_config_debug_redacts_secrets() {
        let config = AuthConfig {
            session_secret: "super-secret".into(),
            order_secret: "other-secret".into(),
            session_ttl_secs: 3600,
            session_refresh_ttl_secs: 28800,
            order_token_ttl_secs: 10,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("other-secret"));
    }
}
