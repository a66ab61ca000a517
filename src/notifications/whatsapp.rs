// ABOUTME: WhatsApp message delivery over the Twilio REST API
// ABOUTME: Sends formatted order messages to the business phone and surfaces channel failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::OrderNotifier;
use crate::config::NotificationConfig;
use async_trait::async_trait;
use thiserror::Error;

/// Delivery failure reported by the notification channel
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Refused before dispatch: nothing to send
    #[error("message is empty")]
    EmptyMessage,
    /// The HTTP request itself failed
    #[error("failed to reach the messaging channel: {0}")]
    Transport(String),
    /// The channel answered with a non-success status
    #[error("messaging channel rejected the message: status {status}")]
    Rejected {
        /// HTTP status returned by the channel
        status: u16,
        /// Response body, for logs
        body: String,
    },
}

/// Sends WhatsApp messages through Twilio
pub struct WhatsAppNotifier {
    client: reqwest::Client,
    config: NotificationConfig,
}

impl WhatsAppNotifier {
    /// Create a notifier from Twilio configuration
    #[must_use]
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.config.account_sid
        )
    }
}

#[async_trait]
impl OrderNotifier for WhatsAppNotifier {
    async fn send(&self, message: &str) -> Result<(), NotificationError> {
        if message.trim().is_empty() {
            return Err(NotificationError::EmptyMessage);
        }

        let params = [
            ("Body", message),
            ("From", &self.config.from_number),
            ("To", &self.config.to_number),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("WhatsApp message dispatched");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "WhatsApp dispatch rejected");
            Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
