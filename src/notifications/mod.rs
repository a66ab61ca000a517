// ABOUTME: Outbound notification dispatch for incoming orders
// ABOUTME: Defines the notifier contract, the WhatsApp implementation, and message formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Notification Dispatch
//!
//! The order handler hands a fully formatted text message to a notifier;
//! delivery failures are reported back as a distinguishable error and never
//! undo the stored order. There are no queueing or retry guarantees.

/// Order message formatting
pub mod message;

/// WhatsApp delivery over the Twilio REST API
pub mod whatsapp;

pub use message::{format_order_message, OrderMessageData};
pub use whatsapp::{NotificationError, WhatsAppNotifier};

use async_trait::async_trait;

/// Delivers a fully formatted text message over a messaging channel
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Send one message
    ///
    /// # Errors
    ///
    /// Returns a [`NotificationError`] when the message is empty or the
    /// channel refuses delivery
    async fn send(&self, message: &str) -> Result<(), NotificationError>;
}

/// Notifier that drops every message, used when Twilio is not configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl OrderNotifier for NoopNotifier {
    async fn send(&self, _message: &str) -> Result<(), NotificationError> {
        tracing::debug!("Notifications disabled; dropping order message");
        Ok(())
    }
}
