// ABOUTME: Domain models shared across storage managers and route handlers
// ABOUTME: Defines administrators, revoked tokens, catalog items, orders, and schedules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Core data structures for the Comanda API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An administrator account
///
/// Mutated by the lockout policy on every login attempt; `login_attempts`
/// resets to 0 only on a successful login, and `blocked_until`, when set,
/// is strictly in the future at the time it is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Administrator {
    /// Unique identifier
    pub admin_code: i64,
    /// Unique display name used to log in
    pub account_name: String,
    /// bcrypt hash of the account password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Consecutive failed login attempts
    pub login_attempts: u32,
    /// End of the active lockout window, if any
    pub blocked_until: Option<DateTime<Utc>>,
    /// Time of the last login attempt, successful or not
    pub last_attempt: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A session token recorded as no-longer-valid despite an unexpired signature
///
/// Rows whose `expires_at` has passed are dead weight; the ledger is purged
/// opportunistically on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokedToken {
    /// The literal token string
    pub token: String,
    /// The token's signed expiry, read from its claims
    pub expires_at: DateTime<Utc>,
}

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub product_id: i64,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Category used for menu filtering
    pub product_type: String,
    /// Offered sizes
    pub product_sizes: Vec<String>,
    /// Public image URL
    pub image_url: Option<String>,
    /// Whether the product is shown on the initial menu screen
    pub initially_show: bool,
}

/// An add-on companion offered alongside products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    /// Unique identifier
    pub companion_id: i64,
    /// Display name
    pub name: String,
    /// Price added on top of the product price
    pub extra_price: f64,
}

/// One line of an order's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Product name as ordered
    pub name: String,
    /// Quantity ordered
    pub quantity: u32,
    /// Unit price at order time
    pub price: f64,
    /// Chosen size
    pub product_size: String,
    /// Comma-separated companion names, if any
    #[serde(default)]
    pub complements: Option<String>,
}

impl CartItem {
    /// Line subtotal (unit price times quantity)
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub order_id: i64,
    /// Customer name
    pub client_name: String,
    /// Customer email
    pub client_email: String,
    /// Customer phone number
    pub client_phone: String,
    /// Pickup date (YYYY-MM-DD)
    pub delivery_date: String,
    /// Pickup time (HH:MM or HH:MM:SS)
    pub delivery_time: String,
    /// Payment method chosen at checkout
    pub payment_method: String,
    /// Ordered items
    pub cart_items: Vec<CartItem>,
    /// Whether the order has been completed
    pub order_state: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Day of the week for operating schedules
///
/// Day names are stored and exchanged in Spanish, matching the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weekday {
    /// Monday
    #[serde(rename = "Lunes")]
    Lunes,
    /// Tuesday
    #[serde(rename = "Martes")]
    Martes,
    /// Wednesday
    #[serde(rename = "Miércoles")]
    Miercoles,
    /// Thursday
    #[serde(rename = "Jueves")]
    Jueves,
    /// Friday
    #[serde(rename = "Viernes")]
    Viernes,
    /// Saturday
    #[serde(rename = "Sábado")]
    Sabado,
    /// Sunday
    #[serde(rename = "Domingo")]
    Domingo,
}

impl Weekday {
    /// All valid day names, in week order
    pub const ALL: [Self; 7] = [
        Self::Lunes,
        Self::Martes,
        Self::Miercoles,
        Self::Jueves,
        Self::Viernes,
        Self::Sabado,
        Self::Domingo,
    ];

    /// Convert to the stored string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lunes => "Lunes",
            Self::Martes => "Martes",
            Self::Miercoles => "Miércoles",
            Self::Jueves => "Jueves",
            Self::Viernes => "Viernes",
            Self::Sabado => "Sábado",
            Self::Domingo => "Domingo",
        }
    }

    /// Parse from the stored string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == s)
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekly operating window for a single day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Row identifier
    pub id: i64,
    /// Day of the week
    pub day: Weekday,
    /// Whether the business operates on this day
    pub enabled: bool,
    /// Opening time (HH:MM), null when disabled
    pub start_time: Option<String>,
    /// Closing time (HH:MM), null when disabled
    pub end_time: Option<String>,
}
