// ABOUTME: Order message formatting for WhatsApp dispatch
// ABOUTME: Renders cart lines, totals, and client data into the business notification text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::models::CartItem;
use std::fmt::Write;

/// Input for the order notification message
#[derive(Debug, Clone)]
pub struct OrderMessageData<'a> {
    /// Customer name
    pub client_name: &'a str,
    /// Customer email
    pub client_email: &'a str,
    /// Customer phone number
    pub client_phone: &'a str,
    /// Pickup date
    pub delivery_date: &'a str,
    /// Pickup time (HH:MM or HH:MM:SS, 24-hour)
    pub delivery_time: &'a str,
    /// Payment method
    pub payment_method: &'a str,
    /// Ordered items
    pub cart_items: &'a [CartItem],
}

/// Render the WhatsApp notification for a new order
#[must_use]
pub fn format_order_message(data: &OrderMessageData<'_>) -> String {
    let items_summary = data
        .cart_items
        .iter()
        .map(format_item)
        .collect::<Vec<_>>()
        .join("\n\n");

    let total: f64 = data.cart_items.iter().map(CartItem::subtotal).sum();

    format!(
        "\n    \u{1f9fe} *Nuevo pedido* \u{1f9fe}\n    \u{1f464} *Datos del cliente*\n\
         - Nombre: {}\n- Email: {}\n- Tel\u{e9}fono: {}\n- Fecha de recogida: {}\n\
         - Hora de recogida: {}\n- M\u{e9}todo de pago: {}\n\n    \u{1f6d2} *Productos solicitados*\n{}\n\n\
         \u{1f4b0} *Total a pagar:* ${:.2}\n",
        data.client_name,
        data.client_email,
        data.client_phone,
        data.delivery_date,
        rebuild_time(data.delivery_time),
        data.payment_method,
        if items_summary.is_empty() {
            "- (ning\u{fa}n producto en el carrito)".to_owned()
        } else {
            items_summary
        },
        total,
    )
}

fn format_item(item: &CartItem) -> String {
    let mut complements_text = String::new();
    if let Some(complements) = item.complements.as_deref() {
        let list: Vec<&str> = complements
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        if !list.is_empty() {
            complements_text.push_str("\n    Complementos:\n");
            for (i, c) in list.iter().enumerate() {
                if i > 0 {
                    complements_text.push('\n');
                }
                let _ = write!(complements_text, "    - {c}");
            }
        }
    }

    format!(
        "\u{2022} {} x {} ({}){}\n    Precio unitario: ${:.2}\n    Subtotal: ${:.2}",
        item.quantity,
        item.name,
        item.product_size,
        complements_text,
        item.price,
        item.subtotal(),
    )
}

/// Rebuild a 24-hour `HH:MM[:SS]` time into `H:MM AM/PM`
///
/// Returns an empty string when the input cannot be parsed.
#[must_use]
pub fn rebuild_time(delivery_time: &str) -> String {
    if delivery_time.len() < 5 {
        return String::new();
    }
    let time = &delivery_time[..5];
    let Some((hours, minutes)) = time.split_once(':') else {
        return String::new();
    };
    let Ok(hour) = hours.parse::<u32>() else {
        return String::new();
    };

    let ampm = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minutes} {ampm}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: u32, price: f64, complements: Option<&str>) -> CartItem {
        CartItem {
            name: name.into(),
            quantity,
            price,
            product_size: "Mediano".into(),
            complements: complements.map(Into::into),
        }
    }

    #[test]
    fn test_rebuild_time() {
        assert_eq!(rebuild_time("14:30:00"), "2:30 PM");
        assert_eq!(rebuild_time("09:05"), "9:05 AM");
        assert_eq!(rebuild_time("00:15"), "12:15 AM");
        assert_eq!(rebuild_time("12:00"), "12:00 PM");
        assert_eq!(rebuild_time(""), "");
        assert_eq!(rebuild_time("bad"), "");
    }

    #[test]
    fn test_message_includes_items_and_total() {
        let items = vec![
            item("Banana split", 2, 5.0, Some("Nutella, Fresa")),
            item("Frappe", 1, 3.5, None),
        ];
        let message = format_order_message(&OrderMessageData {
            client_name: "Ana",
            client_email: "ana@example.com",
            client_phone: "5550001",
            delivery_date: "2025-06-01",
            delivery_time: "16:45:00",
            payment_method: "Efectivo",
            cart_items: &items,
        });

        assert!(message.contains("2 x Banana split"));
        assert!(message.contains("- Nutella"));
        assert!(message.contains("4:45 PM"));
        assert!(message.contains("$13.50"));
        assert!(message.contains("Ana"));
    }

    #[test]
    fn test_empty_cart_renders_placeholder() {
        let message = format_order_message(&OrderMessageData {
            client_name: "Ana",
            client_email: "ana@example.com",
            client_phone: "5550001",
            delivery_date: "2025-06-01",
            delivery_time: "10:00",
            payment_method: "Tarjeta",
            cart_items: &[],
        });
        assert!(message.contains("ning\u{fa}n producto"));
    }
}
