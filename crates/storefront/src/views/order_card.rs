use crate::model::Order;
use std::fmt::Write;

/// Plain-text rendering of one order: header with id, date and status badge, one line per
/// item, then the server's total.
pub fn render_order_card(order: &Order) -> String {
    let mut card = String::new();
    let _ = writeln!(
        card,
        "Order #{}  {}  [{}]",
        order.id,
        order.created_at.format("%b %d, %Y %H:%M"),
        order.status.label()
    );
    for item in &order.items {
        let _ = writeln!(
            card,
            "  {} x {}  ${:.2}",
            item.display_name(),
            item.quantity,
            item.line_total()
        );
    }
    let _ = write!(card, "  Total  ${:.2}", order.total);
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineItem, OrderId, OrderStatus, ProductId, UserId};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_card() {
        let created_at = Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0).unwrap();
        let order = Order {
            id: OrderId(42),
            user_id: UserId(1),
            status: OrderStatus::Processing,
            total: 1928.0,
            items: vec![
                LineItem {
                    product_id: ProductId(1),
                    quantity: 1,
                    price: 1599.0,
                    product_name: Some("RTX 4090".to_string()),
                },
                LineItem {
                    product_id: ProductId(4),
                    quantity: 1,
                    price: 329.0,
                    product_name: None,
                },
            ],
            created_at,
            updated_at: created_at,
        };

        assert_eq!(
            render_order_card(&order),
            "Order #42  Jan 05, 2025 10:00  [Processing]\n  RTX 4090 x 1  $1599.00\n  Product #4 x 1  $329.00\n  Total  $1928.00"
        );
    }
}
