//! # Wire Format
//!
//! JSON bodies exchanged with the order service. Field names are camelCase, timestamps are
//! RFC 3339, and the status travels as a raw string so that a value this client does not
//! know surfaces as [`SyncError::UnknownStatus`](status_sync::SyncError::UnknownStatus) at
//! decode time instead of failing inside `serde` or being mapped to a default.
//!
//! ```json
//! {
//!   "id": 42,
//!   "userId": 1,
//!   "total": 3198.0,
//!   "status": "PROCESSING",
//!   "items": [{ "id": 1, "productId": 7, "productName": "RTX 4090", "quantity": 2, "price": 1599.0 }],
//!   "createdAt": "2025-01-05T10:00:00Z",
//!   "updatedAt": "2025-01-05T10:00:05Z"
//! }
//! ```

use crate::error::OrderError;
use crate::model::order::{LineItem, Order, OrderId, OrderStatus, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: u64,
    pub user_id: u64,
    pub total: f64,
    pub status: String,
    #[serde(default)]
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    /// Line number within the order.
    #[serde(default)]
    pub id: u64,
    pub product_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub quantity: u32,
    pub price: f64,
}

/// Body of a place-order request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: u64,
    pub quantity: u32,
}

impl TryFrom<OrderResponse> for Order {
    type Error = OrderError;

    fn try_from(response: OrderResponse) -> Result<Self, Self::Error> {
        let status: OrderStatus = response.status.parse()?;
        let items = response
            .items
            .into_iter()
            .map(|item| LineItem {
                product_id: ProductId(item.product_id),
                quantity: item.quantity,
                price: item.price,
                product_name: item.product_name,
            })
            .collect();

        Ok(Order {
            id: OrderId(response.id),
            user_id: UserId(response.user_id),
            status,
            total: response.total,
            items,
            created_at: response.created_at,
            updated_at: response.updated_at,
        })
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.0,
            user_id: order.user_id.0,
            total: order.total,
            status: order.status.as_str().to_string(),
            items: order
                .items
                .iter()
                .zip(1..)
                .map(|(item, line)| OrderItemResponse {
                    id: line,
                    product_id: item.product_id.0,
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Decodes one order body.
pub fn decode_order(body: &str) -> Result<Order, OrderError> {
    let response: OrderResponse = serde_json::from_str(body)?;
    Order::try_from(response)
}

/// Decodes a list body. One unknown status fails the whole list.
pub fn decode_orders(body: &str) -> Result<Vec<Order>, OrderError> {
    let responses: Vec<OrderResponse> = serde_json::from_str(body)?;
    responses.into_iter().map(Order::try_from).collect()
}

pub fn encode_order(order: &Order) -> Result<String, OrderError> {
    Ok(serde_json::to_string(&OrderResponse::from(order))?)
}

pub fn encode_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Result<String, OrderError> {
    let responses: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(serde_json::to_string(&responses)?)
}
