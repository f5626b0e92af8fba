//! Orders as the client last saw them.
//!
//! [`Order`] implements [`PolledEntity`](status_sync::PolledEntity), so the pollers can
//! track it by [`OrderId`] and stop once its [`OrderStatus`] is terminal. Snapshots are
//! replaced wholesale on every fetch; the client never edits one in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use status_sync::{PolledEntity, StatusPhase, SyncError};
use std::fmt::Display;
use std::str::FromStr;

/// Type-safe identifier for Orders, assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-side order lifecycle.
///
/// `PENDING` and `PROCESSING` are active; `COMPLETED` and `EXPIRED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Expired,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Expired,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Expired => "EXPIRED",
        }
    }

    /// Human-readable badge text.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Expired => "Expired",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = SyncError;

    /// Strict: anything outside the four known values is an error, never a default.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| SyncError::UnknownStatus(raw.to_string()))
    }
}

impl StatusPhase for OrderStatus {
    fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price at order time.
    pub price: f64,
    /// Denormalized display hint; often absent.
    pub product_name: Option<String>,
}

impl LineItem {
    pub fn display_name(&self) -> String {
        match &self.product_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Product #{}", self.product_id),
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Trusted as sent by the server; never recomputed client-side.
    pub total: f64,
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PolledEntity for Order {
    type Id = OrderId;
    type Status = OrderStatus;

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn status(&self) -> OrderStatus {
        self.status
    }
}
