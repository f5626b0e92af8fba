use crate::error::OrderError;
use crate::model::OrderId;
use async_trait::async_trait;

/// Request/response access to the order service for one signed-in user.
///
/// Implementations are plain I/O: one attempt per call, no retry, no caching. Bodies are
/// the JSON documents described in [`wire`](crate::model::wire).
#[async_trait]
pub trait OrderTransport: Send + Sync + 'static {
    /// `GET /orders/{id}`
    async fn get_order(&self, id: OrderId) -> Result<String, OrderError>;

    /// `GET /orders`, newest first.
    async fn list_orders(&self) -> Result<String, OrderError>;

    /// `POST /orders`; returns the created order.
    async fn place_order(&self, body: String) -> Result<String, OrderError>;
}
