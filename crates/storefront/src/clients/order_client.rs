//! # Order Client
//!
//! Typed API over an [`OrderTransport`]: encodes requests and decodes responses.
use crate::clients::transport::OrderTransport;
use crate::error::OrderError;
use crate::model::wire::{decode_order, decode_orders, CreateOrderRequest, OrderItemRequest};
use crate::model::{Order, OrderId};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct OrderClient {
    transport: Arc<dyn OrderTransport>,
}

impl OrderClient {
    pub fn new(transport: Arc<dyn OrderTransport>) -> Self {
        Self { transport }
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        let body = self.transport.get_order(id).await?;
        decode_order(&body)
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        let body = self.transport.list_orders().await?;
        decode_orders(&body)
    }

    /// Places an order and returns it as created by the server (status `PENDING`).
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn create_order(&self, items: Vec<OrderItemRequest>) -> Result<Order, OrderError> {
        debug!(?items, "create_order called");
        let body = serde_json::to_string(&CreateOrderRequest { items })?;
        let order = decode_order(&self.transport.place_order(body).await?)?;
        info!(order_id = %order.id, total = order.total, "Order placed");
        Ok(order)
    }
}
