//! # Desk Client
//!
//! Handle to the [`OrderDesk`](crate::desk::OrderDesk) actor. It speaks two dialects:
//! typed methods for the processor and tests, and the JSON [`OrderTransport`] the storefront
//! clients consume, scoped to one signed-in user.
use crate::clients::OrderTransport;
use crate::desk::message::{DeskRequest, Response};
use crate::error::OrderError;
use crate::model::wire::{encode_order, encode_orders};
use crate::model::{CreateOrderRequest, Order, OrderId, OrderStatus, UserId};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct DeskClient {
    sender: mpsc::Sender<DeskRequest>,
    user: UserId,
}

impl DeskClient {
    pub(crate) fn new(sender: mpsc::Sender<DeskRequest>) -> Self {
        Self {
            sender,
            user: UserId(1),
        }
    }

    /// A client acting on behalf of `user`.
    pub fn as_user(&self, user: UserId) -> Self {
        Self {
            sender: self.sender.clone(),
            user,
        }
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> DeskRequest,
    ) -> Result<T, OrderError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| OrderError::DeskCommunication("desk closed".to_string()))?;
        response
            .await
            .map_err(|_| OrderError::DeskCommunication("desk dropped response".to_string()))?
    }

    pub async fn get(&self, id: OrderId) -> Result<Order, OrderError> {
        let user = self.user;
        self.request(|respond_to| DeskRequest::Get {
            user,
            id,
            respond_to,
        })
        .await
    }

    pub async fn list(&self) -> Result<Vec<Order>, OrderError> {
        let user = self.user;
        self.request(|respond_to| DeskRequest::List { user, respond_to })
            .await
    }

    pub async fn place(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        let user = self.user;
        self.request(|respond_to| DeskRequest::Place {
            user,
            request,
            respond_to,
        })
        .await
    }

    /// Moves `id` from `from` to `to`; returns `false` if it was not in `from`.
    #[instrument(skip(self))]
    pub async fn advance(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, OrderError> {
        self.request(|respond_to| DeskRequest::Advance {
            id,
            from,
            to,
            respond_to,
        })
        .await
    }

    /// Takes the desk offline (customer requests fail) or back online.
    pub async fn set_offline(&self, offline: bool) -> Result<(), OrderError> {
        self.request(|respond_to| DeskRequest::SetOffline {
            offline,
            respond_to,
        })
        .await
    }

    /// Asks the desk to stop. Pending requests queued behind this one are dropped.
    pub async fn shutdown(&self) {
        if self.sender.send(DeskRequest::Shutdown).await.is_err() {
            debug!("Desk already stopped");
        }
    }
}

#[async_trait]
impl OrderTransport for DeskClient {
    async fn get_order(&self, id: OrderId) -> Result<String, OrderError> {
        encode_order(&self.get(id).await?)
    }

    async fn list_orders(&self) -> Result<String, OrderError> {
        encode_orders(&self.list().await?)
    }

    async fn place_order(&self, body: String) -> Result<String, OrderError> {
        let request: CreateOrderRequest = serde_json::from_str(&body)
            .map_err(|e| OrderError::Validation(format!("malformed request: {}", e)))?;
        encode_order(&self.place(request).await?)
    }
}
