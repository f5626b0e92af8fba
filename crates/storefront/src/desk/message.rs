use crate::error::OrderError;
use crate::model::{CreateOrderRequest, Order, OrderId, OrderStatus, UserId};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the desk.
pub type Response<T> = oneshot::Sender<Result<T, OrderError>>;

/// Requests handled by the [`OrderDesk`](crate::desk::OrderDesk) actor.
#[derive(Debug)]
pub enum DeskRequest {
    Get {
        user: UserId,
        id: OrderId,
        respond_to: Response<Order>,
    },
    /// The user's orders, newest first.
    List {
        user: UserId,
        respond_to: Response<Vec<Order>>,
    },
    Place {
        user: UserId,
        request: CreateOrderRequest,
        respond_to: Response<Order>,
    },
    /// Compare-and-set on the status: applied only if the order is currently `from`.
    /// Responds with whether the status changed.
    Advance {
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
        respond_to: Response<bool>,
    },
    /// While offline, customer-facing requests fail with `Unavailable`.
    SetOffline {
        offline: bool,
        respond_to: Response<()>,
    },
    Shutdown,
}
