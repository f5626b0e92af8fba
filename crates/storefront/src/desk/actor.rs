use crate::desk::catalog::Catalog;
use crate::desk::client::DeskClient;
use crate::desk::message::DeskRequest;
use crate::error::OrderError;
use crate::model::{CreateOrderRequest, LineItem, Order, OrderId, OrderStatus, ProductId, UserId};
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// In-memory stand-in for the order service.
///
/// Owns every order and is the only writer of their status. Placed orders are announced
/// on the `placed` channel handed to [`run`](Self::run), which the
/// [`OrderProcessor`](crate::desk::OrderProcessor) consumes.
pub struct OrderDesk {
    receiver: mpsc::Receiver<DeskRequest>,
    orders: BTreeMap<OrderId, Order>,
    catalog: Catalog,
    next_id: u64,
    offline: bool,
}

impl OrderDesk {
    pub fn new(buffer_size: usize, catalog: Catalog) -> (Self, DeskClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let desk = Self {
            receiver,
            orders: BTreeMap::new(),
            catalog,
            next_id: 1,
            offline: false,
        };
        (desk, DeskClient::new(sender))
    }

    pub async fn run(mut self, placed: mpsc::Sender<OrderId>) {
        info!(products = self.catalog.len(), "Order desk started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                DeskRequest::Get {
                    user,
                    id,
                    respond_to,
                } => {
                    let result = self.available().and_then(|_| self.get(user, id));
                    debug!(%id, found = result.is_ok(), "Get");
                    let _ = respond_to.send(result);
                }
                DeskRequest::List { user, respond_to } => {
                    let result = self.available().map(|_| self.list(user));
                    let _ = respond_to.send(result);
                }
                DeskRequest::Place {
                    user,
                    request,
                    respond_to,
                } => {
                    let result = self.available().and_then(|_| self.place(user, request));
                    match &result {
                        Ok(order) => {
                            info!(order_id = %order.id, total = order.total, size = self.orders.len(), "Placed");
                            if placed.send(order.id).await.is_err() {
                                warn!(order_id = %order.id, "Processor gone, order will stay PENDING");
                            }
                        }
                        Err(e) => warn!(error = %e, "Place failed"),
                    }
                    let _ = respond_to.send(result);
                }
                DeskRequest::Advance {
                    id,
                    from,
                    to,
                    respond_to,
                } => {
                    let result = self.advance(id, from, to);
                    let _ = respond_to.send(result);
                }
                DeskRequest::SetOffline {
                    offline,
                    respond_to,
                } => {
                    self.offline = offline;
                    info!(offline, "Desk availability changed");
                    let _ = respond_to.send(Ok(()));
                }
                DeskRequest::Shutdown => break,
            }
        }

        info!(size = self.orders.len(), "Order desk shut down");
    }

    fn available(&self) -> Result<(), OrderError> {
        if self.offline {
            return Err(OrderError::Unavailable("order desk is offline".to_string()));
        }
        Ok(())
    }

    fn get(&self, user: UserId, id: OrderId) -> Result<Order, OrderError> {
        self.orders
            .get(&id)
            .filter(|order| order.user_id == user)
            .cloned()
            .ok_or_else(|| OrderError::NotFound(format!("order {}", id)))
    }

    fn list(&self, user: UserId) -> Vec<Order> {
        self.orders
            .values()
            .rev()
            .filter(|order| order.user_id == user)
            .cloned()
            .collect()
    }

    fn place(&mut self, user: UserId, request: CreateOrderRequest) -> Result<Order, OrderError> {
        if request.items.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }

        let mut items = Vec::with_capacity(request.items.len());
        for line in request.items {
            if line.quantity == 0 {
                return Err(OrderError::Validation(format!(
                    "quantity for product {} must be positive",
                    line.product_id
                )));
            }
            let product = self
                .catalog
                .get(&ProductId(line.product_id))
                .ok_or_else(|| OrderError::NotFound(format!("product {}", line.product_id)))?;
            items.push(LineItem {
                product_id: product.id,
                quantity: line.quantity,
                price: product.price,
                product_name: Some(product.name.clone()),
            });
        }

        let id = OrderId(self.next_id);
        self.next_id += 1;
        let now = Utc::now();
        let order = Order {
            id,
            user_id: user,
            status: OrderStatus::Pending,
            total: items.iter().map(LineItem::line_total).sum(),
            items,
            created_at: now,
            updated_at: now,
        };
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    fn advance(&mut self, id: OrderId, from: OrderStatus, to: OrderStatus) -> Result<bool, OrderError> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| OrderError::NotFound(format!("order {}", id)))?;
        if order.status != from {
            debug!(%id, current = %order.status, expected = %from, "Advance skipped");
            return Ok(false);
        }
        order.status = to;
        order.updated_at = Utc::now();
        info!(%id, %from, %to, "Status advanced");
        Ok(true)
    }
}
