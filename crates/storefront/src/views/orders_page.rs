//! # Orders Page
//!
//! The "My Orders" list. An [`ActiveSetPoller`] keeps it fresh while any order is still
//! pending or processing and goes quiet once everything has settled. Orders placed from
//! this page are folded in immediately, which re-arms polling without waiting for a
//! refresh.
//!
//! | Page state | Condition                             |
//! |------------|---------------------------------------|
//! | loading    | initial refresh not finished          |
//! | error      | last refresh failed; `retry()` clears |
//! | empty      | loaded, no orders                     |
//! | list       | loaded, newest order first            |

use crate::clients::{OrderClient, OrderFetcher};
use crate::error::OrderError;
use crate::model::{Order, OrderItemRequest};
use crate::views::banner::{banner_notifier, drain, Banner};
use crate::views::order_card::render_order_card;
use status_sync::{ActiveSetPoller, CollectionState, PollConfig, SnapshotFetcher, SyncError};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{info, instrument};

pub struct OrdersPage {
    client: OrderClient,
    poller: ActiveSetPoller<Order>,
    banners: mpsc::UnboundedReceiver<Banner>,
}

impl OrdersPage {
    /// Mounts the page: starts the poller, which loads the list right away.
    pub fn open(client: OrderClient, config: PollConfig) -> Self {
        let (notifier, banners) = banner_notifier();
        let fetcher: Arc<dyn SnapshotFetcher<Order>> = Arc::new(OrderFetcher::new(client.clone()));
        let poller = ActiveSetPoller::spawn_with_notifier(fetcher, config, notifier);
        Self {
            client,
            poller,
            banners,
        }
    }

    pub fn orders(&self) -> Vec<Order> {
        self.poller.latest_collection()
    }

    pub fn is_loading(&self) -> bool {
        !self.poller.is_loaded()
    }

    pub fn is_empty(&self) -> bool {
        self.poller.is_loaded() && self.poller.latest_collection().is_empty()
    }

    /// Message of the last failed refresh.
    pub fn error(&self) -> Option<String> {
        self.poller.last_error().map(|e| e.to_string())
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_polling()
    }

    /// True while a refresh is outstanding, including the initial load.
    pub fn is_fetching(&self) -> bool {
        self.poller.is_fetching()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionState<Order>> {
        self.poller.subscribe()
    }

    /// The page's retry button: refetch now and resume polling if anything is active.
    pub async fn retry(&self) -> Result<usize, SyncError> {
        self.poller.refresh().await
    }

    /// Places an order and shows it at the top of the list.
    #[instrument(skip(self, items))]
    pub async fn create_order(&self, items: Vec<OrderItemRequest>) -> Result<Order, OrderError> {
        let order = self.client.create_order(items).await?;
        let armed = self.poller.notify_mutation(order.clone()).await?;
        info!(order_id = %order.id, armed, "Order added to list");
        Ok(order)
    }

    /// Banners raised since the last call, oldest first.
    pub fn take_banners(&mut self) -> Vec<Banner> {
        drain(&mut self.banners)
    }

    pub fn stop(&self) {
        self.poller.stop();
    }

    pub fn render(&self) -> String {
        if self.is_loading() {
            return "Loading orders...".to_string();
        }
        if let Some(error) = self.error() {
            return format!("{}\n[Retry]", error);
        }
        let orders = self.orders();
        if orders.is_empty() {
            return "No orders yet\nStart shopping to see your orders here.".to_string();
        }
        orders
            .iter()
            .map(render_order_card)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Unmounts the page.
    pub async fn close(self) {
        self.poller.shutdown().await;
    }
}
