//! # Order Detail
//!
//! Watches one order until the server settles it. Mounted independently of the
//! [`OrdersPage`](crate::views::OrdersPage) and possibly at the same time; the two keep
//! separate timers and separate transition state, so each may report the same settlement
//! once.

use crate::clients::{OrderClient, OrderFetcher};
use crate::model::Order;
use crate::views::banner::{banner_notifier, drain, Banner};
use crate::views::order_card::render_order_card;
use status_sync::{EntityPoller, HaltReason, PollConfig, SnapshotFetcher, SyncError};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct OrderDetail {
    initial: Order,
    poller: EntityPoller<Order>,
    banners: mpsc::UnboundedReceiver<Banner>,
}

impl OrderDetail {
    /// Mounts the view for `order`. Polling starts only if the order is still active.
    pub fn open(client: OrderClient, order: Order, config: PollConfig) -> Self {
        let (notifier, banners) = banner_notifier();
        let fetcher: Arc<dyn SnapshotFetcher<Order>> = Arc::new(OrderFetcher::new(client));
        let poller =
            EntityPoller::spawn_with_notifier(order.id, order.status, fetcher, config, notifier);
        Self {
            initial: order,
            poller,
            banners,
        }
    }

    /// The freshest snapshot, or the order the view was opened with.
    pub fn order(&self) -> Order {
        self.poller
            .snapshot()
            .unwrap_or_else(|| self.initial.clone())
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_polling()
    }

    /// True while a fetch for this order is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.poller.is_fetching()
    }

    pub fn error(&self) -> Option<SyncError> {
        self.poller.last_error()
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.poller.halt_reason()
    }

    pub fn stop(&self) {
        self.poller.stop();
    }

    /// Resumes after [`stop`](Self::stop). Settled or failed orders stay as they are.
    pub async fn resume(&mut self) -> bool {
        self.poller.resume().await
    }

    /// Waits until polling ends (settled, failed or stopped) and returns the latest order.
    pub async fn wait_until_settled(&self) -> Order {
        let mut state = self.poller.subscribe();
        let _ = state.wait_for(|s| !s.polling).await;
        self.order()
    }

    pub fn take_banners(&mut self) -> Vec<Banner> {
        drain(&mut self.banners)
    }

    pub fn render(&self) -> String {
        let mut view = render_order_card(&self.order());
        if self.is_fetching() {
            view.push_str("\n  (updating...)");
        }
        if let Some(error) = self.error() {
            view.push_str(&format!("\n  {}", error));
        }
        view
    }

    /// Unmounts the view.
    pub async fn close(self) {
        self.poller.shutdown().await;
    }
}
