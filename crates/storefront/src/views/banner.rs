use crate::model::{Order, OrderId, OrderStatus};
use status_sync::{TransitionNotifier, TransitionOf};
use tokio::sync::mpsc;

/// A one-off notice shown when an order settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub message: String,
}

impl Banner {
    /// Banner for a transition into a terminal status; `None` for intermediate steps.
    pub fn for_transition(transition: &TransitionOf<Order>) -> Option<Self> {
        let message = match transition.to {
            OrderStatus::Completed => format!("Order #{} completed", transition.id),
            OrderStatus::Expired => format!("Order #{} expired", transition.id),
            OrderStatus::Pending | OrderStatus::Processing => return None,
        };
        Some(Self {
            order_id: transition.id,
            status: transition.to,
            message,
        })
    }
}

/// A notifier that queues a [`Banner`] for every settled order, and the queue's receiver.
pub(crate) fn banner_notifier() -> (TransitionNotifier<Order>, mpsc::UnboundedReceiver<Banner>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let notifier = TransitionNotifier::<Order>::new().on_transition(move |transition| {
        if let Some(banner) = Banner::for_transition(transition) {
            let _ = sender.send(banner);
        }
    });
    (notifier, receiver)
}

/// Drains queued banners without waiting.
pub(crate) fn drain(receiver: &mut mpsc::UnboundedReceiver<Banner>) -> Vec<Banner> {
    let mut banners = Vec::new();
    while let Ok(banner) = receiver.try_recv() {
        banners.push(banner);
    }
    banners
}
