//! # Order Processor
//!
//! Moves placed orders through the server-side lifecycle on the desk's own schedule:
//!
//! ```text
//! placed ──processing_delay──▶ PROCESSING ──settlement_delay──▶ COMPLETED | EXPIRED
//! ```
//!
//! Each order settles in its own task, so one slow order never holds up another. Every
//! step is a compare-and-set on the desk, which makes the processor idempotent: an order
//! that is no longer in the expected status is left alone.

use crate::desk::client::DeskClient;
use crate::desk::schedule::DeskSchedule;
use crate::error::OrderError;
use crate::model::{OrderId, OrderStatus};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub struct OrderProcessor {
    receiver: mpsc::Receiver<OrderId>,
    schedule: DeskSchedule,
}

impl OrderProcessor {
    /// Creates the processor and the sender the desk announces placed orders on.
    pub fn new(buffer_size: usize, schedule: DeskSchedule) -> (Self, mpsc::Sender<OrderId>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver, schedule }, sender)
    }

    /// Runs until the desk drops its sender, then abandons orders still settling.
    pub async fn run(mut self, desk: DeskClient) {
        info!(
            processing_ms = self.schedule.processing_delay.as_millis() as u64,
            settlement_ms = self.schedule.settlement_delay.as_millis() as u64,
            policy = ?self.schedule.policy,
            "Order processor started"
        );
        let mut settling = JoinSet::new();

        loop {
            tokio::select! {
                placed = self.receiver.recv() => match placed {
                    Some(id) => {
                        settling.spawn(settle(desk.clone(), id, self.schedule));
                    }
                    None => break,
                },
                Some(joined) = settling.join_next() => {
                    match joined {
                        Ok(Err(e)) => warn!(error = %e, "Settlement failed"),
                        Err(e) if !e.is_cancelled() => warn!(error = %e, "Settlement task failed"),
                        _ => {}
                    }
                }
            }
        }

        let abandoned = settling.len();
        settling.shutdown().await;
        info!(abandoned, "Order processor shut down");
    }
}

async fn settle(desk: DeskClient, id: OrderId, schedule: DeskSchedule) -> Result<(), OrderError> {
    tokio::time::sleep(schedule.processing_delay).await;
    if !desk
        .advance(id, OrderStatus::Pending, OrderStatus::Processing)
        .await?
    {
        debug!(%id, "Not pending anymore, skipping");
        return Ok(());
    }

    tokio::time::sleep(schedule.settlement_delay).await;
    let outcome = schedule.policy.outcome(id);
    desk.advance(id, OrderStatus::Processing, outcome).await?;
    Ok(())
}
