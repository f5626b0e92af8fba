use async_trait::async_trait;
use status_sync::{EntityPoller, HaltReason, PollConfig, SnapshotFetcher, SyncError};
use std::sync::Arc;
use storefront::clients::{OrderClient, OrderFetcher, OrderTransport};
use storefront::model::{Order, OrderId, OrderStatus};
use storefront::OrderError;

/// Serves the same body for every read.
struct FixedTransport {
    body: Result<String, OrderError>,
}

#[async_trait]
impl OrderTransport for FixedTransport {
    async fn get_order(&self, _id: OrderId) -> Result<String, OrderError> {
        self.body.clone()
    }

    async fn list_orders(&self) -> Result<String, OrderError> {
        self.body.clone().map(|body| format!("[{}]", body))
    }

    async fn place_order(&self, _body: String) -> Result<String, OrderError> {
        Err(OrderError::Unavailable("read-only".to_string()))
    }
}

fn order_body(status: &str) -> String {
    format!(
        r#"{{"id":7,"userId":1,"total":329.0,"status":"{}","items":[{{"id":1,"productId":4,"quantity":1,"price":329.0}}],"createdAt":"2025-01-05T10:00:00Z","updatedAt":"2025-01-05T10:00:00Z"}}"#,
        status
    )
}

fn fetcher(body: Result<String, OrderError>) -> OrderFetcher {
    OrderFetcher::new(OrderClient::new(Arc::new(FixedTransport { body })))
}

#[tokio::test]
async fn test_fetcher_decodes_snapshots() {
    let fetcher = fetcher(Ok(order_body("PROCESSING")));

    let order = fetcher.fetch_one(&OrderId(7)).await.unwrap();
    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.items[0].display_name(), "Product #4");

    let orders = fetcher.fetch_many().await.unwrap();
    assert_eq!(orders, vec![order]);
}

#[tokio::test]
async fn test_unknown_status_surfaces_as_error() {
    let fetcher = fetcher(Ok(order_body("REFUNDED")));
    assert_eq!(
        fetcher.fetch_one(&OrderId(7)).await,
        Err(SyncError::UnknownStatus("REFUNDED".to_string()))
    );
    assert_eq!(
        fetcher.fetch_many().await,
        Err(SyncError::UnknownStatus("REFUNDED".to_string()))
    );
}

#[tokio::test]
async fn test_transport_failure_becomes_fetch_error() {
    let fetcher = fetcher(Err(OrderError::Unavailable("503".to_string())));
    assert_eq!(
        fetcher.fetch_one(&OrderId(7)).await,
        Err(SyncError::Fetch("Order service unavailable: 503".to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn test_unknown_status_halts_entity_poller() {
    let fetcher: Arc<dyn SnapshotFetcher<Order>> = Arc::new(fetcher(Ok(order_body("REFUNDED"))));
    let poller = EntityPoller::spawn(OrderId(7), OrderStatus::Pending, fetcher, PollConfig::default());

    let mut state = poller.subscribe();
    state.wait_for(|s| !s.polling).await.unwrap();
    assert_eq!(poller.halt_reason(), Some(HaltReason::Failed));
    assert_eq!(
        poller.last_error(),
        Some(SyncError::UnknownStatus("REFUNDED".to_string()))
    );
    assert!(poller.snapshot().is_none());
}
