use crate::clients::order_client::OrderClient;
use crate::model::{Order, OrderId};
use async_trait::async_trait;
use status_sync::{SnapshotFetcher, SyncError};

/// Adapts an [`OrderClient`] to the pollers' [`SnapshotFetcher`] edge.
///
/// Errors are converted once, here: transport and desk failures become
/// [`SyncError::Fetch`], an unknown status stays [`SyncError::UnknownStatus`].
#[derive(Clone)]
pub struct OrderFetcher {
    client: OrderClient,
}

impl OrderFetcher {
    pub fn new(client: OrderClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SnapshotFetcher<Order> for OrderFetcher {
    async fn fetch_one(&self, id: &OrderId) -> Result<Order, SyncError> {
        Ok(self.client.get_order(*id).await?)
    }

    async fn fetch_many(&self) -> Result<Vec<Order>, SyncError> {
        Ok(self.client.list_orders().await?)
    }
}
