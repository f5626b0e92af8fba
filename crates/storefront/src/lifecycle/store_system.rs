use crate::clients::OrderClient;
use crate::desk::{self, Catalog, DeskClient, DeskSchedule, OrderProcessor};
use crate::model::UserId;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const PROCESSOR_BUFFER: usize = 32;

/// The running storefront backend: order desk plus processor.
pub struct StoreSystem {
    pub desk: DeskClient,
    handles: Vec<JoinHandle<()>>,
}

impl StoreSystem {
    /// Starts the desk over the demo catalog.
    pub fn new(schedule: DeskSchedule) -> Self {
        Self::with_catalog(schedule, Catalog::demo())
    }

    pub fn with_catalog(schedule: DeskSchedule, catalog: Catalog) -> Self {
        let (desk, desk_client) = desk::new(catalog);
        let (processor, placed) = OrderProcessor::new(PROCESSOR_BUFFER, schedule);

        let desk_handle = tokio::spawn(desk.run(placed));
        let processor_handle = tokio::spawn(processor.run(desk_client.clone()));
        info!("Store system started");

        Self {
            desk: desk_client,
            handles: vec![desk_handle, processor_handle],
        }
    }

    /// An order client signed in as `user`.
    pub fn client_for(&self, user: UserId) -> OrderClient {
        OrderClient::new(Arc::new(self.desk.as_user(user)))
    }

    pub async fn shutdown(self) {
        self.desk.shutdown().await;
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Task failed during shutdown");
            }
        }
        info!("Store system shut down");
    }
}
