use status_sync::SyncError;

/// Errors raised by the order desk, its transport, and response decoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    /// The desk refused the request, e.g. while offline.
    #[error("Order service unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed order response: {0}")]
    Decode(String),
    #[error("Invalid order: {0}")]
    Validation(String),
    #[error("Desk communication error: {0}")]
    DeskCommunication(String),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl From<serde_json::Error> for OrderError {
    fn from(e: serde_json::Error) -> Self {
        OrderError::Decode(e.to_string())
    }
}

/// Everything crossing into the pollers is a fetch failure, except errors that already
/// carry a sync meaning (an unknown status stays an unknown status).
impl From<OrderError> for SyncError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Sync(inner) => inner,
            other => SyncError::Fetch(other.to_string()),
        }
    }
}
