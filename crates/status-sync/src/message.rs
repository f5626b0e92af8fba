//! # Poller Messages
//!
//! Commands sent from an [`ActiveSetPoller`](crate::ActiveSetPoller) handle to its poll loop.
//! Mutations are answered right away, even while a refresh is in flight; a refresh request
//! that arrives during one waits for it and then fetches again.

use crate::entity::PolledEntity;
use crate::error::SyncError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the poll loop.
pub(crate) type Response<T> = oneshot::Sender<Result<T, SyncError>>;

#[derive(Debug)]
pub(crate) enum PollCommand<T: PolledEntity> {
    /// Fold an externally created or updated entity into the collection.
    /// Responds with whether the timer is armed afterwards.
    Mutation {
        entity: T,
        respond_to: Response<bool>,
    },
    /// Clear any halt and refresh now. Responds with the collection size.
    Refresh { respond_to: Response<usize> },
}
