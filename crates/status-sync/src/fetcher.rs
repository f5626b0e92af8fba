//! # Snapshot Fetcher
//!
//! The only capability the engine consumes from its environment: a request/response read of
//! one entity or of the whole tracked collection. It is a pure I/O edge with no state of its
//! own, so one fetcher can be shared by any number of pollers.

use crate::entity::PolledEntity;
use crate::error::SyncError;
use async_trait::async_trait;

/// Reads the current server snapshot of entities.
///
/// # Contract
/// - Both operations must be safe to call repeatedly (idempotent reads).
/// - Both operations must fail fast. The pollers own the failure policy, so a fetcher must
///   not retry internally.
/// - A status value the client does not know must be reported as
///   [`SyncError::UnknownStatus`], never mapped to a default.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use status_sync::{PolledEntity, SnapshotFetcher, StatusPhase, SyncError};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Phase { Running, Done }
///
/// impl std::fmt::Display for Phase {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{:?}", self) }
/// }
///
/// impl StatusPhase for Phase {
///     fn is_active(&self) -> bool { matches!(self, Phase::Running) }
/// }
///
/// #[derive(Debug, Clone)]
/// struct Job { id: u32, phase: Phase }
///
/// impl PolledEntity for Job {
///     type Id = u32;
///     type Status = Phase;
///     fn id(&self) -> &u32 { &self.id }
///     fn status(&self) -> Phase { self.phase }
/// }
///
/// struct AlwaysDone;
///
/// #[async_trait]
/// impl SnapshotFetcher<Job> for AlwaysDone {
///     async fn fetch_one(&self, id: &u32) -> Result<Job, SyncError> {
///         Ok(Job { id: *id, phase: Phase::Done })
///     }
///
///     async fn fetch_many(&self) -> Result<Vec<Job>, SyncError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait]
pub trait SnapshotFetcher<T: PolledEntity>: Send + Sync + 'static {
    /// Fetch the current snapshot of a single entity.
    async fn fetch_one(&self, id: &T::Id) -> Result<T, SyncError>;

    /// Fetch the current snapshot of the whole tracked collection.
    async fn fetch_many(&self) -> Result<Vec<T>, SyncError>;
}
