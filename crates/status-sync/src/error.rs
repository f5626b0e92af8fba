//! # Sync Errors
//!
//! The single error type shared by fetchers and pollers. Values are `Clone` so a
//! poller can publish the last failure next to the last good snapshot.

/// Errors surfaced by fetchers and pollers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Transport or server failure, carried verbatim from the fetcher.
    #[error("Fetch failed: {0}")]
    Fetch(String),
    /// The server reported a status outside the known set.
    #[error("Unknown status: {0}")]
    UnknownStatus(String),
    #[error("Invalid poll configuration: {0}")]
    InvalidConfig(String),
    #[error("Poller closed")]
    PollerClosed,
    #[error("Poller dropped response channel")]
    PollerDropped,
}
