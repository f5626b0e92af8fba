//! # Status Sync
//!
//! Client-side synchronization of server-owned entities whose status moves through a
//! lifecycle (`PENDING → PROCESSING → COMPLETED | EXPIRED`, or whatever your domain uses).
//! The server is the source of truth; the client learns about changes only by asking again.
//!
//! ## Pollers
//!
//! | Poller              | Tracks                | Polls while                          |
//! |---------------------|-----------------------|--------------------------------------|
//! | [`EntityPoller`]    | one entity by id      | its last known status is active      |
//! | [`ActiveSetPoller`] | the whole collection  | at least one member is active        |
//!
//! Both run as Tokio tasks, publish their state through a `watch` channel, never let two
//! fetches overlap, and stop on the first failed fetch. A [`TransitionNotifier`] turns
//! successive snapshots into `(id, from, to)` events, each reported exactly once.
//!
//! ## Plugging in a domain
//!
//! 1. Implement [`StatusPhase`] for the status enum (which values are active).
//! 2. Implement [`PolledEntity`] for the snapshot type (`id()` and `status()`).
//! 3. Implement [`SnapshotFetcher`] over your transport.
//!
//! ```rust
//! use async_trait::async_trait;
//! use status_sync::{EntityPoller, PollConfig, PolledEntity, SnapshotFetcher, StatusPhase, SyncError};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Phase { Running, Done }
//! impl std::fmt::Display for Phase {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{:?}", self) }
//! }
//! impl StatusPhase for Phase {
//!     fn is_active(&self) -> bool { matches!(self, Phase::Running) }
//! }
//!
//! #[derive(Debug, Clone)]
//! struct Job { id: u32, phase: Phase }
//! impl PolledEntity for Job {
//!     type Id = u32;
//!     type Status = Phase;
//!     fn id(&self) -> &u32 { &self.id }
//!     fn status(&self) -> Phase { self.phase }
//! }
//!
//! struct Finished;
//! #[async_trait]
//! impl SnapshotFetcher<Job> for Finished {
//!     async fn fetch_one(&self, id: &u32) -> Result<Job, SyncError> {
//!         Ok(Job { id: *id, phase: Phase::Done })
//!     }
//!     async fn fetch_many(&self) -> Result<Vec<Job>, SyncError> { Ok(Vec::new()) }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let poller = EntityPoller::<Job>::spawn(7, Phase::Running, Arc::new(Finished), PollConfig::default());
//! let mut state = poller.subscribe();
//! state.wait_for(|s| !s.polling).await.unwrap();
//! assert_eq!(poller.snapshot().unwrap().phase, Phase::Done);
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`entity`]: the [`PolledEntity`] / [`StatusPhase`] contract
//! - [`fetcher`]: the [`SnapshotFetcher`] I/O edge
//! - [`entity_poller`] and [`active_set`]: the two poll loops
//! - [`notifier`]: transition detection
//! - [`config`]: [`PollConfig`] and its sources
//! - [`mock`]: a scripted fetcher for tests
//! - [`tracing`]: subscriber setup

pub mod active_set;
pub mod config;
pub mod entity;
pub mod entity_poller;
pub mod error;
pub mod fetcher;
mod message;
pub mod mock;
pub mod notifier;
pub mod state;
pub mod tracing;

pub use active_set::ActiveSetPoller;
pub use config::{PollConfig, PollOptions};
pub use entity::{has_active_member, PolledEntity, StatusPhase};
pub use entity_poller::EntityPoller;
pub use error::SyncError;
pub use fetcher::SnapshotFetcher;
pub use notifier::{Transition, TransitionNotifier, TransitionOf};
pub use state::{CollectionState, EntityState, HaltReason};
