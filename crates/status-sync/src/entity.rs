//! # PolledEntity Trait
//!
//! The `PolledEntity` trait is the contract every server-owned resource (an order, a job, a
//! payment, …) implements so the generic pollers can track it. It exposes a stable identity and
//! a status whose [`StatusPhase`] decides whether the server may still change it.
//!
//! # Architecture Note
//! The pollers never look inside an entity beyond `id()` and `status()`. Everything else about
//! the snapshot is opaque to them: it is stored, published and replaced wholesale on every fetch.
//!
//! We use "Associated Types" (`type Id`, `type Status`) so a poller over orders can only be fed
//! order snapshots and only reports order statuses in its transition events.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Lifecycle phase of a status value.
///
/// A status is either **active** (the server is still working on the entity, so it is worth
/// polling) or **terminal** (no further change is expected, so polling must stop).
pub trait StatusPhase: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static {
    /// True while the server may still move the entity to another status.
    fn is_active(&self) -> bool;

    /// True once no further change is expected.
    fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

/// Trait that any server-owned entity must implement to be tracked by a poller.
pub trait PolledEntity: Clone + Debug + Send + Sync + 'static {
    /// Stable identifier assigned by the server (e.g. `u64`, `Uuid`, a newtype).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The status enum, partitioned into active and terminal values.
    type Status: StatusPhase;

    fn id(&self) -> &Self::Id;

    fn status(&self) -> Self::Status;

    /// Shorthand for `self.status().is_active()`.
    fn is_active(&self) -> bool {
        self.status().is_active()
    }
}

/// True if at least one member of the collection is in an active status.
pub fn has_active_member<T: PolledEntity>(items: &[T]) -> bool {
    items.iter().any(PolledEntity::is_active)
}

/// Short type name used as the `entity_type` field in log lines
/// (e.g. `Order` instead of `storefront::model::order::Order`).
pub(crate) fn entity_type<T>() -> &'static str {
    std::any::type_name::<T>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}
