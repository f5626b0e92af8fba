//! # Transition Notifier
//!
//! A stateful comparator that remembers the last status seen for every entity id and turns a
//! stream of snapshots into a stream of status *changes*.
//!
//! ## Guarantees
//!
//! - A transition `(id, from, to)` is produced exactly once per change. Feeding
//!   `PENDING, PENDING, PROCESSING, PROCESSING, COMPLETED` yields two events.
//! - The held status is updated before any observer runs, so an observer that re-enters the
//!   notifier's owner never sees the old value.
//! - The first snapshot of an id nobody has seen is recorded silently. Use
//!   [`TransitionNotifier::seed`] when the caller already knows a prior status.
//!
//! Each poller owns its own notifier. Two pollers watching the same id keep independent
//! comparator state and may each report the same change once.

use crate::entity::PolledEntity;
use std::collections::{HashMap, HashSet};

/// One observed status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<I, S> {
    pub id: I,
    pub from: S,
    pub to: S,
}

/// The transition type produced for entity `T`.
pub type TransitionOf<T> = Transition<<T as PolledEntity>::Id, <T as PolledEntity>::Status>;

type Observer<T> = Box<dyn Fn(&TransitionOf<T>) + Send + Sync>;

/// Remembers the last status per id and notifies observers on change.
pub struct TransitionNotifier<T: PolledEntity> {
    last_seen: HashMap<T::Id, T::Status>,
    observers: Vec<Observer<T>>,
}

impl<T: PolledEntity> Default for TransitionNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PolledEntity> std::fmt::Debug for TransitionNotifier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionNotifier")
            .field("last_seen", &self.last_seen)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<T: PolledEntity> TransitionNotifier<T> {
    pub fn new() -> Self {
        Self {
            last_seen: HashMap::new(),
            observers: Vec::new(),
        }
    }

    /// Builder form of [`subscribe`](Self::subscribe).
    pub fn on_transition(
        mut self,
        observer: impl Fn(&TransitionOf<T>) + Send + Sync + 'static,
    ) -> Self {
        self.subscribe(observer);
        self
    }

    /// Registers a callback invoked once per emitted transition.
    pub fn subscribe(&mut self, observer: impl Fn(&TransitionOf<T>) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Records a known status without emitting anything.
    pub fn seed(&mut self, id: T::Id, status: T::Status) {
        self.last_seen.insert(id, status);
    }

    /// Updates the held status from `entity` and returns the change, if any.
    ///
    /// Observers are *not* called; pair with [`emit`](Self::emit).
    pub fn record(&mut self, entity: &T) -> Option<TransitionOf<T>> {
        let to = entity.status();
        match self.last_seen.insert(entity.id().clone(), to) {
            Some(from) if from != to => Some(Transition {
                id: entity.id().clone(),
                from,
                to,
            }),
            _ => None,
        }
    }

    /// Records every member of a collection, returning the changes in collection order.
    ///
    /// The collection is the whole tracked set: ids missing from `items` are forgotten.
    pub fn record_all(&mut self, items: &[T]) -> Vec<TransitionOf<T>> {
        let present: HashSet<&T::Id> = items.iter().map(|item| item.id()).collect();
        self.last_seen.retain(|id, _| present.contains(id));
        items.iter().filter_map(|item| self.record(item)).collect()
    }

    /// Calls every observer with `transition`.
    pub fn emit(&self, transition: &TransitionOf<T>) {
        for observer in &self.observers {
            observer(transition);
        }
    }

    /// [`record`](Self::record) then [`emit`](Self::emit).
    pub fn observe(&mut self, entity: &T) -> Option<TransitionOf<T>> {
        let transition = self.record(entity)?;
        self.emit(&transition);
        Some(transition)
    }

    pub fn last_status(&self, id: &T::Id) -> Option<T::Status> {
        self.last_seen.get(id).copied()
    }

    /// Drops the held status for `id`; its next snapshot is recorded silently.
    pub fn forget(&mut self, id: &T::Id) {
        self.last_seen.remove(id);
    }
}
