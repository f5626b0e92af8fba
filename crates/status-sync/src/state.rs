//! # Published Poller State
//!
//! Every poller publishes its state through a `tokio::sync::watch` channel. Readers get a cheap,
//! always-current view (`borrow()`) or can await the next change (`changed()` / `wait_for()`),
//! while the poll loop stays the only writer of fetched data.

use crate::entity::{has_active_member, PolledEntity};
use crate::error::SyncError;

/// Why a poller is not polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The entity poller was constructed with a terminal status, so it never armed.
    Inactive,
    /// The caller stopped the poller.
    ManualStop,
    /// A fetch returned a terminal status.
    Terminal,
    /// A fetch failed.
    Failed,
}

impl HaltReason {
    /// Whether a caller may re-arm a poller halted for this reason.
    ///
    /// | Reason       | Entity poller | Active-set poller |
    /// |--------------|---------------|-------------------|
    /// | `Inactive`   | never         | n/a               |
    /// | `ManualStop` | `resume()`    | `refresh()`       |
    /// | `Terminal`   | never         | n/a               |
    /// | `Failed`     | never         | `refresh()`       |
    pub fn allows_entity_resume(&self) -> bool {
        matches!(self, HaltReason::ManualStop)
    }
}

/// State published by an [`EntityPoller`](crate::EntityPoller).
#[derive(Debug, Clone)]
pub struct EntityState<T: PolledEntity> {
    /// Latest fetched snapshot; `None` before the first successful fetch.
    pub snapshot: Option<T>,
    /// Whether the timer is armed.
    pub polling: bool,
    /// True while a fetch is outstanding.
    pub in_flight: bool,
    /// Completed fetches, successful or not.
    pub fetches: u64,
    /// Error from the most recent fetch, cleared by the next success.
    pub last_error: Option<SyncError>,
    pub halted: Option<HaltReason>,
}

impl<T: PolledEntity> EntityState<T> {
    pub(crate) fn new(polling: bool) -> Self {
        Self {
            snapshot: None,
            polling,
            in_flight: false,
            fetches: 0,
            last_error: None,
            halted: (!polling).then_some(HaltReason::Inactive),
        }
    }
}

/// State published by an [`ActiveSetPoller`](crate::ActiveSetPoller).
#[derive(Debug, Clone)]
pub struct CollectionState<T: PolledEntity> {
    /// Most recently fetched collection with mutations folded in.
    pub items: Vec<T>,
    /// Whether the timer is armed.
    pub armed: bool,
    /// True once the first refresh has completed, successfully or not.
    pub loaded: bool,
    /// True while a refresh is outstanding.
    pub in_flight: bool,
    /// Completed refreshes, successful or not.
    pub fetches: u64,
    /// Error from the most recent refresh, cleared by the next success.
    pub last_error: Option<SyncError>,
    pub halted: Option<HaltReason>,
}

impl<T: PolledEntity> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            armed: false,
            loaded: false,
            in_flight: false,
            fetches: 0,
            last_error: None,
            halted: None,
        }
    }
}

impl<T: PolledEntity> CollectionState<T> {
    pub fn has_active_member(&self) -> bool {
        has_active_member(&self.items)
    }

    /// Re-evaluates the timer decision from the current collection.
    pub(crate) fn rearm(&mut self) -> bool {
        self.armed = self.halted.is_none() && self.has_active_member();
        self.armed
    }

    /// Replaces a tracked member in place, or inserts a new one at the front.
    pub(crate) fn fold(&mut self, entity: T) {
        match self.items.iter().position(|item| item.id() == entity.id()) {
            Some(pos) => self.items[pos] = entity,
            None => self.items.insert(0, entity),
        }
    }
}
