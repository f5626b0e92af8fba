//! # Entity Poller
//!
//! Polls a single entity until the server moves it to a terminal status, then stops for good.
//!
//! ## Lifecycle
//!
//! 1. **Construction** decides whether polling is warranted: an active initial status spawns the
//!    poll loop, a terminal one leaves the poller halted with [`HaltReason::Inactive`].
//! 2. **Running**: one immediate fetch, then one fetch per interval. A fetch that outlasts the
//!    interval swallows the ticks that fell due meanwhile; they are not replayed.
//! 3. **Halting**: a terminal status ([`HaltReason::Terminal`]) or a failed fetch
//!    ([`HaltReason::Failed`]) disarms the timer permanently. [`EntityPoller::stop`] disarms it
//!    on request ([`HaltReason::ManualStop`]) and is the only halt [`EntityPoller::resume`]
//!    can undo.
//!
//! The handle and the loop share a `watch` channel. The loop is the only writer of fetched
//! data; the handle only ever flips `polling` off. A fetch that is in flight when `stop()` is
//! called still completes and its snapshot is kept, but it can never turn polling back on.

use crate::config::PollConfig;
use crate::entity::{entity_type, PolledEntity, StatusPhase};
use crate::error::SyncError;
use crate::fetcher::SnapshotFetcher;
use crate::notifier::TransitionNotifier;
use crate::state::{EntityState, HaltReason};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Handle to a single-entity poll loop.
///
/// Dropping the handle stops the poller; use [`shutdown`](Self::shutdown) to also wait for
/// an in-flight fetch to settle.
pub struct EntityPoller<T: PolledEntity> {
    id: T::Id,
    fetcher: Arc<dyn SnapshotFetcher<T>>,
    config: PollConfig,
    state: Arc<watch::Sender<EntityState<T>>>,
    task: Option<JoinHandle<TransitionNotifier<T>>>,
    /// Parked here whenever no loop is running.
    notifier: Option<TransitionNotifier<T>>,
}

impl<T: PolledEntity> EntityPoller<T> {
    /// Starts polling `id` if `initial_status` is active.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(
        id: T::Id,
        initial_status: T::Status,
        fetcher: Arc<dyn SnapshotFetcher<T>>,
        config: PollConfig,
    ) -> Self {
        Self::spawn_with_notifier(id, initial_status, fetcher, config, TransitionNotifier::new())
    }

    /// Like [`spawn`](Self::spawn), reporting status changes through `notifier`.
    ///
    /// The notifier is seeded with `initial_status`, so the first fetched change is reported.
    pub fn spawn_with_notifier(
        id: T::Id,
        initial_status: T::Status,
        fetcher: Arc<dyn SnapshotFetcher<T>>,
        config: PollConfig,
        mut notifier: TransitionNotifier<T>,
    ) -> Self {
        notifier.seed(id.clone(), initial_status);
        let active = initial_status.is_active();
        let (state, _) = watch::channel(EntityState::new(active));

        let mut poller = Self {
            id,
            fetcher,
            config,
            state: Arc::new(state),
            task: None,
            notifier: Some(notifier),
        };

        if active {
            poller.start();
        } else {
            info!(
                entity_type = entity_type::<T>(),
                id = %poller.id,
                status = %initial_status,
                "Not polling, status is terminal"
            );
        }
        poller
    }

    fn start(&mut self) {
        let poll_loop = EntityLoop {
            id: self.id.clone(),
            fetcher: self.fetcher.clone(),
            notifier: self.notifier.take().unwrap_or_default(),
            state: self.state.clone(),
            period: self.config.interval(),
        };
        self.task = Some(tokio::spawn(poll_loop.run()));
    }

    pub fn id(&self) -> &T::Id {
        &self.id
    }

    /// Latest fetched snapshot, `None` before the first successful fetch.
    pub fn snapshot(&self) -> Option<T> {
        self.state.borrow().snapshot.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.state.borrow().polling
    }

    pub fn last_error(&self) -> Option<SyncError> {
        self.state.borrow().last_error.clone()
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.state.borrow().halted
    }

    /// Whether a fetch is outstanding right now.
    pub fn is_fetching(&self) -> bool {
        self.state.borrow().in_flight
    }

    /// Completed fetches, successful or not.
    pub fn fetch_count(&self) -> u64 {
        self.state.borrow().fetches
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<EntityState<T>> {
        self.state.subscribe()
    }

    /// Disarms the timer. Idempotent and safe while a fetch is in flight.
    pub fn stop(&self) {
        let stopped = self.state.send_if_modified(|s| {
            if !s.polling {
                return false;
            }
            s.polling = false;
            s.halted = Some(HaltReason::ManualStop);
            true
        });
        if stopped {
            info!(entity_type = entity_type::<T>(), id = %self.id, "Polling stopped");
        }
    }

    /// Re-arms a poller halted by [`stop`](Self::stop).
    ///
    /// Returns `false` without fetching when the poller is still running or was halted by a
    /// terminal status, a failure, or a terminal initial status. Waits for any in-flight fetch
    /// of the previous loop first; if that fetch turned out terminal or failed, the poller stays
    /// halted.
    pub async fn resume(&mut self) -> bool {
        let resumable = self
            .state
            .borrow()
            .halted
            .is_some_and(|reason| reason.allows_entity_resume());
        if !resumable {
            debug!(
                entity_type = entity_type::<T>(),
                id = %self.id,
                halted = ?self.halt_reason(),
                "Resume refused"
            );
            return false;
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(notifier) => self.notifier = Some(notifier),
                Err(e) => warn!(entity_type = entity_type::<T>(), id = %self.id, error = %e, "Poll task failed"),
            }
        }

        let rearmed = self.state.send_if_modified(|s| {
            if s.halted != Some(HaltReason::ManualStop) {
                return false;
            }
            s.polling = true;
            s.halted = None;
            true
        });
        if rearmed {
            info!(entity_type = entity_type::<T>(), id = %self.id, "Polling resumed");
            self.start();
        }
        rearmed
    }

    /// Stops polling and waits for the loop to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(entity_type = entity_type::<T>(), id = %self.id, error = %e, "Poll task failed");
            }
        }
    }
}

impl<T: PolledEntity> Drop for EntityPoller<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

struct EntityLoop<T: PolledEntity> {
    id: T::Id,
    fetcher: Arc<dyn SnapshotFetcher<T>>,
    notifier: TransitionNotifier<T>,
    state: Arc<watch::Sender<EntityState<T>>>,
    period: Duration,
}

impl<T: PolledEntity> EntityLoop<T> {
    async fn run(mut self) -> TransitionNotifier<T> {
        let entity_type = entity_type::<T>();
        let mut changes = self.state.subscribe();
        // First tick completes immediately: that is the initial fetch.
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            entity_type,
            id = %self.id,
            period_ms = self.period.as_millis() as u64,
            "Polling started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = changes.changed() => {
                    if changed.is_err() || !changes.borrow().polling {
                        break;
                    }
                    continue;
                }
            }
            if !self.state.borrow().polling {
                break;
            }

            self.state.send_modify(|s| s.in_flight = true);
            let started = Instant::now();
            let outcome = self.fetcher.fetch_one(&self.id).await;
            if started.elapsed() >= self.period {
                // Ticks that fell due during the fetch are dropped, not replayed.
                ticker.reset();
            }
            if !self.apply(outcome) {
                break;
            }
        }

        debug!(entity_type, id = %self.id, "Poll loop exited");
        self.notifier
    }

    /// Publishes the fetch outcome. Returns whether polling continues.
    fn apply(&mut self, outcome: Result<T, SyncError>) -> bool {
        let entity_type = entity_type::<T>();
        match outcome {
            Ok(snapshot) => {
                let status = snapshot.status();
                let transition = self.notifier.record(&snapshot);
                let mut keep_polling = false;
                self.state.send_modify(|s| {
                    s.in_flight = false;
                    s.fetches += 1;
                    s.snapshot = Some(snapshot);
                    s.last_error = None;
                    if status.is_terminal() {
                        s.polling = false;
                        s.halted = Some(HaltReason::Terminal);
                    }
                    keep_polling = s.polling;
                });
                debug!(entity_type, id = %self.id, %status, "Fetched");

                if let Some(transition) = transition {
                    info!(
                        entity_type,
                        id = %self.id,
                        from = %transition.from,
                        to = %transition.to,
                        "Status changed"
                    );
                    self.notifier.emit(&transition);
                }
                if status.is_terminal() {
                    info!(entity_type, id = %self.id, %status, "Terminal status, polling stopped");
                }
                keep_polling
            }
            Err(error) => {
                warn!(entity_type, id = %self.id, %error, "Fetch failed, polling stopped");
                self.state.send_modify(|s| {
                    s.in_flight = false;
                    s.fetches += 1;
                    s.last_error = Some(error);
                    s.polling = false;
                    s.halted = Some(HaltReason::Failed);
                });
                false
            }
        }
    }
}
