//! # Active-Set Poller
//!
//! Keeps a tracked collection fresh while, and only while, at least one member is active.
//!
//! The poller is a small actor: the handle sends commands over an `mpsc` channel, the loop
//! owns the fetcher, the timer and the transition notifier, and publishes a
//! [`CollectionState`] through a `watch` channel. The loop keeps at most one `fetch_many`
//! outstanding and keeps serving commands while it is pending:
//!
//! - a mutation is folded in and answered at once, without waiting for the fetch;
//! - [`ActiveSetPoller::refresh`] waits for the pending fetch, then fetches again;
//! - a timer tick that falls due meanwhile is skipped.
//!
//! ## Timer decision
//!
//! After every refresh and every mutation the loop recomputes
//! `armed = not halted && has_active_member`:
//!
//! | Event                          | Effect                                            |
//! |--------------------------------|---------------------------------------------------|
//! | refresh with an active member  | keep the timer, or start it one interval out      |
//! | refresh with no active member  | drop the timer                                    |
//! | refresh fails                  | drop the timer, halt with [`HaltReason::Failed`]  |
//! | mutation                       | fold into the collection, re-evaluate immediately |
//! | `stop()`                       | drop the timer, halt with [`HaltReason::ManualStop`] |
//! | `refresh()`                    | clear any halt, refresh now                       |
//!
//! While halted, mutations are still folded in but never arm the timer.

use crate::config::PollConfig;
use crate::entity::{entity_type, PolledEntity};
use crate::error::SyncError;
use crate::fetcher::SnapshotFetcher;
use crate::message::{PollCommand, Response};
use crate::notifier::TransitionNotifier;
use crate::state::{CollectionState, HaltReason};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

const COMMAND_BUFFER: usize = 32;

/// Handle to a collection poll loop.
///
/// Dropping the handle closes the command channel; the loop exits and abandons any in-flight
/// refresh.
pub struct ActiveSetPoller<T: PolledEntity> {
    sender: mpsc::Sender<PollCommand<T>>,
    state: Arc<watch::Sender<CollectionState<T>>>,
    task: JoinHandle<()>,
}

impl<T: PolledEntity> ActiveSetPoller<T> {
    /// Spawns the loop, which performs one refresh immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(fetcher: Arc<dyn SnapshotFetcher<T>>, config: PollConfig) -> Self {
        Self::spawn_with_notifier(fetcher, config, TransitionNotifier::new())
    }

    /// Like [`spawn`](Self::spawn), reporting member status changes through `notifier`.
    pub fn spawn_with_notifier(
        fetcher: Arc<dyn SnapshotFetcher<T>>,
        config: PollConfig,
        notifier: TransitionNotifier<T>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        let (state, _) = watch::channel(CollectionState::default());
        let state = Arc::new(state);

        let poll_loop = CollectionLoop {
            fetcher,
            notifier,
            state: state.clone(),
            period: config.interval(),
        };
        let task = tokio::spawn(poll_loop.run(receiver));

        Self {
            sender,
            state,
            task,
        }
    }

    /// The most recently fetched collection, mutations included.
    pub fn latest_collection(&self) -> Vec<T> {
        self.state.borrow().items.clone()
    }

    pub fn has_active_member(&self) -> bool {
        self.state.borrow().has_active_member()
    }

    /// Whether the timer is armed.
    pub fn is_polling(&self) -> bool {
        self.state.borrow().armed
    }

    /// True once the initial refresh has completed.
    pub fn is_loaded(&self) -> bool {
        self.state.borrow().loaded
    }

    pub fn last_error(&self) -> Option<SyncError> {
        self.state.borrow().last_error.clone()
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.state.borrow().halted
    }

    /// Whether a refresh is outstanding right now.
    pub fn is_fetching(&self) -> bool {
        self.state.borrow().in_flight
    }

    /// Completed refreshes, successful or not.
    pub fn fetch_count(&self) -> u64 {
        self.state.borrow().fetches
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<CollectionState<T>> {
        self.state.subscribe()
    }

    /// Disarms the timer until the next [`refresh`](Self::refresh).
    ///
    /// Idempotent and safe while a refresh is in flight: that refresh still publishes its
    /// collection but cannot re-arm the timer.
    pub fn stop(&self) {
        let stopped = self.state.send_if_modified(|s| {
            if s.halted == Some(HaltReason::ManualStop) {
                return false;
            }
            s.halted = Some(HaltReason::ManualStop);
            s.armed = false;
            true
        });
        if stopped {
            info!(entity_type = entity_type::<T>(), "Polling stopped");
        }
    }

    /// Folds an entity created or changed elsewhere into the collection.
    ///
    /// A tracked id is replaced in place; a new id is inserted at the front. Returns whether
    /// the timer is armed afterwards.
    #[instrument(skip(self, entity), fields(id = %entity.id()))]
    pub async fn notify_mutation(&self, entity: T) -> Result<bool, SyncError> {
        debug!("Sending mutation");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PollCommand::Mutation { entity, respond_to })
            .await
            .map_err(|_| SyncError::PollerClosed)?;
        response.await.map_err(|_| SyncError::PollerDropped)?
    }

    /// Clears any halt and refreshes now. This is the retry action after a failure and the
    /// restart action after [`stop`](Self::stop).
    ///
    /// Returns the size of the fetched collection.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize, SyncError> {
        debug!("Sending refresh");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PollCommand::Refresh { respond_to })
            .await
            .map_err(|_| SyncError::PollerClosed)?;
        response.await.map_err(|_| SyncError::PollerDropped)?
    }

    /// Stops polling, closes the command channel and waits for the loop to exit.
    pub async fn shutdown(self) {
        self.stop();
        let Self { sender, task, .. } = self;
        drop(sender);
        if let Err(e) = task.await {
            warn!(entity_type = entity_type::<T>(), error = %e, "Poll task failed");
        }
    }
}

type PendingFetch<T> = Pin<Box<dyn Future<Output = Result<Vec<T>, SyncError>> + Send>>;

/// The one outstanding `fetch_many`.
struct InFlight<T: PolledEntity> {
    fetch: PendingFetch<T>,
    started: Instant,
    /// `refresh()` callers answered by this fetch.
    waiters: Vec<Response<usize>>,
    /// Entities folded in while the fetch was pending.
    mutations: Vec<T>,
}

struct CollectionLoop<T: PolledEntity> {
    fetcher: Arc<dyn SnapshotFetcher<T>>,
    notifier: TransitionNotifier<T>,
    state: Arc<watch::Sender<CollectionState<T>>>,
    period: Duration,
}

impl<T: PolledEntity> CollectionLoop<T> {
    async fn run(mut self, mut receiver: mpsc::Receiver<PollCommand<T>>) {
        let entity_type = entity_type::<T>();
        info!(
            entity_type,
            period_ms = self.period.as_millis() as u64,
            "Active-set poller started"
        );
        let mut changes = self.state.subscribe();
        let mut ticker: Option<Interval> = None;
        // Failures of the initial load are published in the state; the caller retries with
        // refresh().
        let mut in_flight = Some(self.begin_fetch(Vec::new()));
        let mut deferred: Vec<Response<usize>> = Vec::new();

        loop {
            self.sync_timer(&mut ticker);
            tokio::select! {
                command = receiver.recv() => match command {
                    Some(PollCommand::Mutation { entity, respond_to }) => {
                        if let Some(fetch) = in_flight.as_mut() {
                            fetch.mutations.push(entity.clone());
                        }
                        let armed = self.fold(entity);
                        let _ = respond_to.send(Ok(armed));
                    }
                    Some(PollCommand::Refresh { respond_to }) => {
                        if in_flight.is_some() {
                            debug!(entity_type, "Refresh deferred behind in-flight fetch");
                            deferred.push(respond_to);
                        } else {
                            self.state.send_modify(|s| s.halted = None);
                            in_flight = Some(self.begin_fetch(vec![respond_to]));
                        }
                    }
                    None => break,
                },
                outcome = next_outcome(&mut in_flight) => {
                    if let Some(fetch) = in_flight.take() {
                        self.settle(fetch, outcome, &mut ticker);
                    }
                    if !deferred.is_empty() {
                        self.state.send_modify(|s| s.halted = None);
                        in_flight = Some(self.begin_fetch(std::mem::take(&mut deferred)));
                    }
                }
                // Ticks that fall due while a fetch is outstanding are skipped.
                _ = next_tick(&mut ticker), if in_flight.is_none() => {
                    in_flight = Some(self.begin_fetch(Vec::new()));
                }
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        let size = self.state.borrow().items.len();
        info!(entity_type, size, "Active-set poller shut down");
    }

    fn begin_fetch(&self, waiters: Vec<Response<usize>>) -> InFlight<T> {
        let fetcher = self.fetcher.clone();
        self.state.send_modify(|s| s.in_flight = true);
        InFlight {
            fetch: Box::pin(async move { fetcher.fetch_many().await }),
            started: Instant::now(),
            waiters,
            mutations: Vec::new(),
        }
    }

    fn fold(&mut self, entity: T) -> bool {
        debug!(
            entity_type = entity_type::<T>(),
            id = %entity.id(),
            status = %entity.status(),
            "Mutation"
        );
        let transition = self.notifier.record(&entity);
        let mut armed = false;
        self.state.send_modify(|s| {
            s.fold(entity);
            armed = s.rearm();
        });
        if let Some(transition) = transition {
            self.notifier.emit(&transition);
        }
        armed
    }

    fn settle(
        &mut self,
        fetch: InFlight<T>,
        outcome: Result<Vec<T>, SyncError>,
        ticker: &mut Option<Interval>,
    ) {
        let InFlight {
            started,
            waiters,
            mutations,
            ..
        } = fetch;
        if let Some(ticker) = ticker.as_mut() {
            if started.elapsed() >= self.period {
                // Ticks that fell due during the refresh are dropped, not replayed.
                ticker.reset();
            }
        }
        let result = self.apply(outcome, mutations);
        for respond_to in waiters {
            let _ = respond_to.send(result.clone());
        }
    }

    /// Publishes a refresh outcome and returns the fetched size.
    ///
    /// The fetched collection replaces the tracked one. Mutations that arrived while the fetch
    /// was pending are newer than it, so those whose id the server did not return yet are
    /// folded back in.
    fn apply(
        &mut self,
        outcome: Result<Vec<T>, SyncError>,
        mutations: Vec<T>,
    ) -> Result<usize, SyncError> {
        let entity_type = entity_type::<T>();
        match outcome {
            Ok(items) => {
                let size = items.len();
                let transitions = self.notifier.record_all(&items);
                let carried: Vec<T> = mutations
                    .into_iter()
                    .filter(|m| !items.iter().any(|item| item.id() == m.id()))
                    .collect();
                for entity in &carried {
                    self.notifier.seed(entity.id().clone(), entity.status());
                }

                let mut armed = false;
                self.state.send_modify(|s| {
                    s.items = items;
                    for entity in carried {
                        s.fold(entity);
                    }
                    s.in_flight = false;
                    s.loaded = true;
                    s.fetches += 1;
                    s.last_error = None;
                    armed = s.rearm();
                });
                debug!(entity_type, size, armed, "Refreshed");

                for transition in &transitions {
                    info!(
                        entity_type,
                        id = %transition.id,
                        from = %transition.from,
                        to = %transition.to,
                        "Status changed"
                    );
                    self.notifier.emit(transition);
                }
                Ok(size)
            }
            Err(error) => {
                warn!(entity_type, %error, "Refresh failed, timer stopped");
                self.state.send_modify(|s| {
                    s.in_flight = false;
                    s.loaded = true;
                    s.fetches += 1;
                    s.last_error = Some(error.clone());
                    s.halted = Some(HaltReason::Failed);
                    s.armed = false;
                });
                Err(error)
            }
        }
    }

    /// Creates or drops the interval to match the published `armed` flag.
    fn sync_timer(&self, ticker: &mut Option<Interval>) {
        let armed = self.state.borrow().armed;
        match (armed, ticker.is_some()) {
            (true, false) => {
                let mut interval =
                    tokio::time::interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                *ticker = Some(interval);
                info!(entity_type = entity_type::<T>(), "Timer armed");
            }
            (false, true) => {
                *ticker = None;
                info!(entity_type = entity_type::<T>(), "Timer disarmed");
            }
            _ => {}
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn next_outcome<T: PolledEntity>(
    in_flight: &mut Option<InFlight<T>>,
) -> Result<Vec<T>, SyncError> {
    match in_flight {
        Some(fetch) => fetch.fetch.as_mut().await,
        None => std::future::pending().await,
    }
}
