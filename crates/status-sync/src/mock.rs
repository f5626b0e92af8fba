//! # Scripted Fetcher for Tests
//!
//! `MockFetcher<T>` implements [`SnapshotFetcher`] from a queue of expectations. Each fetch
//! pops the next expectation, optionally waits for its delay (in Tokio time, so tests running
//! with `start_paused = true` advance instantly), and returns the scripted result.
//!
//! | Feature              | MockFetcher                      | Real transport            |
//! |----------------------|----------------------------------|---------------------------|
//! | **Timing**           | Scripted per call (`after`)      | Network dependent         |
//! | **Error injection**  | `return_err`                     | Requires a failing server |
//! | **Concurrency probe**| `max_in_flight()`                | n/a                       |
//!
//! ## Example
//!
//! ```rust
//! use status_sync::mock::MockFetcher;
//! use status_sync::{PolledEntity, SnapshotFetcher, StatusPhase, SyncError};
//! use std::time::Duration;
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
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() {
//! let mock = MockFetcher::<Job>::new();
//! mock.expect_one(1)
//!     .after(Duration::from_millis(500))
//!     .return_ok(Job { id: 1, phase: Phase::Done });
//! mock.expect_many().return_err(SyncError::Fetch("offline".into()));
//!
//! assert_eq!(mock.fetch_one(&1).await.unwrap().phase, Phase::Done);
//! assert!(mock.fetch_many().await.is_err());
//! assert_eq!(mock.calls(), 2);
//! mock.verify();
//! # }
//! ```

use crate::entity::PolledEntity;
use crate::error::SyncError;
use crate::fetcher::SnapshotFetcher;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

enum Expectation<T: PolledEntity> {
    One {
        id: T::Id,
        delay: Duration,
        response: Result<T, SyncError>,
    },
    Many {
        delay: Duration,
        response: Result<Vec<T>, SyncError>,
    },
}

#[derive(Default)]
struct Counters {
    calls: AtomicUsize,
    unexpected: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<T: PolledEntity>(queue: &Queue<T>) -> MutexGuard<'_, VecDeque<Expectation<T>>> {
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A [`SnapshotFetcher`] that replays scripted responses in order.
///
/// Cloning shares the script and the counters, so a test can keep one handle while the
/// poller owns another.
pub struct MockFetcher<T: PolledEntity> {
    expectations: Queue<T>,
    counters: Arc<Counters>,
}

impl<T: PolledEntity> Clone for MockFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            expectations: self.expectations.clone(),
            counters: self.counters.clone(),
        }
    }
}

impl<T: PolledEntity> Default for MockFetcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PolledEntity> MockFetcher<T> {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Expects a `fetch_one(id)` call.
    pub fn expect_one(&self, id: T::Id) -> OneExpectationBuilder<T> {
        OneExpectationBuilder {
            id,
            delay: Duration::ZERO,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `fetch_many()` call.
    pub fn expect_many(&self) -> ManyExpectationBuilder<T> {
        ManyExpectationBuilder {
            delay: Duration::ZERO,
            expectations: self.expectations.clone(),
        }
    }

    /// Fetches started so far, expected or not.
    pub fn calls(&self) -> usize {
        self.counters.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.counters.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn remaining(&self) -> usize {
        lock(&self.expectations).len()
    }

    /// Panics if an expectation is left over or a call arrived that nothing was scripted for.
    pub fn verify(&self) {
        let remaining = self.remaining();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
        let unexpected = self.counters.unexpected.load(Ordering::SeqCst);
        if unexpected > 0 {
            panic!("{} unexpected fetch call(s)", unexpected);
        }
    }

    fn begin(&self) -> InFlight<'_> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight(&self.counters)
    }

    fn unexpected(&self, call: &str) -> SyncError {
        self.counters.unexpected.fetch_add(1, Ordering::SeqCst);
        SyncError::Fetch(format!("unexpected {} call", call))
    }
}

/// Decrements the in-flight counter even when the fetch future is dropped mid-delay.
struct InFlight<'a>(&'a Counters);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<T: PolledEntity> SnapshotFetcher<T> for MockFetcher<T> {
    async fn fetch_one(&self, id: &T::Id) -> Result<T, SyncError> {
        let _guard = self.begin();
        let next = lock(&self.expectations).pop_front();
        match next {
            Some(Expectation::One {
                id: expected,
                delay,
                response,
            }) if expected == *id => {
                tokio::time::sleep(delay).await;
                response
            }
            Some(other) => {
                lock(&self.expectations).push_front(other);
                Err(self.unexpected("fetch_one"))
            }
            None => Err(self.unexpected("fetch_one")),
        }
    }

    async fn fetch_many(&self) -> Result<Vec<T>, SyncError> {
        let _guard = self.begin();
        let next = lock(&self.expectations).pop_front();
        match next {
            Some(Expectation::Many { delay, response }) => {
                tokio::time::sleep(delay).await;
                response
            }
            Some(other) => {
                lock(&self.expectations).push_front(other);
                Err(self.unexpected("fetch_many"))
            }
            None => Err(self.unexpected("fetch_many")),
        }
    }
}

/// Builder for a `fetch_one` expectation.
pub struct OneExpectationBuilder<T: PolledEntity> {
    id: T::Id,
    delay: Duration,
    expectations: Queue<T>,
}

impl<T: PolledEntity> OneExpectationBuilder<T> {
    /// Delays the response by `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn return_ok(self, entity: T) {
        self.push(Ok(entity));
    }

    pub fn return_err(self, error: SyncError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, SyncError>) {
        lock(&self.expectations).push_back(Expectation::One {
            id: self.id,
            delay: self.delay,
            response,
        });
    }
}

/// Builder for a `fetch_many` expectation.
pub struct ManyExpectationBuilder<T: PolledEntity> {
    delay: Duration,
    expectations: Queue<T>,
}

impl<T: PolledEntity> ManyExpectationBuilder<T> {
    /// Delays the response by `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn return_ok(self, items: Vec<T>) {
        self.push(Ok(items));
    }

    pub fn return_err(self, error: SyncError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Vec<T>, SyncError>) {
        lock(&self.expectations).push_back(Expectation::Many {
            delay: self.delay,
            response,
        });
    }
}
