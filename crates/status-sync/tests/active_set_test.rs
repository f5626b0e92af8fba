mod common;

use common::{advance_ms, job, one_second, Job, JobStatus};
use status_sync::mock::MockFetcher;
use status_sync::{ActiveSetPoller, HaltReason, SyncError, TransitionNotifier};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

fn ids(poller: &ActiveSetPoller<Job>) -> Vec<u32> {
    poller.latest_collection().iter().map(|j| j.id).collect()
}

/// [1 COMPLETED, 2 PENDING] arms the timer; [1 COMPLETED, 2 EXPIRED] disarms it.
#[tokio::test(start_paused = true)]
async fn test_polls_while_any_member_active() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many()
        .return_ok(vec![job(1, JobStatus::Completed), job(2, JobStatus::Pending)]);
    mock.expect_many()
        .return_ok(vec![job(1, JobStatus::Completed), job(2, JobStatus::Expired)]);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let notifier = TransitionNotifier::<Job>::new()
        .on_transition(move |t| sink.lock().unwrap().push((t.id, t.from, t.to)));
    let poller =
        ActiveSetPoller::<Job>::spawn_with_notifier(Arc::new(mock.clone()), one_second(), notifier);

    advance_ms(10).await;
    assert!(poller.is_loaded());
    assert!(poller.has_active_member());
    assert!(poller.is_polling());
    assert_eq!(ids(&poller), vec![1, 2]);

    advance_ms(1_000).await;
    assert!(!poller.has_active_member());
    assert!(!poller.is_polling());
    assert_eq!(poller.halt_reason(), None);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(2, JobStatus::Pending, JobStatus::Expired)]
    );

    advance_ms(10_000).await;
    assert_eq!(mock.calls(), 2);
    poller.shutdown().await;
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_all_terminal_never_arms() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many()
        .return_ok(vec![job(1, JobStatus::Completed), job(2, JobStatus::Expired)]);

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());

    advance_ms(10_000).await;
    assert!(poller.is_loaded());
    assert!(!poller.is_polling());
    assert_eq!(mock.calls(), 1);
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_mutation_with_active_entity_arms_timer() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many().return_ok(vec![job(1, JobStatus::Completed)]);

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());
    advance_ms(10).await;
    assert!(!poller.is_polling());

    mock.expect_many()
        .return_ok(vec![job(3, JobStatus::Completed), job(1, JobStatus::Completed)]);

    let armed = poller
        .notify_mutation(job(3, JobStatus::Pending))
        .await
        .unwrap();
    assert!(armed);
    assert!(poller.is_polling());
    assert_eq!(ids(&poller), vec![3, 1], "new entity goes to the front");

    // First tick one interval after arming.
    advance_ms(1_010).await;
    assert_eq!(mock.calls(), 2);
    assert!(!poller.is_polling());

    advance_ms(10_000).await;
    assert_eq!(mock.calls(), 2);
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_mutation_replaces_tracked_member_in_place() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many()
        .return_ok(vec![job(1, JobStatus::Pending), job(2, JobStatus::Completed)]);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let notifier = TransitionNotifier::<Job>::new()
        .on_transition(move |t| sink.lock().unwrap().push((t.id, t.from, t.to)));
    let poller =
        ActiveSetPoller::<Job>::spawn_with_notifier(Arc::new(mock.clone()), one_second(), notifier);
    advance_ms(10).await;

    let armed = poller
        .notify_mutation(job(1, JobStatus::Processing))
        .await
        .unwrap();
    assert!(armed);
    assert_eq!(ids(&poller), vec![1, 2]);
    assert_eq!(poller.latest_collection()[0].status, JobStatus::Processing);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(1, JobStatus::Pending, JobStatus::Processing)]
    );

    poller.shutdown().await;
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_mutation_while_stopped_does_not_arm() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many().return_ok(vec![job(1, JobStatus::Pending)]);

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());
    advance_ms(10).await;
    assert!(poller.is_polling());

    poller.stop();
    poller.stop();
    assert_eq!(poller.halt_reason(), Some(HaltReason::ManualStop));

    let armed = poller
        .notify_mutation(job(2, JobStatus::Pending))
        .await
        .unwrap();
    assert!(!armed);
    assert!(!poller.is_polling());
    assert_eq!(ids(&poller), vec![2, 1]);

    advance_ms(5_000).await;
    assert_eq!(mock.calls(), 1);

    // refresh() lifts the manual stop.
    mock.expect_many()
        .return_ok(vec![job(2, JobStatus::Completed), job(1, JobStatus::Completed)]);
    assert_eq!(poller.refresh().await, Ok(2));
    assert_eq!(poller.halt_reason(), None);
    assert!(!poller.is_polling());
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_halts_until_manual_refresh() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many().return_ok(vec![job(1, JobStatus::Pending)]);
    mock.expect_many()
        .return_err(SyncError::Fetch("connection reset".to_string()));

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());

    advance_ms(1_010).await;
    assert_eq!(poller.halt_reason(), Some(HaltReason::Failed));
    assert!(!poller.is_polling());
    assert_eq!(
        poller.last_error(),
        Some(SyncError::Fetch("connection reset".to_string()))
    );
    assert_eq!(ids(&poller), vec![1], "last good collection is kept");

    advance_ms(10_000).await;
    assert_eq!(mock.calls(), 2, "no automatic retry");

    mock.expect_many().return_ok(vec![job(1, JobStatus::Processing)]);
    assert_eq!(poller.refresh().await, Ok(1));
    assert_eq!(poller.halt_reason(), None);
    assert_eq!(poller.last_error(), None);
    assert!(poller.is_polling());

    mock.expect_many().return_ok(vec![job(1, JobStatus::Completed)]);
    advance_ms(1_010).await;
    assert!(!poller.is_polling());
    assert_eq!(mock.calls(), 4);
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_initial_failure_leaves_empty_collection() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many()
        .return_err(SyncError::Fetch("offline".to_string()));

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());
    advance_ms(10).await;

    assert!(poller.is_loaded());
    assert!(poller.latest_collection().is_empty());
    assert_eq!(poller.halt_reason(), Some(HaltReason::Failed));

    mock.expect_many()
        .return_err(SyncError::Fetch("still offline".to_string()));
    assert_eq!(
        poller.refresh().await,
        Err(SyncError::Fetch("still offline".to_string()))
    );
    assert_eq!(poller.fetch_count(), 2);
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_manual_refresh_waits_for_in_flight_fetch() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many()
        .after(Duration::from_millis(2_500))
        .return_ok(vec![job(1, JobStatus::Pending)]);
    mock.expect_many().return_ok(vec![job(1, JobStatus::Completed)]);

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());
    advance_ms(100).await;

    assert_eq!(poller.refresh().await, Ok(1));
    assert_eq!(mock.calls(), 2);
    assert_eq!(mock.max_in_flight(), 1);
    assert!(!poller.is_polling());
    mock.verify();
}

/// A mutation is folded and answered while a 10 s refresh is still pending.
#[tokio::test(start_paused = true)]
async fn test_mutation_answered_during_slow_refresh() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many().return_ok(vec![job(1, JobStatus::Pending)]);
    mock.expect_many()
        .after(Duration::from_secs(10))
        .return_ok(vec![job(1, JobStatus::Processing)]);
    mock.expect_many()
        .return_ok(vec![job(2, JobStatus::Completed), job(1, JobStatus::Completed)]);

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());
    advance_ms(1_100).await;
    assert!(poller.is_fetching());
    assert_eq!(mock.calls(), 2);

    let before = Instant::now();
    let armed = poller
        .notify_mutation(job(2, JobStatus::Pending))
        .await
        .unwrap();
    assert_eq!(Instant::now(), before, "mutation must not wait for the fetch");
    assert!(armed);
    assert_eq!(ids(&poller), vec![2, 1]);
    assert!(poller.is_fetching());

    // The pending fetch predates job 2, so job 2 survives its result.
    advance_ms(10_000).await;
    assert!(!poller.is_fetching());
    assert_eq!(ids(&poller), vec![2, 1]);
    assert_eq!(poller.latest_collection()[1].status, JobStatus::Processing);
    assert!(poller.is_polling());

    advance_ms(1_010).await;
    assert_eq!(mock.calls(), 3);
    assert!(!poller.is_polling());
    assert_eq!(mock.max_in_flight(), 1);
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_timer_refresh_does_not_rearm() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many().return_ok(vec![job(1, JobStatus::Pending)]);
    mock.expect_many()
        .after(Duration::from_millis(500))
        .return_ok(vec![job(1, JobStatus::Processing)]);

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());
    advance_ms(1_200).await;
    assert!(poller.is_fetching());

    poller.stop();
    advance_ms(400).await;
    assert!(!poller.is_fetching());
    assert_eq!(poller.latest_collection()[0].status, JobStatus::Processing);
    assert!(!poller.is_polling(), "in-flight result must not re-arm");
    assert_eq!(poller.halt_reason(), Some(HaltReason::ManualStop));
    assert_eq!(mock.calls(), 2);

    advance_ms(10_000).await;
    assert_eq!(mock.calls(), 2);
    mock.verify();
}

/// A 2 s refresh on a 1 s interval: ticks at 2000 and 3000 are dropped, the next one is at 4000.
#[tokio::test(start_paused = true)]
async fn test_slow_timer_refresh_never_overlaps() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many().return_ok(vec![job(1, JobStatus::Pending)]);
    mock.expect_many()
        .after(Duration::from_millis(2_000))
        .return_ok(vec![job(1, JobStatus::Processing)]);
    mock.expect_many().return_ok(vec![job(1, JobStatus::Completed)]);

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());

    advance_ms(3_400).await;
    assert_eq!(mock.calls(), 2);
    assert_eq!(poller.fetch_count(), 2);
    assert_eq!(mock.max_in_flight(), 1);

    advance_ms(610).await;
    assert_eq!(mock.calls(), 3);
    assert!(!poller.is_polling());
    assert_eq!(mock.max_in_flight(), 1);
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_stop_then_drop_leaves_no_timer() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many().return_ok(vec![job(1, JobStatus::Pending)]);

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());
    advance_ms(10).await;
    assert!(poller.is_polling());

    poller.stop();
    drop(poller);

    advance_ms(10_000).await;
    assert_eq!(mock.calls(), 1);
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_is_fetching_tracks_each_refresh() {
    let mock = MockFetcher::<Job>::new();
    mock.expect_many()
        .after(Duration::from_millis(300))
        .return_ok(vec![job(1, JobStatus::Pending)]);
    mock.expect_many()
        .after(Duration::from_millis(300))
        .return_ok(vec![job(1, JobStatus::Completed)]);

    let poller = ActiveSetPoller::<Job>::spawn(Arc::new(mock.clone()), one_second());
    let mut state = poller.subscribe();

    advance_ms(100).await;
    assert!(poller.is_fetching());
    assert!(!poller.is_loaded());

    advance_ms(300).await;
    assert!(!poller.is_fetching());
    assert!(poller.is_loaded());

    // Timer refresh at 1300, answered at 1600.
    state.wait_for(|s| s.in_flight).await.unwrap();
    assert_eq!(mock.calls(), 2);
    state.wait_for(|s| !s.in_flight).await.unwrap();
    assert!(!poller.is_polling());
    mock.verify();
}
