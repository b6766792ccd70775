//! Default, per-call and overridden work trackers

mod common;

use common::{gated_append, test_state, update_prop};
use glacier_store::{ActivityTracker, Completion, Store, StoreHandle, StoreOptions, WorkTracker};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeTracker {
    calls: Mutex<usize>,
}

impl FakeTracker {
    fn was_called(&self) -> bool {
        *self.calls.lock().unwrap() > 0
    }
}

impl WorkTracker for FakeTracker {
    fn track(&self, _work: Completion) {
        *self.calls.lock().unwrap() += 1;
    }

    fn is_complete(&self) -> bool {
        true
    }
}

fn store_with_default(tracker: &Arc<FakeTracker>) -> Store<common::TestState> {
    let options = StoreOptions::new().default_tracker(tracker.clone());
    Store::with_options(test_state("Hello world"), options).unwrap()
}

#[tokio::test]
async fn test_dispatch_without_tracker_uses_default() {
    let default_tracker = Arc::new(FakeTracker::default());
    let store = store_with_default(&default_tracker);
    assert!(!default_tracker.was_called());

    store.dispatch(update_prop("New value")).await.unwrap();

    assert_eq!(store.state().prop, "New value");
    assert!(default_tracker.was_called());
}

#[tokio::test]
async fn test_dispatch_with_tracker_skips_default() {
    let default_tracker = Arc::new(FakeTracker::default());
    let local_tracker = Arc::new(FakeTracker::default());
    let store = store_with_default(&default_tracker);

    store
        .dispatch_with_tracker(update_prop("New value"), local_tracker.clone())
        .await
        .unwrap();

    assert_eq!(store.state().prop, "New value");
    assert!(!default_tracker.was_called());
    assert!(local_tracker.was_called());
}

#[tokio::test]
async fn test_store_view_uses_overridden_default_tracker() {
    let default_tracker = Arc::new(FakeTracker::default());
    let override_tracker = Arc::new(FakeTracker::default());
    let store = store_with_default(&default_tracker);

    let overridden = store.with_default_tracker(override_tracker.clone());
    overridden.dispatch(update_prop("New value")).await.unwrap();

    assert_eq!(store.state().prop, "New value");
    assert!(!default_tracker.was_called());
    assert!(override_tracker.was_called());

    // The parent keeps its own default
    store.dispatch(update_prop("Other value")).await.unwrap();
    assert!(default_tracker.was_called());
    assert_eq!(*override_tracker.calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_root_tracker_accessor_returns_default() {
    let default_tracker = Arc::new(FakeTracker::default());
    let store = store_with_default(&default_tracker);

    let tracker = store.tracker().unwrap();
    let expected: Arc<dyn WorkTracker> = default_tracker;
    assert!(Arc::ptr_eq(&tracker, &expected));
}

#[tokio::test]
async fn test_activity_tracker_waits_for_pending_work() {
    let tracker = ActivityTracker::new();
    let store = Store::new(test_state("abc")).with_default_tracker(Arc::new(tracker.clone()));
    let (gate, action) = gated_append("def");

    let pending = store.dispatch(action);
    assert_eq!(tracker.pending(), 1);
    assert!(!tracker.is_complete());

    gate.resolve();
    tracker.wait_idle().await;
    assert!(tracker.is_complete());
    assert_eq!(store.state().prop, "abcdef");
    pending.await.unwrap();
}

#[tokio::test]
async fn test_completion_visible_through_tracker_accessor() {
    let activity = ActivityTracker::new();
    let options = StoreOptions::new().default_tracker(Arc::new(activity.clone()));
    let store = Store::with_options(test_state("abc"), options).unwrap();
    let tracker = store.tracker().unwrap();
    assert!(tracker.is_complete());

    let (gate, action) = gated_append("def");
    let pending = store.dispatch(action);
    assert!(!tracker.is_complete());
    assert!(!store.with_default_tracker(tracker.clone()).tracker().unwrap().is_complete());

    gate.resolve();
    pending.await.unwrap();
    activity.wait_idle().await;
    assert!(tracker.is_complete());
}

#[tokio::test]
async fn test_tracking_does_not_change_failure() {
    let tracker = ActivityTracker::new();
    let store = Store::new(test_state("abc"));
    let (gate, action) = gated_append("def");

    let pending = store.dispatch_with_tracker(action, Arc::new(tracker.clone()));
    gate.reject();

    let err = pending.await.unwrap_err();
    assert_eq!(err.to_string(), "Action rejected");
    tracker.wait_idle().await;
    assert_eq!(store.state().prop, "abc");
}
