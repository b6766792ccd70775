//! Work tracking
//!
//! A [`WorkTracker`] observes dispatched operations from the outside, e.g. to
//! show a busy indicator or to wait until all pending work has finished. It is
//! handed a [`Completion`] that settles with the operation, never the
//! operation's value or error, so it cannot change what the caller receives.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{oneshot, watch};

/// Observer of in-flight store operations
pub trait WorkTracker: Send + Sync {
    /// Start observing an operation that finishes when `work` resolves
    fn track(&self, work: Completion);

    /// True when nothing this tracker observes is still in flight
    fn is_complete(&self) -> bool;
}

/// Future that resolves once a tracked operation has settled
///
/// Settling covers success, failure and panic of the operation alike.
pub struct Completion {
    settled: oneshot::Receiver<()>,
}

impl Completion {
    /// Create a completion together with the guard that settles it on drop
    pub fn pair() -> (CompletionGuard, Completion) {
        let (tx, rx) = oneshot::channel();
        (CompletionGuard { _settle: tx }, Completion { settled: rx })
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        // The guard never sends; a closed channel is the settle signal
        Pin::new(&mut self.settled).poll(cx).map(|_| ())
    }
}

/// Settles the paired [`Completion`] when dropped
pub struct CompletionGuard {
    _settle: oneshot::Sender<()>,
}

/// Tracker counting in-flight operations
///
/// Cloning shares the same counter.
///
/// # Example
///
/// ```rust,ignore
/// let tracker = ActivityTracker::new();
/// let busy = store.with_default_tracker(Arc::new(tracker.clone()));
/// busy.dispatch(load_everything());
/// tracker.wait_idle().await;
/// ```
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    pending: Arc<watch::Sender<usize>>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            pending: Arc::new(tx),
        }
    }

    /// Number of tracked operations that have not settled yet
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Wait until every tracked operation has settled
    pub async fn wait_idle(&self) {
        let mut rx = self.pending.subscribe();
        // Sender is kept alive by self, so this cannot fail
        let _ = rx.wait_for(|pending| *pending == 0).await;
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkTracker for ActivityTracker {
    fn track(&self, work: Completion) {
        self.pending.send_modify(|pending| *pending += 1);
        let counter = Arc::clone(&self.pending);
        tokio::spawn(async move {
            work.await;
            counter.send_modify(|pending| *pending -= 1);
        });
    }

    fn is_complete(&self) -> bool {
        self.pending() == 0
    }
}
