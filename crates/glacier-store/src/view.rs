//! Tracker-override view
//!
//! A [`StoreView`] forwards everything to its parent (a store or another
//! view) and only swaps the default tracker. Views hold the parent by value;
//! since store handles are shared, the view sees the same state and queue.

use crate::action::Action;
use crate::error::StoreError;
use crate::store::{Dispatch, StoreHandle};
use crate::subject::{Observer, Unsubscribable};
use crate::tracker::WorkTracker;
use std::sync::Arc;

/// Store handle with its own default tracker
///
/// Dispatching without a tracker forwards this view's tracker to the parent
/// as if it had been passed explicitly, so layering views resolves to the
/// most recently applied override.
#[derive(Clone)]
pub struct StoreView<S> {
    parent: S,
    tracker: Arc<dyn WorkTracker>,
}

impl<S: StoreHandle> StoreView<S> {
    pub fn new(parent: S, tracker: Arc<dyn WorkTracker>) -> Self {
        Self { parent, tracker }
    }

    /// The handle this view forwards to
    pub fn parent(&self) -> &S {
        &self.parent
    }
}

impl<S: StoreHandle> StoreHandle for StoreView<S> {
    type State = S::State;

    fn state(&self) -> S::State {
        self.parent.state()
    }

    fn tracker(&self) -> Option<Arc<dyn WorkTracker>> {
        Some(Arc::clone(&self.tracker))
    }

    fn dispatch<R: Send + 'static>(&self, action: Action<S::State, R>) -> Dispatch<R> {
        self.parent.dispatch_with_tracker(action, Arc::clone(&self.tracker))
    }

    fn dispatch_with_tracker<R: Send + 'static>(
        &self,
        action: Action<S::State, R>,
        tracker: Arc<dyn WorkTracker>,
    ) -> Dispatch<R> {
        self.parent.dispatch_with_tracker(action, tracker)
    }

    fn subscribe(
        &self,
        observer: Observer<S::State>,
    ) -> Result<Box<dyn Unsubscribable>, StoreError> {
        self.parent.subscribe(observer)
    }
}
