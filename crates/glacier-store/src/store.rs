//! Store - holds the current state and applies actions one at a time
//!
//! ```text
//! dispatch → SerialQueue → apply_middleware(current state) → commit → notify
//! ```
//!
//! The state is read at the moment an action reaches the front of the queue,
//! not when it is dispatched, and it is committed before the dispatch caller
//! is resumed. A failed action leaves the state untouched.

use crate::action::Action;
use crate::error::StoreError;
use crate::middleware::{apply_middleware, Middleware};
use crate::options::StoreOptions;
use crate::queue::{Queued, SerialQueue};
use crate::subject::{BehaviorSubjectLike, Observer, Unsubscribable};
use crate::tracker::{Completion, WorkTracker};
use crate::view::StoreView;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};
use std::task::{Context, Poll};

/// Operations shared by [`Store`] and its tracker-override views
pub trait StoreHandle: Clone + Send + Sync + 'static {
    type State: Clone + Send + Sync + 'static;

    /// Snapshot of the most recently committed state
    fn state(&self) -> Self::State;

    /// Tracker used by `dispatch` when none is given
    fn tracker(&self) -> Option<Arc<dyn WorkTracker>>;

    /// Queue an action, tracked by the default tracker
    fn dispatch<R: Send + 'static>(&self, action: Action<Self::State, R>) -> Dispatch<R>;

    /// Queue an action, tracked by `tracker` instead of the default
    fn dispatch_with_tracker<R: Send + 'static>(
        &self,
        action: Action<Self::State, R>,
        tracker: Arc<dyn WorkTracker>,
    ) -> Dispatch<R>;

    /// Observe committed states
    ///
    /// Fails with [`StoreError::ObservablesDisabled`] unless the store was
    /// built with `use_observables`. Callbacks for later states run on the
    /// queue task right after commit; a panicking callback is logged and does
    /// not fail the dispatch.
    fn subscribe(
        &self,
        observer: Observer<Self::State>,
    ) -> Result<Box<dyn Unsubscribable>, StoreError>;

    /// View sharing this store's state and queue, with a different default
    /// tracker
    fn with_default_tracker(&self, tracker: Arc<dyn WorkTracker>) -> StoreView<Self> {
        StoreView::new(self.clone(), tracker)
    }
}

struct StoreInner<T> {
    state: RwLock<T>,
    queue: SerialQueue,
    middleware: Vec<Arc<dyn Middleware<T>>>,
    default_tracker: Option<Arc<dyn WorkTracker>>,
    subject: Option<Arc<dyn BehaviorSubjectLike<T>>>,
}

impl<T: Clone> StoreInner<T> {
    fn current(&self) -> T {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the state, then notify subscribers
    ///
    /// A panic raised while notifying is logged, not passed on: the state is
    /// already committed and the dispatch still succeeds.
    fn commit(&self, next: T) {
        match &self.subject {
            Some(subject) => {
                self.replace(next.clone());
                if panic::catch_unwind(AssertUnwindSafe(|| subject.next(next))).is_err() {
                    log::error!("Notifying subscribers panicked after commit");
                }
            }
            None => self.replace(next),
        }
    }

    fn replace(&self, next: T) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

/// Single-writer async state container
///
/// Cloning is cheap and yields another handle to the same store.
///
/// # Example
///
/// ```rust,ignore
/// let store = Store::new(String::from("abc"));
/// store
///     .dispatch(Action::update("append", |s: String| async move { Ok(s + "def") }))
///     .await?;
/// assert_eq!(store.state(), "abcdef");
/// ```
pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Store without middleware, tracker or notifications
    pub fn new(initial_state: T) -> Self {
        Self::from_parts(initial_state, Vec::new(), None, None)
    }

    /// Store configured by `options`
    ///
    /// Fails if notifications are requested without a subject factory.
    pub fn with_options(initial_state: T, options: StoreOptions<T>) -> Result<Self, StoreError> {
        let subject = if options.use_observables {
            let factory = options
                .behavior_subject
                .ok_or(StoreError::MissingSubjectFactory)?;
            Some(factory(initial_state.clone()))
        } else {
            None
        };

        Ok(Self::from_parts(
            initial_state,
            options.middleware,
            options.default_tracker,
            subject,
        ))
    }

    fn from_parts(
        initial_state: T,
        middleware: Vec<Arc<dyn Middleware<T>>>,
        default_tracker: Option<Arc<dyn WorkTracker>>,
        subject: Option<Arc<dyn BehaviorSubjectLike<T>>>,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial_state),
                queue: SerialQueue::new(),
                middleware,
                default_tracker,
                subject,
            }),
        }
    }

    /// Borrow the current state without cloning it
    ///
    /// Keep the closure short: commits wait for it to return.
    pub fn read<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        let state = self.inner.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&*state)
    }

    fn enqueue<R: Send + 'static>(
        &self,
        action: Action<T, R>,
        tracker: Option<Arc<dyn WorkTracker>>,
    ) -> Dispatch<R> {
        let (guard, completion) = Completion::pair();
        let inner = Arc::clone(&self.inner);

        let queued = self.inner.queue.enqueue(move |id| async move {
            let _settled = guard;
            let current = inner.current();
            let (next, value) = apply_middleware(current, action, id, &inner.middleware).await?;
            inner.commit(next);
            Ok::<_, anyhow::Error>(value)
        });

        if let Some(tracker) = tracker {
            tracker.track(completion);
        }

        Dispatch { queued }
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> StoreHandle for Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    type State = T;

    fn state(&self) -> T {
        self.inner.current()
    }

    fn tracker(&self) -> Option<Arc<dyn WorkTracker>> {
        self.inner.default_tracker.clone()
    }

    fn dispatch<R: Send + 'static>(&self, action: Action<T, R>) -> Dispatch<R> {
        self.enqueue(action, self.inner.default_tracker.clone())
    }

    fn dispatch_with_tracker<R: Send + 'static>(
        &self,
        action: Action<T, R>,
        tracker: Arc<dyn WorkTracker>,
    ) -> Dispatch<R> {
        self.enqueue(action, Some(tracker))
    }

    fn subscribe(&self, observer: Observer<T>) -> Result<Box<dyn Unsubscribable>, StoreError> {
        let subject = self
            .inner
            .subject
            .as_ref()
            .ok_or(StoreError::ObservablesDisabled)?;
        Ok(subject.as_observable().subscribe(observer))
    }
}

/// Future returned by `dispatch`
///
/// The action is already queued when this is created; awaiting it only waits
/// for the outcome. Resolves to the action's return value (`None` when the
/// action produced a bare state) or to the error raised by the action or a
/// middleware hook.
pub struct Dispatch<R> {
    queued: Queued<anyhow::Result<Option<R>>>,
}

impl<R> Dispatch<R> {
    /// Dispatch id, increasing in dispatch order
    pub fn id(&self) -> u64 {
        self.queued.id()
    }
}

impl<R> Future for Dispatch<R> {
    type Output = anyhow::Result<Option<R>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.queued)
            .poll(cx)
            .map(|settled| settled.unwrap_or_else(|e| Err(e.into())))
    }
}
