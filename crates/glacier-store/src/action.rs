//! Actions: named, one-shot asynchronous state transitions.

use crate::middleware::BoxFuture;
use std::borrow::Cow;
use std::fmt;
use std::future::Future;

/// Result of running an action.
///
/// An action either produces only the next state, or the next state paired
/// with a value handed back to the dispatch caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, R> {
    /// Next state, no return value
    State(T),
    /// Next state plus a value for the caller
    StateWith(T, R),
}

impl<T, R> Outcome<T, R> {
    /// Split into the next state and the optional return value
    pub fn into_parts(self) -> (T, Option<R>) {
        match self {
            Outcome::State(state) => (state, None),
            Outcome::StateWith(state, value) => (state, Some(value)),
        }
    }
}

type Transition<T, R> =
    Box<dyn FnOnce(T) -> BoxFuture<'static, anyhow::Result<Outcome<T, R>>> + Send>;

/// A caller-supplied asynchronous state transition.
///
/// The store runs it exactly once, against the state current at the time
/// the action reaches the front of the queue.
///
/// # Example
///
/// ```rust,ignore
/// let append = Action::update("append", |s: String| async move { Ok(s + "def") });
/// let counted = Action::new("count", |n: u32| async move {
///     Ok(Outcome::StateWith(n + 1, n))
/// });
/// ```
pub struct Action<T, R = ()> {
    name: Cow<'static, str>,
    transition: Transition<T, R>,
}

impl<T, R> Action<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    /// Create an action whose function decides between a bare state and a
    /// state with a return value
    pub fn new<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<Outcome<T, R>>> + Send + 'static,
    {
        Self {
            name: name.into(),
            transition: Box::new(move |state| Box::pin(f(state))),
        }
    }

    /// Action name, as reported to middleware
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_parts(self) -> (Cow<'static, str>, Transition<T, R>) {
        (self.name, self.transition)
    }
}

impl<T> Action<T, ()>
where
    T: Send + 'static,
{
    /// Create an action that only produces the next state
    pub fn update<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self::new(name, move |state| {
            let next = f(state);
            async move { next.await.map(Outcome::State) }
        })
    }
}

impl<T, R> fmt::Debug for Action<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

/// What middleware hooks get to see of the action being applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInfo {
    /// Dispatch sequence number, increasing in dispatch order
    pub id: u64,
    /// Action name
    pub name: Cow<'static, str>,
}

impl fmt::Display for ActionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}
