//! Single-writer async state container
//!
//! A [`Store`] holds a current state that only changes through
//! [`Action`]s: asynchronous functions from the current state to the next.
//! Actions are applied strictly one at a time in dispatch order, whatever
//! order their internal awaits resolve in, and a failing action never
//! disturbs the actions queued behind it.
//!
//! Cross-cutting concerns plug in as [`Middleware`] with optional
//! before/after/error hooks. Dispatched work can be observed by a
//! [`WorkTracker`], and committed states can be published to subscribers
//! through a [`BehaviorSubjectLike`] subject.
//!
//! # Example
//!
//! ```rust,ignore
//! use glacier_store::{Action, Store, StoreHandle};
//!
//! let store = Store::new(String::from("abc"));
//! let first = store.dispatch(Action::update("def", |s: String| async move { Ok(s + "def") }));
//! let second = store.dispatch(Action::update("ghi", |s: String| async move { Ok(s + "ghi") }));
//! first.await?;
//! second.await?;
//! assert_eq!(store.state(), "abcdefghi");
//! ```

pub mod action;
pub mod error;
pub mod middleware;
pub mod options;
pub mod queue;
pub mod store;
pub mod subject;
pub mod tracker;
pub mod view;

pub use action::{Action, ActionInfo, Outcome};
pub use error::StoreError;
pub use middleware::{apply_middleware, BoxFuture, HookResult, LoggingMiddleware, Middleware};
pub use options::StoreOptions;
pub use queue::{Queued, SerialQueue};
pub use store::{Dispatch, Store, StoreHandle};
pub use subject::{
    BehaviorSubject, BehaviorSubjectLike, Observer, SubjectFactory, Subscribable, Unsubscribable,
};
pub use tracker::{ActivityTracker, Completion, CompletionGuard, WorkTracker};
pub use view::StoreView;
