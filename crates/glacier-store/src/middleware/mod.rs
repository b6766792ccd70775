//! Middleware system for the store
//!
//! Middleware wraps every action the store applies, allowing logging,
//! validation, state decoration and error reporting to be handled in a
//! composable way.
//!
//! ## Design
//!
//! ```text
//! before_action (left → right) → Action → after_action (right → left)
//!                       └── any failure ──► on_error (left → right)
//! ```
//!
//! Each hook is optional. `before_action` and `after_action` can:
//! - Inspect the state and the action being applied
//! - Replace the state seen by the rest of the chain
//! - Abort the transition by failing
//!
//! `on_error` is notified of failures but can neither swallow nor replace the
//! error.
//!
//! ## Example
//!
//! ```rust,ignore
//! struct Uppercase;
//!
//! impl Middleware<String> for Uppercase {
//!     fn after_action<'a>(&'a self, state: &'a String, _action: &'a ActionInfo) -> HookResult<'a, String> {
//!         HookResult::Replace(state.to_uppercase())
//!     }
//! }
//! ```

use crate::action::{Action, ActionInfo};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

mod logging;

pub use logging::LoggingMiddleware;

/// BoxFuture type alias for async middleware hooks
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a `before_action` / `after_action` hook produced
///
/// `Unchanged` and `Pending` resolving to `None` both keep the current state;
/// they are separate variants so a hook can decide asynchronously.
pub enum HookResult<'a, T> {
    /// Hook returned nothing
    Unchanged,
    /// Hook returned a replacement state
    Replace(T),
    /// Hook failed synchronously
    Fail(anyhow::Error),
    /// Hook completes later; `None` keeps the current state
    Pending(BoxFuture<'a, anyhow::Result<Option<T>>>),
}

impl<'a, T> HookResult<'a, T> {
    /// Wrap an async hook body
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<Option<T>>> + Send + 'a,
    {
        HookResult::Pending(Box::pin(future))
    }

    /// Resolve to the replacement state, if any
    pub async fn resolve(self) -> anyhow::Result<Option<T>> {
        match self {
            HookResult::Unchanged => Ok(None),
            HookResult::Replace(state) => Ok(Some(state)),
            HookResult::Fail(error) => Err(error),
            HookResult::Pending(future) => future.await,
        }
    }
}

/// Middleware trait - intercepts every action applied by the store
///
/// All hooks default to no-ops, so implementors only override what they need.
/// Middleware is shared between concurrent dispatches; use interior mutability
/// for any bookkeeping.
///
/// # Example
///
/// ```rust,ignore
/// struct AuditMiddleware {
///     audit: Mutex<Vec<String>>,
/// }
///
/// impl Middleware<AppState> for AuditMiddleware {
///     fn on_error<'a>(
///         &'a self,
///         _original_state: &'a AppState,
///         _partial_state: &'a AppState,
///         action: &'a ActionInfo,
///         error: &'a anyhow::Error,
///     ) -> BoxFuture<'a, anyhow::Result<()>> {
///         Box::pin(async move {
///             self.audit.lock().unwrap().push(format!("{action}: {error}"));
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Middleware<T>: Send + Sync {
    /// Called before the action, in registration order
    fn before_action<'a>(&'a self, _state: &'a T, _action: &'a ActionInfo) -> HookResult<'a, T> {
        HookResult::Unchanged
    }

    /// Called after the action succeeded, in reverse registration order
    fn after_action<'a>(&'a self, _state: &'a T, _action: &'a ActionInfo) -> HookResult<'a, T> {
        HookResult::Unchanged
    }

    /// Called when the action or a hook failed, in registration order
    ///
    /// - `original_state`: state before the transition started
    /// - `partial_state`: state as far as the chain got before failing
    fn on_error<'a>(
        &'a self,
        _original_state: &'a T,
        _partial_state: &'a T,
        _action: &'a ActionInfo,
        _error: &'a anyhow::Error,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

/// Run one action through the middleware chain
///
/// Returns the next state and the action's return value. On failure every
/// `on_error` hook is notified and the original error is returned; the caller
/// must keep the pre-transition state.
pub async fn apply_middleware<T, R>(
    state: T,
    action: Action<T, R>,
    id: u64,
    middleware: &[Arc<dyn Middleware<T>>],
) -> anyhow::Result<(T, Option<R>)>
where
    T: Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    let (name, transition) = action.into_parts();
    let info = ActionInfo { id, name };
    let original = state.clone();
    let mut current = state;

    let result = async {
        for m in middleware {
            let replacement = m.before_action(&current, &info).resolve().await?;
            if let Some(next) = replacement {
                current = next;
            }
        }

        let (next, value) = transition(current.clone()).await?.into_parts();
        current = next;

        for m in middleware.iter().rev() {
            let replacement = m.after_action(&current, &info).resolve().await?;
            if let Some(next) = replacement {
                current = next;
            }
        }

        Ok::<_, anyhow::Error>(value)
    }
    .await;

    match result {
        Ok(value) => Ok((current, value)),
        Err(error) => {
            for m in middleware {
                if let Err(hook_error) = m.on_error(&original, &current, &info, &error).await {
                    log::warn!("on_error hook failed for {}: {:#}", info, hook_error);
                }
            }
            Err(error)
        }
    }
}
