//! LoggingMiddleware - logs every action the store applies

use super::{BoxFuture, HookResult, Middleware};
use crate::action::ActionInfo;

/// LoggingMiddleware - logs all actions passing through the chain
///
/// Successful actions are logged at debug/trace level, failures at error
/// level. Register it first so it sees the state before other middleware
/// touches it.
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Middleware<T> for LoggingMiddleware {
    fn before_action<'a>(&'a self, _state: &'a T, action: &'a ActionInfo) -> HookResult<'a, T> {
        log::debug!("Action: {}", action);
        HookResult::Unchanged
    }

    fn after_action<'a>(&'a self, _state: &'a T, action: &'a ActionInfo) -> HookResult<'a, T> {
        log::trace!("Action applied: {}", action);
        HookResult::Unchanged
    }

    fn on_error<'a>(
        &'a self,
        _original_state: &'a T,
        _partial_state: &'a T,
        action: &'a ActionInfo,
        error: &'a anyhow::Error,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        log::error!("Action {} failed: {:#}", action, error);
        Box::pin(async { Ok(()) })
    }
}
