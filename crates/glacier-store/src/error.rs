//! Store configuration and runtime errors.

use thiserror::Error;

/// Errors raised by the store itself.
///
/// Failures of actions and middleware hooks are never wrapped in this type;
/// they reach the dispatch caller as the original `anyhow::Error`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Notifications were requested without a subject factory.
    #[error("use_observables is set but no behavior subject factory was provided")]
    MissingSubjectFactory,

    /// `subscribe` was called on a store built without notifications.
    #[error("store was created without use_observables, subscriptions are unavailable")]
    ObservablesDisabled,

    /// The runtime dropped a queued operation before it settled.
    #[error("queued operation #{0} was aborted before it settled")]
    Aborted(u64),
}
