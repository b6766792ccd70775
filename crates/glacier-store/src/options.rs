//! Store construction options

use crate::middleware::{LoggingMiddleware, Middleware};
use crate::subject::{BehaviorSubject, SubjectFactory};
use crate::tracker::WorkTracker;
use glacier_config::StoreSettings;
use std::sync::Arc;

/// Options recognized by `Store::with_options`
///
/// # Example
///
/// ```rust,ignore
/// let options = StoreOptions::new()
///     .middleware(LoggingMiddleware)
///     .default_tracker(Arc::new(ActivityTracker::new()))
///     .use_observables(true)
///     .behavior_subject(BehaviorSubject::factory());
/// let store = Store::with_options(AppState::default(), options)?;
/// ```
pub struct StoreOptions<T> {
    pub(crate) middleware: Vec<Arc<dyn Middleware<T>>>,
    pub(crate) default_tracker: Option<Arc<dyn WorkTracker>>,
    pub(crate) use_observables: bool,
    pub(crate) behavior_subject: Option<SubjectFactory<T>>,
}

impl<T> StoreOptions<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// No middleware, no tracker, notifications off
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
            default_tracker: None,
            use_observables: false,
            behavior_subject: None,
        }
    }

    /// Options derived from file settings
    ///
    /// `log_actions` puts [`LoggingMiddleware`] at the front of the chain,
    /// `use_observables` enables notifications through [`BehaviorSubject`].
    pub fn from_settings(settings: &StoreSettings) -> Self {
        let mut options = Self::new().use_observables(settings.use_observables);
        if settings.log_actions {
            options = options.middleware(LoggingMiddleware::new());
        }
        if settings.use_observables {
            options = options.behavior_subject(BehaviorSubject::factory());
        }
        options
    }

    /// Append middleware to the chain
    ///
    /// `before_action` hooks run in the order middleware was added,
    /// `after_action` hooks in reverse order.
    pub fn middleware<M: Middleware<T> + 'static>(self, middleware: M) -> Self {
        self.shared_middleware(Arc::new(middleware))
    }

    /// Append middleware that is also held elsewhere
    pub fn shared_middleware(mut self, middleware: Arc<dyn Middleware<T>>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Tracker used by dispatches that don't name one
    pub fn default_tracker(mut self, tracker: Arc<dyn WorkTracker>) -> Self {
        self.default_tracker = Some(tracker);
        self
    }

    /// Publish every committed state to subscribers
    pub fn use_observables(mut self, enabled: bool) -> Self {
        self.use_observables = enabled;
        self
    }

    /// Subject implementation backing notifications
    pub fn behavior_subject(mut self, factory: SubjectFactory<T>) -> Self {
        self.behavior_subject = Some(factory);
        self
    }
}

impl<T> Default for StoreOptions<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
