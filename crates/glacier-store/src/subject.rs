//! Change notification
//!
//! The store publishes every committed state through a behavior subject: a
//! holder of the latest value that replays it to new subscribers and pushes
//! each later value to all of them. Any type implementing
//! [`BehaviorSubjectLike`] can be plugged in through a [`SubjectFactory`];
//! [`BehaviorSubject`] is the built-in implementation.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

type NextFn<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorFn = Box<dyn Fn(&anyhow::Error) + Send + Sync>;
type CompleteFn = Box<dyn Fn() + Send + Sync>;

/// Set of callbacks receiving notifications, each optional
pub struct Observer<T> {
    next: Option<NextFn<T>>,
    error: Option<ErrorFn>,
    complete: Option<CompleteFn>,
}

impl<T> Observer<T> {
    /// Observer reacting to new values only
    pub fn new(next: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self {
            next: Some(Box::new(next)),
            error: None,
            complete: None,
        }
    }

    /// Observer with no callbacks at all
    pub fn empty() -> Self {
        Self {
            next: None,
            error: None,
            complete: None,
        }
    }

    pub fn on_error(mut self, error: impl Fn(&anyhow::Error) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(error));
        self
    }

    pub fn on_complete(mut self, complete: impl Fn() + Send + Sync + 'static) -> Self {
        self.complete = Some(Box::new(complete));
        self
    }

    pub fn next(&self, value: &T) {
        if let Some(next) = &self.next {
            next(value);
        }
    }

    pub fn error(&self, error: &anyhow::Error) {
        if let Some(on_error) = &self.error {
            on_error(error);
        }
    }

    pub fn complete(&self) {
        if let Some(complete) = &self.complete {
            complete();
        }
    }
}

/// Handle returned by `subscribe`
pub trait Unsubscribable: Send + Sync {
    /// Stop receiving notifications; calling it again is a no-op
    fn unsubscribe(&self);
}

/// Source that observers can subscribe to
pub trait Subscribable<T>: Send + Sync {
    fn subscribe(&self, observer: Observer<T>) -> Box<dyn Unsubscribable>;
}

/// Latest-value holder that pushes every new value to its subscribers
pub trait BehaviorSubjectLike<T>: Send + Sync {
    /// Most recent value
    fn value(&self) -> T;

    /// Replace the value and notify subscribers
    fn next(&self, value: T);

    /// Read-only view for subscribing
    fn as_observable(&self) -> Arc<dyn Subscribable<T>>;
}

/// Builds the store's subject from its initial state
pub type SubjectFactory<T> = Arc<dyn Fn(T) -> Arc<dyn BehaviorSubjectLike<T>> + Send + Sync>;

struct Subscribers<T> {
    value: T,
    observers: Vec<(u64, Arc<Observer<T>>)>,
    next_id: u64,
}

/// In-process behavior subject
///
/// Callbacks run synchronously on the thread calling `next` (or `subscribe`,
/// for the replayed value), outside the subject's lock, so observers may read
/// the subject or unsubscribe from within a callback.
pub struct BehaviorSubject<T> {
    inner: Arc<Mutex<Subscribers<T>>>,
}

impl<T> BehaviorSubject<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Subscribers {
                value: initial,
                observers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Factory suitable for `StoreOptions::behavior_subject`
    pub fn factory() -> SubjectFactory<T> {
        Arc::new(|initial: T| {
            Arc::new(BehaviorSubject::new(initial)) as Arc<dyn BehaviorSubjectLike<T>>
        })
    }

    /// Number of active subscriptions
    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Subscribers<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Clone for BehaviorSubject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> BehaviorSubjectLike<T> for BehaviorSubject<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn value(&self) -> T {
        self.lock().value.clone()
    }

    fn next(&self, value: T) {
        let observers: Vec<Arc<Observer<T>>> = {
            let mut inner = self.lock();
            inner.value = value.clone();
            inner.observers.iter().map(|(_, o)| Arc::clone(o)).collect()
        };
        for observer in observers {
            // One panicking observer must not starve the rest
            if panic::catch_unwind(AssertUnwindSafe(|| observer.next(&value))).is_err() {
                log::error!("Subscriber panicked while handling a new value");
            }
        }
    }

    fn as_observable(&self) -> Arc<dyn Subscribable<T>> {
        Arc::new(self.clone())
    }
}

impl<T> Subscribable<T> for BehaviorSubject<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn subscribe(&self, observer: Observer<T>) -> Box<dyn Unsubscribable> {
        let observer = Arc::new(observer);
        let (id, current) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.push((id, Arc::clone(&observer)));
            (id, inner.value.clone())
        };
        observer.next(&current);

        Box::new(Subscription {
            id,
            subject: Arc::downgrade(&self.inner),
        })
    }
}

struct Subscription<T> {
    id: u64,
    subject: std::sync::Weak<Mutex<Subscribers<T>>>,
}

impl<T: Send> Unsubscribable for Subscription<T> {
    fn unsubscribe(&self) {
        if let Some(subject) = self.subject.upgrade() {
            let mut inner = subject.lock().unwrap_or_else(PoisonError::into_inner);
            inner.observers.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, Observer<String>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let observer = Observer::new(move |v: &String| sink.lock().unwrap().push(v.clone()));
        (seen, observer)
    }

    #[test]
    fn test_subscribe_replays_current_value() {
        let subject = BehaviorSubject::new("abc".to_string());
        let (seen, observer) = recorder();

        let _sub = subject.subscribe(observer);

        assert_eq!(*seen.lock().unwrap(), vec!["abc"]);
    }

    #[test]
    fn test_next_updates_value_and_notifies() {
        let subject = BehaviorSubject::new("abc".to_string());
        let (seen, observer) = recorder();
        let _sub = subject.as_observable().subscribe(observer);

        subject.next("abcdef".to_string());

        assert_eq!(subject.value(), "abcdef");
        assert_eq!(*seen.lock().unwrap(), vec!["abc", "abcdef"]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let subject = BehaviorSubject::new("abc".to_string());
        let (seen, observer) = recorder();
        let sub = subject.subscribe(observer);
        assert_eq!(subject.observer_count(), 1);

        sub.unsubscribe();
        sub.unsubscribe();
        subject.next("ignored".to_string());

        assert_eq!(subject.observer_count(), 0);
        assert_eq!(*seen.lock().unwrap(), vec!["abc"]);
    }

    #[test]
    fn test_observer_callbacks_are_optional() {
        let completed = Arc::new(Mutex::new(false));
        let flag = completed.clone();
        let observer: Observer<u32> =
            Observer::empty().on_complete(move || *flag.lock().unwrap() = true);

        observer.next(&1);
        observer.error(&anyhow::anyhow!("ignored"));
        observer.complete();

        assert!(*completed.lock().unwrap());
    }

    #[test]
    fn test_factory_builds_subject_with_initial_value() {
        let factory = BehaviorSubject::<u32>::factory();
        let subject = factory(3);
        assert_eq!(subject.value(), 3);
    }
}
