//! Serial queue
//!
//! Runs queued operations one at a time, strictly in enqueue order. The queue
//! keeps a single "tail": a signal that settles once everything enqueued so
//! far has settled. Each `enqueue` swaps in a new tail synchronously, so two
//! calls made back to back are chained in call order before either runs.
//!
//! ```text
//! enqueue(op1) ── tail1 ──► enqueue(op2) waits tail1 ── tail2 ──► ...
//! ```
//!
//! Operations are spawned onto the tokio runtime immediately, so dropping the
//! returned [`Queued`] handle does not cancel the operation or stall the queue.
//! A failing or panicking operation only affects its own handle.

use crate::error::StoreError;
use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Tail {
    /// Settles when the most recently enqueued operation settles
    settled: Option<oneshot::Receiver<()>>,
    next_id: u64,
}

/// FIFO, one-at-a-time executor for asynchronous operations
pub struct SerialQueue {
    tail: Mutex<Tail>,
}

impl SerialQueue {
    pub fn new() -> Self {
        Self {
            tail: Mutex::new(Tail {
                settled: None,
                next_id: 0,
            }),
        }
    }

    /// Enqueue an operation behind everything enqueued before it
    ///
    /// The operation receives its queue id, which increases in enqueue order.
    /// It starts only once the previous operation has settled, whatever the
    /// outcome of that operation was.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue<F, Fut>(&self, operation: F) -> Queued<Fut::Output>
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        let (settled_tx, settled_rx) = oneshot::channel::<()>();

        let (id, previous) = {
            let mut tail = self.tail.lock().unwrap_or_else(PoisonError::into_inner);
            let id = tail.next_id;
            tail.next_id += 1;
            (id, tail.settled.replace(settled_rx))
        };

        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                // Err only means the previous sender was dropped, which is
                // also how it reports having settled
                let _ = previous.await;
            }
            log::trace!("Queue: operation #{} started", id);
            let output = operation(id).await;
            log::trace!("Queue: operation #{} settled", id);
            drop(settled_tx);
            output
        });

        Queued { id, handle }
    }
}

impl Default for SerialQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to an enqueued operation
///
/// Resolves to the operation's output. A panic inside the operation is
/// resumed on the task awaiting this handle.
pub struct Queued<T> {
    id: u64,
    handle: JoinHandle<T>,
}

impl<T> Queued<T> {
    /// Queue id assigned at enqueue time
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<T> Future for Queued<T> {
    type Output = Result<T, StoreError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(output)) => Poll::Ready(Ok(output)),
            Poll::Ready(Err(e)) if e.is_panic() => panic::resume_unwind(e.into_panic()),
            Poll::Ready(Err(_)) => Poll::Ready(Err(StoreError::Aborted(id))),
        }
    }
}
