//! Deferred "next tick" task queue.
//!
//! Work posted here runs when the host drains the queue after it has applied
//! its pending DOM updates. Components use it to read state that is only
//! settled once the current render pass has finished.
//!
//! Posted tasks cannot be withdrawn. A task that reads from something torn
//! down in the meantime has to notice that itself.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::logging::{span_names, targets, OperationSpan};

/// A boxed task closure.
type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

/// A FIFO queue of tasks deferred to the next render tick.
///
/// The queue is shared by reference (usually behind an `Arc`) between the
/// host, which flushes it, and the components, which post to it.
pub struct TickQueue {
    tasks: Mutex<VecDeque<BoxedTask>>,
}

impl TickQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(VecDeque::new()),
        }
    }

    /// Post a task to run on the next flush.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut tasks = self.tasks.lock();
        tasks.push_back(Box::new(task));
        tracing::trace!(target: targets::TICK, pending = tasks.len(), "task posted");
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.lock().is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Run every pending task, including tasks posted while flushing.
    ///
    /// The queue is unlocked while each task runs. Returns the number of
    /// tasks that ran.
    pub fn flush(&self) -> usize {
        let _span = OperationSpan::new(span_names::TICK);
        let mut count = 0;
        loop {
            let next = self.tasks.lock().pop_front();
            let Some(task) = next else {
                break;
            };
            task();
            count += 1;
        }
        if count > 0 {
            tracing::trace!(target: targets::TICK, count, "tick flushed");
        }
        count
    }
}

impl Default for TickQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TickQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickQueue")
            .field("pending", &self.pending_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(TickQueue: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_tasks_wait_for_flush() {
        let queue = TickQueue::new();
        let ran = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let ran = ran.clone();
            queue.post(move || ran.lock().push(i));
        }

        assert_eq!(queue.pending_count(), 3);
        assert!(ran.lock().is_empty());

        assert_eq!(queue.flush(), 3);
        assert_eq!(*ran.lock(), vec![0, 1, 2]);
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_tasks_posted_during_flush_run_in_same_flush() {
        let queue = Arc::new(TickQueue::new());
        let ran = Arc::new(Mutex::new(Vec::new()));

        let inner_queue = queue.clone();
        let ran_outer = ran.clone();
        queue.post(move || {
            ran_outer.lock().push("outer");
            let ran_inner = ran_outer.clone();
            inner_queue.post(move || ran_inner.lock().push("inner"));
        });

        assert_eq!(queue.flush(), 2);
        assert_eq!(*ran.lock(), vec!["outer", "inner"]);
    }
}
