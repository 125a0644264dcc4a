use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// One unit of work: an inclusive sub-range of the numbers to test.
///
/// Built by a producer, handed through the queue by value, consumed by
/// exactly one consumer. `id` is the global interval index, so it is unique
/// across the whole run and ascending within each producer's output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
    pub id: u64,
}

impl Interval {
    pub fn new(start: u64, end: u64, id: u64) -> Self {
        debug_assert!(start <= end);
        Interval { start, end, id }
    }
}

struct Inner {
    items: VecDeque<Interval>,
    shutdown: bool,
}

/// Fixed-capacity blocking FIFO shared by producers and consumers.
///
/// The shutdown flag lives inside the same mutex as the deque, so a waiter
/// can never observe the flag and the queue contents out of step with each
/// other. Once set it is never cleared: pushes fail fast, pops keep draining
/// buffered items and report closed only when the queue is also empty.
pub struct IntervalQueue {
    inner: Mutex<Inner>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl IntervalQueue {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be at least 1");
        IntervalQueue {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                shutdown: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Add an interval, blocking while the queue is full.
    ///
    /// Returns the interval back as `Err` once shutdown has been signaled;
    /// the caller should stop producing.
    pub fn push(&self, item: Interval) -> Result<(), Interval> {
        let mut inner = self.inner.lock().unwrap();
        while inner.items.len() >= self.capacity && !inner.shutdown {
            inner = self.not_full.wait(inner).unwrap();
        }
        if inner.shutdown {
            return Err(item);
        }
        inner.items.push_back(item);
        drop(inner);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the oldest interval, blocking while the queue is empty.
    ///
    /// After shutdown, keeps returning buffered intervals in FIFO order and
    /// yields `None` only once the queue has drained.
    pub fn pop(&self) -> Option<Interval> {
        let mut inner = self.inner.lock().unwrap();
        while inner.items.is_empty() && !inner.shutdown {
            inner = self.not_empty.wait(inner).unwrap();
        }
        match inner.items.pop_front() {
            Some(item) => {
                drop(inner);
                self.not_full.notify_one();
                Some(item)
            }
            None => None, // shut down and drained
        }
    }

    /// Signal shutdown and wake every blocked thread. Idempotent.
    pub fn shutdown(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.shutdown = true;
        }
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Best-effort occupancy snapshot for the monitor. Stale by the time the
    /// caller looks at it; never used for correctness decisions.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
