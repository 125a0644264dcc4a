use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// How many of the most recent primes are kept for display.
pub const RECENT_PRIMES_CAP: usize = 10;

/// Shared progress counters, written by every consumer and read by the
/// monitor and the final report.
///
/// Counters are relaxed atomics: each is monotonic on its own, but a reader
/// taking a snapshot may see the fields at slightly different instants. That
/// is fine for a progress display and saves cross-field synchronization.
pub struct Stats {
    intervals_processed: AtomicU64,
    primes_found: AtomicU64,
    numbers_checked: AtomicU64,
    started: Instant,
    recent_primes: Mutex<VecDeque<u64>>,
}

/// Point-in-time copy of the aggregator for rendering.
#[derive(Clone, Debug)]
pub struct StatsSnapshot {
    pub intervals_processed: u64,
    pub primes_found: u64,
    pub numbers_checked: u64,
    pub elapsed: Duration,
    /// Newest first.
    pub recent_primes: Vec<u64>,
}

impl Stats {
    pub fn new() -> Self {
        Stats {
            intervals_processed: AtomicU64::new(0),
            primes_found: AtomicU64::new(0),
            numbers_checked: AtomicU64::new(0),
            started: Instant::now(),
            recent_primes: Mutex::new(VecDeque::with_capacity(RECENT_PRIMES_CAP)),
        }
    }

    /// Record one prime: bump the counter and append to the bounded history,
    /// evicting the oldest entry once the cap is reached.
    pub fn record_prime(&self, prime: u64) {
        self.primes_found.fetch_add(1, Ordering::Relaxed);
        let mut recent = self.recent_primes.lock().unwrap();
        if recent.len() == RECENT_PRIMES_CAP {
            recent.pop_front();
        }
        recent.push_back(prime);
    }

    pub fn record_number_checked(&self) {
        self.numbers_checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_interval_processed(&self) {
        self.intervals_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let recent = self.recent_primes.lock().unwrap();
        StatsSnapshot {
            intervals_processed: self.intervals_processed.load(Ordering::Relaxed),
            primes_found: self.primes_found.load(Ordering::Relaxed),
            numbers_checked: self.numbers_checked.load(Ordering::Relaxed),
            elapsed: self.started.elapsed(),
            recent_primes: recent.iter().rev().copied().collect(),
        }
    }
}
