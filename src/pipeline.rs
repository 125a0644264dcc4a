use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;

use crate::config::RunConfig;
use crate::monitor;
use crate::primality::is_prime;
use crate::queue::{Interval, IntervalQueue};
use crate::stats::{Stats, StatsSnapshot};

/// Run the whole pipeline to completion and return the final statistics.
///
/// The shutdown order is the load-bearing part: producers are joined before
/// the queue shutdown is signaled (so no pushed work is ever lost), and the
/// shutdown is signaled before consumers are joined (so no consumer can block
/// forever on an empty queue). The monitor is stopped last, cooperatively,
/// after all workers are gone.
///
/// `prime_tx`, when present, receives every prime found; dropping the last
/// sender ends the downstream writer. The config must already be validated.
pub fn run(config: &RunConfig, prime_tx: Option<Sender<u64>>) -> StatsSnapshot {
    let queue = Arc::new(IntervalQueue::new(config.buffer_capacity));
    let stats = Arc::new(Stats::new());
    let monitor_stop = Arc::new(AtomicBool::new(false));

    let mut producers = Vec::with_capacity(config.num_producers);
    for producer_id in 0..config.num_producers {
        let queue = Arc::clone(&queue);
        let config = config.clone();
        producers.push(thread::spawn(move || {
            producer_loop(&config, producer_id, &queue);
        }));
    }

    let mut consumers = Vec::with_capacity(config.num_consumers);
    for _ in 0..config.num_consumers {
        let queue = Arc::clone(&queue);
        let stats = Arc::clone(&stats);
        let tx = prime_tx.clone();
        consumers.push(thread::spawn(move || {
            consumer_loop(&queue, &stats, tx.as_ref());
        }));
    }

    // Drop the original sender so the writer exits once consumers finish.
    drop(prime_tx);

    let monitor_handle = {
        let queue = Arc::clone(&queue);
        let stats = Arc::clone(&stats);
        let stop = Arc::clone(&monitor_stop);
        let total_intervals = config.total_intervals();
        let interval = config.monitor_interval;
        thread::spawn(move || {
            monitor::monitor_loop(queue, stats, total_intervals, interval, stop);
        })
    };

    // All work is produced before the queue starts refusing pushes.
    for handle in producers {
        handle.join().unwrap();
    }
    queue.shutdown();

    // Consumers drain the remainder and exit once the queue reports closed.
    for handle in consumers {
        handle.join().unwrap();
    }

    monitor_stop.store(true, Ordering::Relaxed);
    monitor_handle.join().unwrap();

    stats.snapshot()
}

/// Push this producer's round-robin share of the intervals, smallest first.
///
/// A rejected push means shutdown was signaled; that is a normal exit, not an
/// error, so the loop just stops.
fn producer_loop(config: &RunConfig, producer_id: usize, queue: &IntervalQueue) {
    let total = config.total_intervals();
    let stride = config.num_producers as u64;
    let mut index = producer_id as u64;
    while index < total {
        let (start, end) = config.interval_bounds(index);
        if queue.push(Interval::new(start, end, index)).is_err() {
            return;
        }
        if !config.producer_delay.is_zero() {
            thread::sleep(config.producer_delay);
        }
        index += stride;
    }
}

/// Pop intervals until the queue closes, testing every number in each one.
fn consumer_loop(queue: &IntervalQueue, stats: &Stats, prime_tx: Option<&Sender<u64>>) {
    while let Some(interval) = queue.pop() {
        for n in interval.start..=interval.end {
            if is_prime(n) {
                stats.record_prime(n);
                if let Some(tx) = prime_tx {
                    // The writer hanging up is not this thread's problem.
                    let _ = tx.send(n);
                }
            }
            stats.record_number_checked();
        }
        stats.record_interval_processed();
    }
}
