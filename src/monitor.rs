use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use chrono::Local;

use crate::queue::IntervalQueue;
use crate::stats::{Stats, StatsSnapshot};

const BAR_WIDTH: usize = 10;
const RECENT_PRIMES_SHOWN: usize = 4;

/// Periodic progress reporter. Reads the aggregator and the queue, never
/// mutates either. Runs until `stop` is set; the interval sleep is taken in
/// short slices so the orchestrator's join never waits out a full interval.
pub fn monitor_loop(
    queue: Arc<IntervalQueue>,
    stats: Arc<Stats>,
    total_intervals: u64,
    interval: Duration,
    stop: Arc<AtomicBool>,
) {
    while !stop.load(Ordering::Relaxed) {
        let snapshot = stats.snapshot();
        let block = render_progress(&snapshot, queue.len(), queue.capacity(), total_intervals);

        // Clear the terminal and redraw the block in place.
        print!("\x1b[2J\x1b[H");
        println!("[{}] Processing statistics:", Local::now().format("%H:%M:%S"));
        println!("{}", block);

        let mut remaining = interval;
        while !remaining.is_zero() && !stop.load(Ordering::Relaxed) {
            let slice = remaining.min(Duration::from_millis(100));
            thread::sleep(slice);
            remaining -= slice;
        }
    }
}

/// Render the progress block from a snapshot. Pure so it can be tested
/// without threads or a terminal.
pub fn render_progress(
    snapshot: &StatsSnapshot,
    queue_len: usize,
    queue_capacity: usize,
    total_intervals: u64,
) -> String {
    let elapsed = snapshot.elapsed.as_secs_f64();
    let rate = if elapsed > 0.0 {
        snapshot.numbers_checked as f64 / elapsed
    } else {
        0.0
    };
    let avg_ms = if snapshot.numbers_checked > 0 {
        elapsed * 1000.0 / snapshot.numbers_checked as f64
    } else {
        0.0
    };
    let completion = if total_intervals > 0 {
        100.0 * snapshot.intervals_processed as f64 / total_intervals as f64
    } else {
        100.0
    };
    let occupancy = 100.0 * queue_len as f64 / queue_capacity as f64;

    let mut block = String::new();
    block.push_str(&format!(
        "Buffer: {} {}/{} ({:.1}%)\n",
        buffer_bar(queue_len, queue_capacity),
        queue_len,
        queue_capacity,
        occupancy
    ));
    block.push_str(&format!(
        "Processed: {} intervals ({:.1}%)\n",
        snapshot.intervals_processed, completion
    ));
    block.push_str(&format!("Primes found: {}\n", snapshot.primes_found));
    block.push_str(&format!("Rate: {:.0} numbers/second\n", rate));
    block.push_str(&format!("Average: {:.1}ms per number", avg_ms));

    if !snapshot.recent_primes.is_empty() {
        // Bounded history, newest first.
        let shown: Vec<String> = snapshot
            .recent_primes
            .iter()
            .take(RECENT_PRIMES_SHOWN)
            .map(|p| p.to_string())
            .collect();
        block.push_str(&format!("\nRecent primes: {}", shown.join(" | ")));
    }

    block
}

fn buffer_bar(len: usize, capacity: usize) -> String {
    let filled = (len * BAR_WIDTH) / capacity;
    let mut bar = String::with_capacity(BAR_WIDTH + 2);
    bar.push('[');
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { ' ' });
    }
    bar.push(']');
    bar
}
