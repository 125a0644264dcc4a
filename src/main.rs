mod config;
mod monitor;
mod pipeline;
mod primality;
mod queue;
mod stats;
mod storage;

use clap::Parser;
use std::process;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use config::RunConfig;

#[derive(Parser)]
#[command(name = "primepipe")]
#[command(
    about = "Multi-threaded producer-consumer pipeline for primality testing",
    long_about = None
)]
struct Cli {
    #[arg(long, default_value = "0", help = "First number of the range (inclusive)")]
    start: u64,

    #[arg(
        long,
        default_value = "99999999",
        help = "Last number of the range (inclusive)"
    )]
    end: u64,

    #[arg(
        short,
        long,
        default_value = "1000",
        help = "Numbers per work interval"
    )]
    interval_size: u64,

    #[arg(
        short,
        long,
        default_value = "100",
        help = "Capacity of the interval buffer between producers and consumers"
    )]
    buffer_size: usize,

    #[arg(short, long, default_value = "16", help = "Number of producer threads")]
    producers: usize,

    #[arg(short, long, default_value = "8", help = "Number of consumer threads")]
    consumers: usize,

    #[arg(
        short,
        long,
        default_value = "5",
        help = "Seconds between progress reports"
    )]
    monitor_interval: u64,

    #[arg(
        long,
        default_value = "1",
        help = "Rate-limiting delay in milliseconds after each produced interval (0 disables)"
    )]
    producer_delay_ms: u64,

    #[arg(long, help = "Stream found primes to primes.txt in the data directory")]
    save_primes: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = RunConfig {
        range_start: cli.start,
        range_end: cli.end,
        interval_size: cli.interval_size,
        buffer_capacity: cli.buffer_size,
        num_producers: cli.producers,
        num_consumers: cli.consumers,
        monitor_interval: Duration::from_secs(cli.monitor_interval),
        producer_delay: Duration::from_millis(cli.producer_delay_ms),
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1);
    }

    println!("=== PRIME PIPELINE ===");
    println!(
        "Range: {} - {} | Intervals: {} | Producers: {} | Consumers: {}\n",
        config.range_start,
        config.range_end,
        config.total_intervals(),
        config.num_producers,
        config.num_consumers
    );

    let start = Instant::now();

    // Optional writer thread, fed by every consumer through one channel.
    let (prime_tx, writer_handle) = if cli.save_primes {
        let (tx, rx) = mpsc::channel::<u64>();
        let handle = thread::spawn(move || storage::save_primes_streaming(rx));
        (Some(tx), Some(handle))
    } else {
        (None, None)
    };

    let snapshot = pipeline::run(&config, prime_tx);

    if let Some(handle) = writer_handle {
        let saved = handle.join().unwrap();
        println!("Saved {} primes to primes.txt", saved);
    }

    let total_time = snapshot.elapsed.as_secs_f64();
    println!("\n[PROCESSING COMPLETE]");
    println!("Total primes in range: {}", snapshot.primes_found);
    println!("Total time: {:.1} seconds", total_time);
    println!("Numbers checked: {}", snapshot.numbers_checked);
    println!(
        "Average rate: {:.0} numbers/second",
        if total_time > 0.0 {
            snapshot.numbers_checked as f64 / total_time
        } else {
            0.0
        }
    );

    let duration_us = start.elapsed().as_micros();
    println!(
        "Execution time: {}us ({:.2}ms)",
        duration_us,
        duration_us as f64 / 1000.0
    );

    if let Err(e) = storage::log_execution(
        config.range_start,
        config.range_end,
        config.interval_size,
        config.num_producers,
        config.num_consumers,
        snapshot.primes_found,
        duration_us,
    ) {
        eprintln!("Warning: Failed to log execution: {}", e);
    }
}
