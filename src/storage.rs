use chrono::Local;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

pub fn get_data_dir() -> PathBuf {
    let xdg_data_home = env::var("XDG_DATA_HOME")
        .ok()
        .and_then(|path| {
            if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            }
        })
        .or_else(|| {
            env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".local/share"))
        })
        .expect("Could not determine data directory");

    xdg_data_home.join("primepipe")
}

/// Save primes from a channel, streaming them to primes.txt one per line.
/// Runs on its own thread; ends when every sender has been dropped.
/// Returns the count of primes saved. File order is arrival order, so with
/// several consumers the lines are not sorted.
pub fn save_primes_streaming(rx: Receiver<u64>) -> usize {
    let mut count = 0;

    let data_dir = get_data_dir();
    if let Err(e) = fs::create_dir_all(&data_dir) {
        eprintln!("Error creating data directory: {}", e);
        return 0;
    }

    let primes_path = data_dir.join("primes.txt");

    let file = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&primes_path)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening primes.txt: {}", e);
            return 0;
        }
    };

    // Use BufWriter to buffer writes in memory
    let mut writer = BufWriter::new(file);

    // Append each prime from the channel (buffered) using itoa for speed
    let mut itoa_buf = itoa::Buffer::new();
    for prime in rx {
        if let Err(e) = writer.write_all(itoa_buf.format(prime).as_bytes()) {
            eprintln!("Error writing to primes.txt: {}", e);
        }
        if let Err(e) = writer.write_all(b"\n") {
            eprintln!("Error writing newline to primes.txt: {}", e);
        }

        count += 1;
    }

    // Flush buffer before returning
    if let Err(e) = writer.flush() {
        eprintln!("Error flushing primes.txt: {}", e);
    }

    count
}

/// Append one line per completed run to execution_log.txt.
pub fn log_execution(
    range_start: u64,
    range_end: u64,
    interval_size: u64,
    producers: usize,
    consumers: usize,
    primes_found: u64,
    duration_us: u128,
) -> std::io::Result<()> {
    let data_dir = get_data_dir();
    fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("execution_log.txt");
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    writeln!(
        file,
        "{} | range {}-{} | interval {} | {}p/{}c | {} primes | {}us",
        timestamp, range_start, range_end, interval_size, producers, consumers, primes_found,
        duration_us
    )?;

    Ok(())
}
