use std::fmt;
use std::time::Duration;

/// Immutable parameters for one pipeline run.
///
/// The range is inclusive on both ends. Producers and consumers only ever
/// read this; it is cloned into each worker thread at spawn time.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub range_start: u64,
    pub range_end: u64,
    /// Numbers per interval pushed through the queue.
    pub interval_size: u64,
    /// Maximum number of intervals buffered between producers and consumers.
    pub buffer_capacity: usize,
    pub num_producers: usize,
    pub num_consumers: usize,
    /// How often the monitor redraws its progress block.
    pub monitor_interval: Duration,
    /// Rate-limiting pause after each producer push. Zero disables it.
    pub producer_delay: Duration,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidRange { start: u64, end: u64 },
    RangeTooLarge,
    ZeroIntervalSize,
    ZeroBufferCapacity,
    ZeroProducers,
    ZeroConsumers,
    ZeroMonitorInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRange { start, end } => {
                write!(f, "range start {} is greater than range end {}", start, end)
            }
            ConfigError::RangeTooLarge => {
                write!(f, "range length does not fit in 64 bits")
            }
            ConfigError::ZeroIntervalSize => write!(f, "interval size must be at least 1"),
            ConfigError::ZeroBufferCapacity => write!(f, "buffer capacity must be at least 1"),
            ConfigError::ZeroProducers => write!(f, "producer count must be at least 1"),
            ConfigError::ZeroConsumers => write!(f, "consumer count must be at least 1"),
            ConfigError::ZeroMonitorInterval => write!(f, "monitor interval must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl RunConfig {
    /// Check every parameter before any thread starts. A failed run is never
    /// partially attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.range_start > self.range_end {
            return Err(ConfigError::InvalidRange {
                start: self.range_start,
                end: self.range_end,
            });
        }
        // The full-u64 range holds 2^64 numbers, one more than the length
        // arithmetic below can represent.
        if self.range_end - self.range_start == u64::MAX {
            return Err(ConfigError::RangeTooLarge);
        }
        if self.interval_size == 0 {
            return Err(ConfigError::ZeroIntervalSize);
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::ZeroBufferCapacity);
        }
        if self.num_producers == 0 {
            return Err(ConfigError::ZeroProducers);
        }
        if self.num_consumers == 0 {
            return Err(ConfigError::ZeroConsumers);
        }
        if self.monitor_interval.is_zero() {
            return Err(ConfigError::ZeroMonitorInterval);
        }
        Ok(())
    }

    /// Total numbers in the inclusive range. `validate` rejects the one
    /// range whose length would not fit here.
    pub fn range_len(&self) -> u64 {
        self.range_end - self.range_start + 1
    }

    /// Total intervals the range splits into (last one may be short).
    /// Ceiling division in u128: the length fits u64 but the rounded-up
    /// numerator may not.
    pub fn total_intervals(&self) -> u64 {
        let len = self.range_len() as u128;
        let size = self.interval_size as u128;
        ((len + size - 1) / size) as u64
    }

    /// Inclusive bounds of interval `index`. Together the intervals
    /// `0..total_intervals()` cover the range exactly, with no gaps and no
    /// overlaps.
    pub fn interval_bounds(&self, index: u64) -> (u64, u64) {
        let start = self.range_start + index * self.interval_size;
        let end = start
            .saturating_add(self.interval_size - 1)
            .min(self.range_end);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(start: u64, end: u64, size: u64) -> RunConfig {
        RunConfig {
            range_start: start,
            range_end: end,
            interval_size: size,
            buffer_capacity: 4,
            num_producers: 2,
            num_consumers: 2,
            monitor_interval: Duration::from_millis(100),
            producer_delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(config(0, 100, 10).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let cfg = config(10, 5, 1);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidRange { start: 10, end: 5 })
        );
    }

    #[test]
    fn test_validate_rejects_zero_parameters() {
        let mut cfg = config(0, 10, 0);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroIntervalSize));

        cfg = config(0, 10, 5);
        cfg.buffer_capacity = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroBufferCapacity));

        cfg = config(0, 10, 5);
        cfg.num_producers = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroProducers));

        cfg = config(0, 10, 5);
        cfg.num_consumers = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroConsumers));

        cfg = config(0, 10, 5);
        cfg.monitor_interval = Duration::ZERO;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroMonitorInterval));
    }

    #[test]
    fn test_validate_rejects_full_u64_range() {
        // 0..=u64::MAX has 2^64 numbers; the length arithmetic cannot
        // represent it, so validation must refuse it up front instead of
        // letting the run overflow (or wrap to an empty range) later.
        let cfg = config(0, u64::MAX, 1000);
        assert_eq!(cfg.validate(), Err(ConfigError::RangeTooLarge));
    }

    #[test]
    fn test_near_full_u64_range_arithmetic() {
        // One short of the full range is valid and every derived quantity
        // must come out exact, not wrapped.
        let cfg = config(0, u64::MAX - 1, 1000);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.range_len(), u64::MAX);
        let total = cfg.total_intervals();
        assert_eq!(total, 18_446_744_073_709_552);
        let (lo, hi) = cfg.interval_bounds(total - 1);
        assert_eq!(lo, 18_446_744_073_709_551_000);
        assert_eq!(hi, u64::MAX - 1);
    }

    #[test]
    fn test_interval_bounds_at_top_of_u64() {
        let cfg = config(u64::MAX - 10, u64::MAX, 4);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.range_len(), 11);
        assert_eq!(cfg.total_intervals(), 3);
        // The last interval is short and clamps to the range end.
        assert_eq!(cfg.interval_bounds(2), (u64::MAX - 2, u64::MAX));
    }

    #[test]
    fn test_total_intervals_rounds_up() {
        assert_eq!(config(2, 20, 5).total_intervals(), 4); // 19 numbers / 5
        assert_eq!(config(0, 9, 5).total_intervals(), 2); // exact split
        assert_eq!(config(0, 0, 1000).total_intervals(), 1);
        assert_eq!(config(7, 7, 1).total_intervals(), 1);
    }

    #[test]
    fn test_interval_bounds_cover_range_exactly() {
        // The union of all interval bounds must be the inclusive range with
        // no gaps and no overlaps, for uneven final intervals too.
        for (start, end, size) in [(2, 20, 5), (0, 1, 1), (0, 99, 7), (10, 10, 3)] {
            let cfg = config(start, end, size);
            let mut expected = start;
            for k in 0..cfg.total_intervals() {
                let (lo, hi) = cfg.interval_bounds(k);
                assert_eq!(lo, expected, "gap or overlap at interval {}", k);
                assert!(hi >= lo);
                assert!(hi <= end);
                expected = hi + 1;
            }
            assert_eq!(expected, end + 1, "range not fully covered");
        }
    }

    #[test]
    fn test_round_robin_assignment_partitions_indices() {
        // Producer p of n takes indices k with k % n == p; together they
        // must claim every index exactly once, for any producer count.
        let cfg = config(0, 999, 13);
        let total = cfg.total_intervals();
        for producers in 1..=8u64 {
            let mut seen = vec![0u32; total as usize];
            for p in 0..producers {
                let mut k = p;
                while k < total {
                    seen[k as usize] += 1;
                    k += producers;
                }
            }
            assert!(seen.iter().all(|&c| c == 1));
        }
    }
}
