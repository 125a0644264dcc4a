/// Trial-division primality test.
///
/// Checks divisibility by odd numbers up to the square root. Deliberately the
/// plain O(sqrt n) algorithm: the pipeline wants each number to cost real CPU
/// time, so a sieve would defeat the purpose of the workload.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut i = 3u64;
    // i <= n / i rather than i * i <= n: the square wraps once i passes
    // 2^32 while scanning a number with no smaller factor.
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}
