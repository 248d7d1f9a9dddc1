//! Bandwidth ⇄ delay conversions
//!
//! Both helpers treat non-positive inputs as caller bugs and panic: a
//! message without bits or a channel without time/bandwidth can never be a
//! simulated network condition.

use crate::core::time::SECOND;

/// Bandwidth (bits/sec) needed to push `size_bits` through in `delay_ns`
///
/// Truncates to whole bits per second.
///
/// # Panics
/// Panics if `size_bits` or `delay_ns` is not strictly positive.
///
/// # Example
/// ```
/// use cell_simulator_core_rs::capacity::needed_bandwidth;
/// use cell_simulator_core_rs::core::time::SECOND;
///
/// assert_eq!(needed_bandwidth(600, 3 * SECOND), 200);
/// ```
pub fn needed_bandwidth(size_bits: i64, delay_ns: i64) -> i64 {
    assert!(
        size_bits > 0 && delay_ns > 0,
        "cannot compute needed bandwidth: message size {} bit, delay {} ns (both must be positive)",
        size_bits,
        delay_ns
    );
    let delay_s = delay_ns as f64 / SECOND as f64;
    (size_bits as f64 / delay_s) as i64
}

/// Time (ns) needed to push `size_bits` through at `bandwidth_bps`
///
/// # Panics
/// Panics if `size_bits` or `bandwidth_bps` is not strictly positive.
///
/// # Example
/// ```
/// use cell_simulator_core_rs::capacity::needed_delay;
/// use cell_simulator_core_rs::core::time::SECOND;
///
/// assert_eq!(needed_delay(4_000, 2_000), 2 * SECOND);
/// ```
pub fn needed_delay(size_bits: i64, bandwidth_bps: i64) -> i64 {
    assert!(
        size_bits > 0 && bandwidth_bps > 0,
        "cannot compute needed delay: message size {} bit, bandwidth {} bps (both must be positive)",
        size_bits,
        bandwidth_bps
    );
    let delay_s = size_bits as f64 / bandwidth_bps as f64;
    (delay_s * SECOND as f64) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::MILLI_SECOND;

    #[test]
    fn test_needed_bandwidth_truncates() {
        // 1000 bit in 3 s → 333.33 bps
        assert_eq!(needed_bandwidth(1_000, 3 * SECOND), 333);
    }

    #[test]
    fn test_needed_bandwidth_sub_second_delay() {
        assert_eq!(needed_bandwidth(8_000, 500 * MILLI_SECOND), 16_000);
    }

    #[test]
    #[should_panic(expected = "cannot compute needed bandwidth")]
    fn test_zero_delay_panics() {
        needed_bandwidth(100, 0);
    }

    #[test]
    #[should_panic(expected = "cannot compute needed bandwidth")]
    fn test_negative_size_panics() {
        needed_bandwidth(-1, SECOND);
    }

    #[test]
    #[should_panic(expected = "cannot compute needed delay")]
    fn test_zero_bandwidth_panics() {
        needed_delay(100, 0);
    }
}
