//! Simulation time units
//!
//! The cell core does not own a clock. Every timestamp it reads or produces
//! is an absolute simulation time in integer nanoseconds (`i64`), handed in
//! by the surrounding time-stepped simulation.

/// One nanosecond (the base unit)
pub const NANO_SECOND: i64 = 1;

/// One microsecond in nanoseconds
pub const MICRO_SECOND: i64 = 1_000 * NANO_SECOND;

/// One millisecond in nanoseconds
pub const MILLI_SECOND: i64 = 1_000 * MICRO_SECOND;

/// One second in nanoseconds
pub const SECOND: i64 = 1_000 * MILLI_SECOND;

/// One minute in nanoseconds
pub const MINUTE: i64 = 60 * SECOND;

/// One hour in nanoseconds
pub const HOUR: i64 = 60 * MINUTE;

/// Convert a duration in nanoseconds to (fractional) seconds.
pub fn ns_to_seconds(time_ns: i64) -> f64 {
    time_ns as f64 / SECOND as f64
}

/// Convert (fractional) seconds to nanoseconds, truncating.
pub fn seconds_to_ns(seconds: f64) -> i64 {
    (seconds * SECOND as f64) as i64
}

/// Format a simulation time as `HH:MM:SS.mmm` for log output.
///
/// # Example
/// ```
/// use cell_simulator_core_rs::core::time::{format_time, SECOND, MILLI_SECOND};
///
/// assert_eq!(format_time(10 * SECOND + 50 * MILLI_SECOND), "00:00:10.050");
/// assert_eq!(format_time(-SECOND), "-00:00:01.000");
/// ```
pub fn format_time(time_ns: i64) -> String {
    let sign = if time_ns < 0 { "-" } else { "" };
    let abs = time_ns.unsigned_abs();

    let hours = abs / HOUR as u64;
    let minutes = (abs % HOUR as u64) / MINUTE as u64;
    let seconds = (abs % MINUTE as u64) / SECOND as u64;
    let millis = (abs % SECOND as u64) / MILLI_SECOND as u64;

    format!(
        "{}{:02}:{:02}:{:02}.{:03}",
        sign, hours, minutes, seconds, millis
    )
}
